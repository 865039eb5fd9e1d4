//! Profile generation engine: peak-window estimation, coincidence, duty-cycle
//! realization, switch-on planning, and run orchestration.

pub mod coincidence;
pub mod cycles;
pub mod engine;
pub mod peak;
pub mod profile;
pub mod switch_on;

pub use engine::Engine;
