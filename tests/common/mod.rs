//! Shared builders for integration tests.
#![allow(dead_code)]

use demand_sim::model::{ApplianceConfig, PowerSeries, UseCase, User, Window};

/// A flat two-copy security light: fully deterministic output.
pub fn flat_light_config() -> ApplianceConfig {
    ApplianceConfig {
        name: "security light".to_string(),
        number: 2,
        power: PowerSeries::scalar(100.0),
        windows: [
            Window { start: 480, end: 600 },
            Window::EMPTY,
            Window::EMPTY,
        ],
        func_time: 120,
        flat: true,
        ..ApplianceConfig::default()
    }
}

/// A stochastic single-copy heater with a morning window.
pub fn heater_config() -> ApplianceConfig {
    ApplianceConfig {
        name: "heater".to_string(),
        number: 1,
        power: PowerSeries::scalar(1000.0),
        windows: [
            Window { start: 360, end: 840 },
            Window::EMPTY,
            Window::EMPTY,
        ],
        func_time: 120,
        func_cycle: 15,
        ..ApplianceConfig::default()
    }
}

/// Wraps one appliance into a single-member single-user use case.
pub fn single_appliance_use_case(cfg: ApplianceConfig) -> UseCase {
    let mut user = User::new("solo", 1, 0).expect("valid user");
    user.add_appliance(cfg).expect("valid appliance");
    UseCase::new("single", vec![user])
}
