//! Two-phase duty-cycle waveform specifications.

use crate::model::window::Window;

/// Raw options for one duty cycle: phase a at `power_a` watts for `time_a`
/// minutes, then phase b at `power_b` for `time_b`.
///
/// `window_a`/`window_b` are the activation windows consulted by the midpoint
/// dispatch rule; left unset they default to `[0, 0)`, except for a single
/// duty cycle, whose windows default to the appliance's first two operating
/// windows.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DutyCycleConfig {
    pub power_a: f64,
    pub time_a: u32,
    pub power_b: f64,
    pub time_b: u32,
    /// Fractional jitter applied independently to each phase duration.
    pub jitter: f64,
    pub window_a: Option<Window>,
    pub window_b: Option<Window>,
}

/// A validated duty cycle with concrete activation windows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DutyCycle {
    pub power_a: f64,
    pub time_a: u32,
    pub power_b: f64,
    pub time_b: u32,
    pub jitter: f64,
    pub window_a: Window,
    pub window_b: Window,
}

impl DutyCycle {
    /// Whether a minute falls in either activation window.
    pub fn activates_at(&self, minute: u32) -> bool {
        self.window_a.contains(minute) || self.window_b.contains(minute)
    }
}
