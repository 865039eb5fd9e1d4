//! Coincident switch-on behavior for the N copies of an appliance.

use crate::rng::RngService;

/// Calibration constants for coincident switch-on draws.
///
/// The defaults are the model's single source of truth; tests and calibration
/// runs may override individual fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwitchOnParams {
    /// Mean fraction of copies active together inside the peak window.
    pub mu_peak: f64,
    /// Relative spread of the on-peak Gaussian.
    pub s_peak: f64,
    /// Offset shrinking the off-peak coincidence probability bound.
    pub op_factor: f64,
}

impl Default for SwitchOnParams {
    fn default() -> Self {
        Self {
            mu_peak: 0.5,
            s_peak: 0.5,
            op_factor: 0.5,
        }
    }
}

/// How many of the `number` copies switch on together for one event.
///
/// Fixed appliances activate all copies. Inside the peak window the count is
/// a clamped Gaussian draw; outside it, a uniform probability is compared
/// against the `i/N` ladder and the largest rung at or below it wins, with a
/// floor of one copy (also the fallback when the probability bound is not
/// positive, as happens at N = 1 with `op_factor` >= 1).
pub fn coincident_switch_on(
    number: u32,
    fixed: bool,
    inside_peak: bool,
    params: &SwitchOnParams,
    rng: &mut RngService,
) -> u32 {
    if fixed {
        return number;
    }
    let n = number as f64;
    if inside_peak {
        let mu = n * params.mu_peak + 0.5;
        let sigma = params.s_peak * n * params.mu_peak;
        let draw = rng.gauss(mu, sigma).ceil();
        draw.clamp(1.0, n) as u32
    } else {
        let bound = (n - params.op_factor) / n;
        if bound <= 0.0 {
            return 1;
        }
        let prob = rng.uniform_between(0.0, bound);
        for i in (0..number).rev() {
            if i as f64 / n <= prob {
                return i + 1;
            }
        }
        1
    }
}
