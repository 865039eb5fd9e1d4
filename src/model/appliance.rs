//! Appliance configuration and validation.

use crate::error::{Error, Result};
use crate::model::duty_cycle::{DutyCycle, DutyCycleConfig};
use crate::model::power::PowerSeries;
use crate::model::window::{MINUTES_PER_DAY, Window};
use crate::model::{DailyProfile, DayScope};

/// Raw appliance options, one field per catalog column group.
///
/// Defaults mirror the catalog's unset values: one copy, zero power, a single
/// degenerate window, continuous-power operation every day of the week.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplianceConfig {
    pub name: String,
    /// Count of identical copies owned by the user category.
    pub number: u32,
    pub power: PowerSeries,
    /// How many of `windows` are in use (1..=3).
    pub num_windows: u8,
    pub windows: [Window; 3],
    /// Fractional jitter applied to every window's endpoints.
    pub random_var_w: f64,
    /// Nominal total on-time per day in minutes, independent of windows.
    pub func_time: u32,
    /// Fractional jitter applied to `func_time`.
    pub time_fraction_random_variability: f64,
    /// Minimum uninterrupted on-duration per switch-on event.
    pub func_cycle: u32,
    /// All copies switch together when set.
    pub fixed: bool,
    /// Always on during its windows, with no further stochasticity.
    pub flat: bool,
    /// Number of distinct duty cycles (0 = constant power).
    pub fixed_cycle: u8,
    /// Fractional jitter applied to instantaneous power.
    pub thermal_p_var: f64,
    /// Per-day probability that the appliance is eligible at all.
    pub occasional_use: f64,
    /// Preference slot; 0 means always eligible.
    pub pref_index: u32,
    pub day_scope: DayScope,
    pub cycles: [Option<DutyCycleConfig>; 3],
}

impl Default for ApplianceConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            number: 1,
            power: PowerSeries::scalar(0.0),
            num_windows: 1,
            windows: [Window::EMPTY; 3],
            random_var_w: 0.0,
            func_time: 0,
            time_fraction_random_variability: 0.0,
            func_cycle: 1,
            fixed: false,
            flat: false,
            fixed_cycle: 0,
            thermal_p_var: 0.0,
            occasional_use: 1.0,
            pref_index: 0,
            day_scope: DayScope::AllDays,
            cycles: [None; 3],
        }
    }
}

impl ApplianceConfig {
    /// Assigns one of the three duty cycles.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `cycle_num` is outside 1..=3.
    pub fn set_cycle(&mut self, cycle_num: usize, cycle: DutyCycleConfig) -> Result<()> {
        if !(1..=3).contains(&cycle_num) {
            return Err(Error::InvalidArgument(format!(
                "duty cycle number must be 1, 2 or 3, got {cycle_num}"
            )));
        }
        self.cycles[cycle_num - 1] = Some(cycle);
        Ok(())
    }
}

/// An immutable appliance: N identical copies owned by one user category,
/// with operating windows and optional duty cycles.
#[derive(Debug, Clone, PartialEq)]
pub struct Appliance {
    pub name: String,
    pub number: u32,
    pub power: PowerSeries,
    pub num_windows: u8,
    pub windows: [Window; 3],
    pub random_var_w: f64,
    /// Per-window endpoint jitter amplitude, `floor(random_var_w * span)`.
    pub window_jitter: [u32; 3],
    pub func_time: u32,
    pub time_fraction_random_variability: f64,
    pub func_cycle: u32,
    pub fixed: bool,
    pub flat: bool,
    pub fixed_cycle: u8,
    pub thermal_p_var: f64,
    pub occasional_use: f64,
    pub pref_index: u32,
    pub day_scope: DayScope,
    pub cycles: [Option<DutyCycle>; 3],
}

impl Appliance {
    /// Validates a configuration and freezes it into an appliance.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error when a structural invariant is
    /// violated: window count mismatch, window spans shorter than the
    /// functioning time, missing or inconsistent duty cycles, or numeric
    /// fields outside their ranges.
    pub fn new(cfg: ApplianceConfig) -> Result<Self> {
        let field = |suffix: &str| format!("appliance.{}.{suffix}", cfg.name);

        if cfg.number < 1 {
            return Err(Error::config(field("number"), "must be >= 1"));
        }
        if !(1..=3).contains(&cfg.num_windows) {
            return Err(Error::config(
                field("num_windows"),
                format!("must be 1, 2 or 3, got {}", cfg.num_windows),
            ));
        }
        if cfg.func_time as usize > MINUTES_PER_DAY {
            return Err(Error::config(field("func_time"), "must be <= 1440"));
        }
        if cfg.func_cycle < 1 {
            return Err(Error::config(field("func_cycle"), "must be >= 1"));
        }
        for (name, value) in [
            ("random_var_w", cfg.random_var_w),
            (
                "time_fraction_random_variability",
                cfg.time_fraction_random_variability,
            ),
            ("thermal_p_var", cfg.thermal_p_var),
            ("occasional_use", cfg.occasional_use),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::config(
                    field(name),
                    format!("must be in [0, 1], got {value}"),
                ));
            }
        }

        let mut windows = cfg.windows;
        let mut window_time = 0u32;
        for (i, window) in windows.iter_mut().enumerate() {
            if i < cfg.num_windows as usize {
                if window.is_empty() {
                    return Err(Error::config(
                        field(&format!("window_{}", i + 1)),
                        "window is declared but empty",
                    ));
                }
                if window.end > MINUTES_PER_DAY as u32 {
                    return Err(Error::config(
                        field(&format!("window_{}", i + 1)),
                        "must end at or before minute 1440",
                    ));
                }
                window_time += window.span();
            } else {
                *window = Window::EMPTY;
            }
        }
        if window_time < cfg.func_time {
            return Err(Error::config(
                field("func_time"),
                format!(
                    "windows cover {window_time} minutes, less than the {} minutes of use",
                    cfg.func_time
                ),
            ));
        }

        if cfg.fixed_cycle > 3 {
            return Err(Error::config(
                field("fixed_cycle"),
                format!("must be 0..=3, got {}", cfg.fixed_cycle),
            ));
        }
        let mut cycles: [Option<DutyCycle>; 3] = [None; 3];
        for (i, cycle) in cfg.cycles.iter().enumerate() {
            let Some(c) = cycle else {
                if i < cfg.fixed_cycle as usize {
                    return Err(Error::config(
                        field(&format!("fixed_cycle.{}", i + 1)),
                        "duty cycle is declared but not defined",
                    ));
                }
                continue;
            };
            if i < cfg.fixed_cycle as usize && c.time_a + c.time_b < 1 {
                return Err(Error::config(
                    field(&format!("fixed_cycle.{}", i + 1)),
                    "cycle phases must cover at least one minute",
                ));
            }
            // A single duty cycle activates over the appliance's own windows
            // unless explicit activation windows are given.
            let (default_a, default_b) = if cfg.fixed_cycle == 1 && i == 0 {
                (windows[0], windows[1])
            } else {
                (Window::EMPTY, Window::EMPTY)
            };
            cycles[i] = Some(DutyCycle {
                power_a: c.power_a,
                time_a: c.time_a,
                power_b: c.power_b,
                time_b: c.time_b,
                jitter: c.jitter,
                window_a: c.window_a.unwrap_or(default_a),
                window_b: c.window_b.unwrap_or(default_b),
            });
        }

        Ok(Self {
            name: cfg.name,
            number: cfg.number,
            power: cfg.power,
            num_windows: cfg.num_windows,
            windows,
            random_var_w: cfg.random_var_w,
            window_jitter: windows.map(|w| (cfg.random_var_w * w.span() as f64) as u32),
            func_time: cfg.func_time,
            time_fraction_random_variability: cfg.time_fraction_random_variability,
            func_cycle: cfg.func_cycle,
            fixed: cfg.fixed,
            flat: cfg.flat,
            fixed_cycle: cfg.fixed_cycle,
            thermal_p_var: cfg.thermal_p_var,
            occasional_use: cfg.occasional_use,
            pref_index: cfg.pref_index,
            day_scope: cfg.day_scope,
            cycles,
        })
    }

    /// Theoretical maximum profile: mean rated power times the copy count on
    /// every minute of the configured windows, zero elsewhere.
    pub fn maximum_profile(&self) -> DailyProfile {
        let level = self.power.mean() * self.number as f64;
        let mut profile = vec![0.0; MINUTES_PER_DAY];
        for window in &self.windows {
            for minute in window.range() {
                profile[minute] = level;
            }
        }
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::{Appliance, ApplianceConfig};
    use crate::model::duty_cycle::DutyCycleConfig;
    use crate::model::power::PowerSeries;
    use crate::model::window::Window;

    fn base_config() -> ApplianceConfig {
        ApplianceConfig {
            name: "lamp".to_string(),
            number: 2,
            power: PowerSeries::scalar(100.0),
            num_windows: 1,
            windows: [
                Window { start: 480, end: 600 },
                Window::EMPTY,
                Window::EMPTY,
            ],
            func_time: 60,
            ..ApplianceConfig::default()
        }
    }

    #[test]
    fn valid_config_constructs() {
        assert!(Appliance::new(base_config()).is_ok());
    }

    #[test]
    fn func_time_exceeding_window_span_is_rejected() {
        let cfg = ApplianceConfig {
            func_time: 200,
            windows: [
                Window { start: 0, end: 100 },
                Window::EMPTY,
                Window::EMPTY,
            ],
            ..base_config()
        };
        assert!(Appliance::new(cfg).is_err());
    }

    #[test]
    fn declared_window_must_be_populated() {
        let cfg = ApplianceConfig {
            num_windows: 2,
            ..base_config()
        };
        assert!(Appliance::new(cfg).is_err());
    }

    #[test]
    fn extra_windows_are_cleared() {
        let mut cfg = base_config();
        cfg.windows[2] = Window { start: 700, end: 800 };
        let app = Appliance::new(cfg).expect("valid");
        assert!(app.windows[2].is_empty());
    }

    #[test]
    fn declared_cycle_must_be_defined() {
        let cfg = ApplianceConfig {
            fixed_cycle: 1,
            ..base_config()
        };
        assert!(Appliance::new(cfg).is_err());
    }

    #[test]
    fn zero_length_cycle_is_rejected() {
        let mut cfg = base_config();
        cfg.fixed_cycle = 1;
        cfg.cycles[0] = Some(DutyCycleConfig::default());
        assert!(Appliance::new(cfg).is_err());
    }

    #[test]
    fn single_cycle_defaults_activation_to_operating_windows() {
        let mut cfg = base_config();
        cfg.fixed_cycle = 1;
        cfg.cycles[0] = Some(DutyCycleConfig {
            power_a: 50.0,
            time_a: 10,
            power_b: 10.0,
            time_b: 20,
            ..DutyCycleConfig::default()
        });
        let app = Appliance::new(cfg).expect("valid");
        let cycle = app.cycles[0].expect("cycle present");
        assert_eq!(cycle.window_a, app.windows[0]);
        assert_eq!(cycle.window_b, app.windows[1]);
    }

    #[test]
    fn explicit_activation_windows_win_over_default() {
        let mut cfg = base_config();
        cfg.fixed_cycle = 1;
        cfg.cycles[0] = Some(DutyCycleConfig {
            power_a: 50.0,
            time_a: 10,
            power_b: 10.0,
            time_b: 20,
            window_a: Some(Window { start: 0, end: 720 }),
            ..DutyCycleConfig::default()
        });
        let app = Appliance::new(cfg).expect("valid");
        let cycle = app.cycles[0].expect("cycle present");
        assert_eq!(cycle.window_a, Window { start: 0, end: 720 });
    }

    #[test]
    fn set_cycle_rejects_unknown_number() {
        let mut cfg = base_config();
        let err = cfg.set_cycle(4, DutyCycleConfig::default());
        assert!(err.is_err());
    }

    #[test]
    fn window_jitter_scales_with_span() {
        let mut cfg = base_config();
        cfg.random_var_w = 0.1;
        let app = Appliance::new(cfg).expect("valid");
        // window span 120, 10% jitter
        assert_eq!(app.window_jitter[0], 12);
        assert_eq!(app.window_jitter[1], 0);
    }

    #[test]
    fn maximum_profile_fills_windows_with_mean_power_times_count() {
        let app = Appliance::new(base_config()).expect("valid");
        let max = app.maximum_profile();
        assert_eq!(max[480], 200.0);
        assert_eq!(max[599], 200.0);
        assert_eq!(max[600], 0.0);
        assert_eq!(max[0], 0.0);
    }
}
