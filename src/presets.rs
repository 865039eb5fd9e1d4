//! Built-in demo use case for catalog-less runs.

use crate::error::Result;
use crate::model::{
    ApplianceConfig, DayScope, DutyCycleConfig, PowerSeries, UseCase, User, Window,
};

/// Available preset names.
pub const PRESETS: &[&str] = &["village"];

/// Loads a use case from a named preset.
///
/// # Errors
///
/// Returns a `Configuration` error if the preset name is unknown.
pub fn from_preset(name: &str) -> Result<UseCase> {
    match name {
        "village" => village(),
        _ => Err(crate::error::Error::config(
            "preset",
            format!("unknown preset \"{name}\", available: {}", PRESETS.join(", ")),
        )),
    }
}

/// A small rural community: households, a school, and public lighting.
///
/// The mix exercises every appliance feature: multiple jittered windows,
/// occasional use, meal preferences, thermal variability, a single duty
/// cycle, the three-cycle fridge, and flat fixed lighting.
pub fn village() -> Result<UseCase> {
    let mut households = User::new("household", 25, 2)?;
    households.add_appliance(ApplianceConfig {
        name: "indoor bulb".to_string(),
        number: 6,
        power: PowerSeries::scalar(7.0),
        num_windows: 2,
        windows: [
            Window {
                start: 1170,
                end: 1440,
            },
            Window { start: 0, end: 30 },
            Window::EMPTY,
        ],
        random_var_w: 0.2,
        func_time: 120,
        time_fraction_random_variability: 0.2,
        func_cycle: 10,
        ..ApplianceConfig::default()
    })?;
    households.add_appliance(ApplianceConfig {
        name: "radio".to_string(),
        number: 1,
        power: PowerSeries::scalar(7.0),
        num_windows: 2,
        windows: [
            Window { start: 390, end: 450 },
            Window {
                start: 1110,
                end: 1290,
            },
            Window::EMPTY,
        ],
        random_var_w: 0.1,
        func_time: 80,
        time_fraction_random_variability: 0.3,
        func_cycle: 10,
        occasional_use: 0.8,
        ..ApplianceConfig::default()
    })?;
    households.add_appliance(ApplianceConfig {
        name: "television".to_string(),
        number: 1,
        power: PowerSeries::scalar(60.0),
        num_windows: 3,
        windows: [
            Window { start: 720, end: 900 },
            Window {
                start: 1170,
                end: 1440,
            },
            Window { start: 0, end: 60 },
        ],
        random_var_w: 0.1,
        func_time: 90,
        time_fraction_random_variability: 0.3,
        func_cycle: 5,
        occasional_use: 0.5,
        day_scope: DayScope::AllDays,
        ..ApplianceConfig::default()
    })?;
    let mut lunch_stove = ApplianceConfig {
        name: "lunch stove".to_string(),
        number: 1,
        power: PowerSeries::scalar(1800.0),
        windows: [
            Window { start: 660, end: 750 },
            Window::EMPTY,
            Window::EMPTY,
        ],
        random_var_w: 0.15,
        func_time: 50,
        func_cycle: 30,
        fixed_cycle: 1,
        thermal_p_var: 0.2,
        pref_index: 1,
        ..ApplianceConfig::default()
    };
    // high flame to simmer, over the whole lunch window
    lunch_stove.set_cycle(
        1,
        DutyCycleConfig {
            power_a: 1800.0,
            time_a: 10,
            power_b: 750.0,
            time_b: 20,
            jitter: 0.15,
            ..DutyCycleConfig::default()
        },
    )?;
    households.add_appliance(lunch_stove)?;

    let mut dinner_stove = ApplianceConfig {
        name: "dinner stove".to_string(),
        number: 1,
        power: PowerSeries::scalar(1800.0),
        windows: [
            Window {
                start: 1140,
                end: 1260,
            },
            Window::EMPTY,
            Window::EMPTY,
        ],
        random_var_w: 0.15,
        func_time: 60,
        func_cycle: 30,
        fixed_cycle: 1,
        thermal_p_var: 0.2,
        pref_index: 2,
        ..ApplianceConfig::default()
    };
    dinner_stove.set_cycle(
        1,
        DutyCycleConfig {
            power_a: 1800.0,
            time_a: 15,
            power_b: 750.0,
            time_b: 15,
            jitter: 0.15,
            ..DutyCycleConfig::default()
        },
    )?;
    households.add_appliance(dinner_stove)?;

    let mut fridge = ApplianceConfig {
        name: "fridge".to_string(),
        number: 1,
        power: PowerSeries::scalar(200.0),
        windows: [
            Window { start: 0, end: 1440 },
            Window::EMPTY,
            Window::EMPTY,
        ],
        func_time: 1400,
        func_cycle: 30,
        fixed_cycle: 3,
        occasional_use: 0.9,
        ..ApplianceConfig::default()
    };
    // compressor duty varies with the heat of the day: daytime, evening,
    // and night regimes
    fridge.set_cycle(
        1,
        DutyCycleConfig {
            power_a: 200.0,
            time_a: 20,
            power_b: 5.0,
            time_b: 10,
            jitter: 0.1,
            window_a: Some(Window { start: 480, end: 1200 }),
            window_b: Some(Window::EMPTY),
        },
    )?;
    fridge.set_cycle(
        2,
        DutyCycleConfig {
            power_a: 200.0,
            time_a: 15,
            power_b: 5.0,
            time_b: 15,
            jitter: 0.1,
            window_a: Some(Window {
                start: 1200,
                end: 1440,
            }),
            window_b: Some(Window::EMPTY),
        },
    )?;
    fridge.set_cycle(
        3,
        DutyCycleConfig {
            power_a: 200.0,
            time_a: 10,
            power_b: 5.0,
            time_b: 20,
            jitter: 0.1,
            window_a: Some(Window { start: 0, end: 480 }),
            window_b: Some(Window::EMPTY),
        },
    )?;
    households.add_appliance(fridge)?;

    let mut school = User::new("school", 1, 0)?;
    school.add_appliance(ApplianceConfig {
        name: "classroom light".to_string(),
        number: 12,
        power: PowerSeries::scalar(18.0),
        windows: [
            Window { start: 480, end: 960 },
            Window::EMPTY,
            Window::EMPTY,
        ],
        random_var_w: 0.1,
        func_time: 300,
        time_fraction_random_variability: 0.2,
        func_cycle: 60,
        day_scope: DayScope::WeekdaysOnly,
        ..ApplianceConfig::default()
    })?;
    school.add_appliance(ApplianceConfig {
        name: "ceiling fan".to_string(),
        number: 6,
        power: PowerSeries::scalar(50.0),
        windows: [
            Window { start: 540, end: 900 },
            Window::EMPTY,
            Window::EMPTY,
        ],
        random_var_w: 0.1,
        func_time: 240,
        time_fraction_random_variability: 0.2,
        func_cycle: 30,
        thermal_p_var: 0.1,
        occasional_use: 0.7,
        day_scope: DayScope::WeekdaysOnly,
        ..ApplianceConfig::default()
    })?;

    let mut street = User::new("street lighting", 1, 0)?;
    street.add_appliance(ApplianceConfig {
        name: "street lamp".to_string(),
        number: 20,
        power: PowerSeries::scalar(40.0),
        num_windows: 2,
        windows: [
            Window {
                start: 1110,
                end: 1440,
            },
            Window { start: 0, end: 360 },
            Window::EMPTY,
        ],
        func_time: 690,
        flat: true,
        fixed: true,
        ..ApplianceConfig::default()
    })?;

    Ok(UseCase::new("village", vec![households, school, street]))
}
