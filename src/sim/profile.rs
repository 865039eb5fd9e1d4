//! Per-appliance daily profile generation.
//!
//! One call produces the 1440-minute load of a single appliance on a single
//! day: eligibility draws, window jitter, on-time randomization, then the
//! switch-on loop that fills the profile event by event until the randomized
//! budget is spent.

use crate::error::{Error, Result};
use crate::model::{Appliance, DailyProfile, DayType, MINUTES_PER_DAY, Window};
use crate::rng::RngService;
use crate::sim::coincidence::{SwitchOnParams, coincident_switch_on};
use crate::sim::cycles::{RealizedCycles, dispatch_cycle};
use crate::sim::peak::PeakRange;
use crate::sim::switch_on::FreeSpots;

/// Marker power for minutes that belong to today's windows but carry no
/// event. Left in the returned profile on purpose: downstream consumers
/// treat it as part of the signature of an eligible-but-idle minute.
pub const WINDOW_SENTINEL_W: f64 = 0.001;

/// Everything one generation call needs to know about the simulated day.
#[derive(Debug, Clone, Copy)]
pub struct DayContext {
    /// Day-of-year index in `[0, 365)`, also the power-series index.
    pub day: usize,
    pub day_type: DayType,
    /// `None` when the peak range collapsed; all events are then off-peak.
    pub peak: Option<PeakRange>,
    pub params: SwitchOnParams,
}

/// Generates the daily load profile of one appliance copy.
///
/// # Errors
///
/// `InvalidArgument` for a day index outside `[0, 365)`; `Configuration`
/// when the randomized on-time cannot fit the day's windows; `Runtime` on
/// planner invariant violations.
pub fn generate_daily_profile(
    app: &Appliance,
    user_preference: u32,
    ctx: &DayContext,
    rng: &mut RngService,
) -> Result<DailyProfile> {
    if ctx.day >= 365 {
        return Err(Error::InvalidArgument(format!(
            "day index {} outside [0, 365)",
            ctx.day
        )));
    }
    let power = app.power.get(ctx.day);
    let mut daily_use = vec![0.0; MINUTES_PER_DAY];

    // Eligibility: any failed gate leaves the profile at zero.
    if rng.uniform() > app.occasional_use {
        return Ok(daily_use);
    }
    if app.pref_index != 0 && user_preference != 0 {
        let daily_pref = rng.randint(1, user_preference as i64) as u32;
        if daily_pref != app.pref_index {
            return Ok(daily_use);
        }
    }
    if !app.day_scope.allows(ctx.day_type) {
        return Ok(daily_use);
    }

    let rand_windows = [
        jittered_window(app.windows[0], app.window_jitter[0], rng),
        jittered_window(app.windows[1], app.window_jitter[1], rng),
        jittered_window(app.windows[2], app.window_jitter[2], rng),
    ];

    let rand_time = randomized_on_time(app, &rand_windows, rng)?;

    // Flat appliances fill their windows at full power and take no part in
    // the stochastic loop.
    if app.flat {
        let level = power * app.number as f64;
        for window in &rand_windows {
            for minute in window.range() {
                daily_use[minute] = level;
            }
        }
        return Ok(daily_use);
    }

    for window in &rand_windows {
        for minute in window.range() {
            daily_use[minute] = WINDOW_SENTINEL_W;
        }
    }

    let cycles = RealizedCycles::draw(app, rng);
    let mut free_spots = FreeSpots::from_windows(&rand_windows);

    let mut tot_time: u32 = 0;
    // An exact budget hit still enters once more; the empty truncation ends
    // the loop.
    while tot_time <= rand_time {
        let Some(interval) = free_spots.pick_interval(app.func_cycle, rand_time, rng)? else {
            // no eligible slot remains; accept partial fulfillment
            break;
        };
        let remaining = rand_time - tot_time;
        let truncated = interval.span() > remaining;
        let interval = if truncated {
            Window {
                start: interval.start,
                end: interval.start + remaining,
            }
        } else {
            interval
        };
        if !interval.is_empty() {
            apply_switch_on(app, &cycles, interval, power, ctx, rng, &mut daily_use);
            free_spots.remove(interval)?;
            tot_time += interval.span();
        }
        if truncated {
            break;
        }
    }

    Ok(daily_use)
}

/// Writes one switch-on event into the profile.
fn apply_switch_on(
    app: &Appliance,
    cycles: &RealizedCycles,
    interval: Window,
    power: f64,
    ctx: &DayContext,
    rng: &mut RngService,
    daily_use: &mut [f64],
) {
    let inside_peak = ctx
        .peak
        .is_some_and(|peak| peak.overlaps(interval.start, interval.end - 1));
    let coincidence =
        coincident_switch_on(app.number, app.fixed, inside_peak, &ctx.params, rng) as f64;

    if app.fixed_cycle > 0 {
        let wave = cycles.get(dispatch_cycle(app, interval));
        if wave.is_empty() {
            // degenerate jittered cycle; leave the window marker in place
            return;
        }
        for (j, minute) in interval.range().enumerate() {
            daily_use[minute] = wave[j % wave.len()] * coincidence;
        }
    } else {
        let level = rng.variation_of(app.thermal_p_var, coincidence * power);
        for minute in interval.range() {
            daily_use[minute] = level;
        }
    }
}

/// Randomizes one window's endpoints within the precomputed jitter amplitude,
/// clamped to the day.
fn jittered_window(window: Window, jitter: u32, rng: &mut RngService) -> Window {
    if window.is_empty() {
        return Window::EMPTY;
    }
    let delta = jitter as i64;
    let start = rng
        .randint(window.start as i64 - delta, window.start as i64 + delta)
        .clamp(0, MINUTES_PER_DAY as i64);
    let end = rng
        .randint(window.end as i64 - delta, window.end as i64 + delta)
        .clamp(start, MINUTES_PER_DAY as i64);
    Window {
        start: start as u32,
        end: end as u32,
    }
}

/// Draws the day's total on-time target.
///
/// Uniform between the nominal functioning time and its jittered value,
/// floored at one minimum cycle, then capped at 99% of what the jittered
/// windows can hold.
fn randomized_on_time(
    app: &Appliance,
    rand_windows: &[Window; 3],
    rng: &mut RngService,
) -> Result<u32> {
    let spread = rng.variation(app.time_fraction_random_variability);
    let upper = (app.func_time as f64 * spread).trunc();
    let mut rand_time = rng
        .uniform_between(app.func_time as f64, upper)
        .round() as i64;
    if rand_time < app.func_cycle as i64 {
        rand_time = app.func_cycle as i64;
    }

    let total_available: i64 = rand_windows.iter().map(|w| w.span() as i64).sum();
    if rand_time as f64 > 0.99 * total_available as f64 {
        rand_time = (0.99 * total_available as f64) as i64;
    }
    if rand_time < app.func_cycle as i64 {
        return Err(Error::config(
            format!("appliance.{}.func_cycle", app.name),
            format!(
                "a {}-minute minimum cycle cannot fit the {} minutes available today",
                app.func_cycle, total_available
            ),
        ));
    }
    Ok(rand_time as u32)
}
