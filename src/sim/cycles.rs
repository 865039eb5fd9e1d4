//! Per-day realization of duty-cycle waveforms and their dispatch.

use crate::model::{Appliance, Window};
use crate::rng::RngService;

/// The concrete waveforms realized for one appliance-day.
///
/// With a single declared cycle all three slots alias its waveform; with two,
/// the third slot aliases the first. With three declared cycles every slot
/// switches to the per-minute random form (see [`random_choice_cycle`]).
#[derive(Debug, Clone, Default)]
pub struct RealizedCycles {
    cycles: [Vec<f64>; 3],
}

impl RealizedCycles {
    /// Draws this day's waveforms, applying thermal power jitter once per
    /// phase and duration jitter per realization.
    pub fn draw(app: &Appliance, rng: &mut RngService) -> Self {
        let mut out = Self::default();
        if app.fixed_cycle == 0 {
            return out;
        }
        let per_minute_random = app.fixed_cycle >= 3;
        for k in 0..app.fixed_cycle as usize {
            let Some(cycle) = app.cycles[k] else {
                continue;
            };
            let p_a = rng.variation_of(app.thermal_p_var, cycle.power_a);
            let p_b = rng.variation_of(app.thermal_p_var, cycle.power_b);
            out.cycles[k] = if per_minute_random {
                random_choice_cycle(rng, cycle.jitter, cycle.time_a, p_a, cycle.time_b, p_b)
            } else {
                duty_cycle(rng, cycle.jitter, cycle.time_a, p_a, cycle.time_b, p_b)
            };
        }
        if app.fixed_cycle == 1 {
            out.cycles[1] = out.cycles[0].clone();
            out.cycles[2] = out.cycles[0].clone();
        } else if app.fixed_cycle == 2 {
            out.cycles[2] = out.cycles[0].clone();
        }
        out
    }

    /// The realized waveform for slot `k` in 0..3.
    pub fn get(&self, k: usize) -> &[f64] {
        &self.cycles[k]
    }
}

/// Two-phase square waveform: `p1` repeated over the jittered first duration,
/// then `p2` over the jittered second. Durations jitter independently.
pub fn duty_cycle(rng: &mut RngService, jitter: f64, t1: u32, p1: f64, t2: u32, p2: f64) -> Vec<f64> {
    let n1 = jittered_len(rng, jitter, t1);
    let n2 = jittered_len(rng, jitter, t2);
    let mut wave = Vec::with_capacity(n1 + n2);
    wave.extend(std::iter::repeat(p1).take(n1));
    wave.extend(std::iter::repeat(p2).take(n2));
    wave
}

/// Variant used when three cycles are declared: the phase durations jitter
/// the same way, but every minute's power is drawn uniformly between the two
/// phase powers instead of holding the square shape.
pub fn random_choice_cycle(
    rng: &mut RngService,
    jitter: f64,
    t1: u32,
    p1: f64,
    t2: u32,
    p2: f64,
) -> Vec<f64> {
    let total = jittered_len(rng, jitter, t1) + jittered_len(rng, jitter, t2);
    (0..total).map(|_| rng.uniform_between(p1, p2)).collect()
}

fn jittered_len(rng: &mut RngService, jitter: f64, t: u32) -> usize {
    (t as f64 * rng.variation(jitter)).round().max(0.0) as usize
}

/// Midpoint dispatch: which realized slot covers a switch-on interval.
///
/// The rounded mean minute of the interval is tested against cycle 1's
/// activation windows, then cycle 2's; everything else falls through to
/// slot 3. Cycle 3's own activation windows are never consulted.
pub fn dispatch_cycle(app: &Appliance, interval: Window) -> usize {
    let midpoint = ((interval.start + interval.end - 1) as f64 / 2.0).round() as u32;
    if let Some(cycle) = &app.cycles[0] {
        if cycle.activates_at(midpoint) {
            return 0;
        }
    }
    if let Some(cycle) = &app.cycles[1] {
        if cycle.activates_at(midpoint) {
            return 1;
        }
    }
    2
}
