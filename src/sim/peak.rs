//! Community peak-window derivation.
//!
//! The peak window is where coincident switch-on of many appliance copies
//! becomes more likely. It is derived once per run from the theoretical
//! maximum profiles: a random peak time inside the argmax window, then a
//! random enlargement around it.

use crate::model::{MINUTES_PER_DAY, UseCase};
use crate::rng::RngService;

/// Default fractional enlargement of the sampled peak time.
pub const DEFAULT_PEAK_ENLARGE: f64 = 0.15;

/// Half-open minute range in which the on-peak coincidence rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeakRange {
    pub start: u32,
    pub end: u32,
}

impl PeakRange {
    /// Standard interval-overlap test against a switch-on event spanning
    /// minutes `first..=last`.
    pub fn overlaps(&self, first: u32, last: u32) -> bool {
        first < self.end && last >= self.start
    }
}

/// Derives the randomized peak time range for a use case.
///
/// Returns `None` when the enlargement collapses the range to nothing; all
/// switch-on events then follow the off-peak rule.
pub fn peak_time_range(
    use_case: &UseCase,
    peak_enlarge: f64,
    rng: &mut RngService,
) -> Option<PeakRange> {
    let max_profile = use_case.maximum_profile();
    let peak_value = max_profile.iter().copied().fold(f64::MIN, f64::max);
    let mut first = MINUTES_PER_DAY;
    let mut last = 0usize;
    let mut sum = 0usize;
    let mut count = 0usize;
    for (minute, &value) in max_profile.iter().enumerate() {
        if value == peak_value {
            first = first.min(minute);
            last = minute;
            sum += minute;
            count += 1;
        }
    }

    let center = (sum as f64 / count as f64).round();
    let sigma = (last - first) as f64 / 3.0;
    let peak_time = rng.gauss(center, sigma).round();
    let enlargement = (peak_time - rng.gauss(peak_time, peak_enlarge * peak_time))
        .abs()
        .round();

    let start = (peak_time - enlargement).clamp(0.0, MINUTES_PER_DAY as f64);
    let end = (peak_time + enlargement).clamp(0.0, MINUTES_PER_DAY as f64);
    if start >= end {
        return None;
    }
    Some(PeakRange {
        start: start as u32,
        end: end as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::{PeakRange, peak_time_range};
    use crate::model::{ApplianceConfig, PowerSeries, UseCase, User, Window};
    use crate::rng::RngService;

    fn evening_use_case() -> UseCase {
        let mut user = User::new("homes", 10, 0).expect("valid");
        user.add_appliance(ApplianceConfig {
            name: "lamp".to_string(),
            number: 3,
            power: PowerSeries::scalar(20.0),
            windows: [
                Window {
                    start: 1080,
                    end: 1320,
                },
                Window::EMPTY,
                Window::EMPTY,
            ],
            func_time: 100,
            ..ApplianceConfig::default()
        })
        .expect("valid appliance");
        UseCase::new("evening", vec![user])
    }

    #[test]
    fn overlap_is_inclusive_of_last_minute() {
        let range = PeakRange {
            start: 1000,
            end: 1100,
        };
        assert!(range.overlaps(1099, 1105));
        assert!(range.overlaps(900, 1000));
        assert!(!range.overlaps(900, 999));
        assert!(!range.overlaps(1100, 1200));
    }

    #[test]
    fn peak_range_lands_inside_the_day() {
        let uc = evening_use_case();
        for seed in 0..50 {
            let mut rng = RngService::from_seed(seed);
            if let Some(range) = peak_time_range(&uc, 0.15, &mut rng) {
                assert!(range.start < range.end);
                assert!(range.end <= 1440);
            }
        }
    }

    #[test]
    fn zero_enlargement_collapses_to_none() {
        let uc = evening_use_case();
        let mut rng = RngService::from_seed(3);
        // with no enlargement the half-open range is empty
        assert_eq!(peak_time_range(&uc, 0.0, &mut rng), None);
    }

    #[test]
    fn same_seed_same_range() {
        let uc = evening_use_case();
        let mut a = RngService::from_seed(11);
        let mut b = RngService::from_seed(11);
        assert_eq!(
            peak_time_range(&uc, 0.15, &mut a),
            peak_time_range(&uc, 0.15, &mut b)
        );
    }
}
