//! Switch-on interval selection and free-spot bookkeeping.

use crate::error::{Error, Result};
use crate::model::Window;
use crate::rng::RngService;

/// The remaining sub-intervals of today's jittered windows in which a future
/// switch-on event may still be placed.
///
/// Kept sorted and disjoint; every removal replaces the containing spot with
/// its zero, one, or two remnants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeSpots {
    spots: Vec<Window>,
}

impl FreeSpots {
    /// Builds the initial spot list from jittered windows: empty windows are
    /// skipped, overlapping ones merged.
    pub fn from_windows(windows: &[Window]) -> Self {
        let mut spans: Vec<Window> = windows.iter().copied().filter(|w| !w.is_empty()).collect();
        spans.sort();
        let mut spots: Vec<Window> = Vec::with_capacity(spans.len());
        for window in spans {
            match spots.last_mut() {
                Some(prev) if window.start <= prev.end => prev.end = prev.end.max(window.end),
                _ => spots.push(window),
            }
        }
        Self { spots }
    }

    pub fn spots(&self) -> &[Window] {
        &self.spots
    }

    /// Total minutes still available.
    pub fn total_len(&self) -> u32 {
        self.spots.iter().map(Window::span).sum()
    }

    /// Picks one switch-on interval, or `None` when no spot still fits a
    /// minimum cycle.
    ///
    /// Every minute that leaves room for at least `func_cycle` minutes inside
    /// its spot is a candidate; the start is drawn uniformly over all
    /// candidates, so larger spots attract proportionally more events. The
    /// duration is then drawn between the minimum cycle and the shorter of
    /// `rand_time` and the distance to the spot's end.
    ///
    /// # Errors
    ///
    /// `Runtime` when the duration bound drops below the minimum cycle, which
    /// is unreachable while construction-time invariants hold.
    pub fn pick_interval(
        &self,
        func_cycle: u32,
        rand_time: u32,
        rng: &mut RngService,
    ) -> Result<Option<Window>> {
        let candidate_count: u64 = self
            .spots
            .iter()
            .filter(|s| s.span() >= func_cycle)
            .map(|s| (s.span() - func_cycle + 1) as u64)
            .sum();
        if candidate_count == 0 {
            return Ok(None);
        }

        let mut pick = rng.randint(0, candidate_count as i64 - 1) as u64;
        for spot in &self.spots {
            if spot.span() < func_cycle {
                continue;
            }
            let count = (spot.span() - func_cycle + 1) as u64;
            if pick >= count {
                pick -= count;
                continue;
            }
            let switch_on = spot.start + pick as u32;
            let largest_duration = rand_time.min(spot.end - switch_on);
            let len = if largest_duration > func_cycle {
                rng.uniform_between(func_cycle as f64, largest_duration as f64)
                    .floor() as u32
            } else if largest_duration == func_cycle {
                func_cycle
            } else {
                return Err(Error::Runtime(format!(
                    "switch-on at minute {switch_on} cannot fit a {func_cycle}-minute cycle"
                )));
            };
            return Ok(Some(Window {
                start: switch_on,
                end: switch_on + len,
            }));
        }
        Err(Error::Runtime(
            "switch-on candidate walk exhausted its spots".to_string(),
        ))
    }

    /// Removes a chosen interval from its containing spot, reinserting the
    /// non-empty remnants in place.
    pub fn remove(&mut self, interval: Window) -> Result<()> {
        let idx = self
            .spots
            .iter()
            .position(|s| interval.start >= s.start && interval.end <= s.end)
            .ok_or_else(|| {
                Error::Runtime(format!(
                    "interval [{}, {}) is not inside any free spot",
                    interval.start, interval.end
                ))
            })?;
        let spot = self.spots.remove(idx);
        let mut insert_at = idx;
        if spot.start < interval.start {
            self.spots.insert(
                insert_at,
                Window {
                    start: spot.start,
                    end: interval.start,
                },
            );
            insert_at += 1;
        }
        if interval.end < spot.end {
            self.spots.insert(
                insert_at,
                Window {
                    start: interval.end,
                    end: spot.end,
                },
            );
        }
        Ok(())
    }
}
