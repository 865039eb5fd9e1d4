//! Run orchestration: sequential generation and the parallel fan-out.

use indicatif::ProgressBar;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{DailyProfile, DayType, MINUTES_PER_DAY, UseCase};
use crate::rng::RngService;
use crate::sim::coincidence::SwitchOnParams;
use crate::sim::peak::{DEFAULT_PEAK_ENLARGE, peak_time_range};
use crate::sim::profile::{DayContext, generate_daily_profile};

/// One unit of parallel work: a single appliance copy on a single day.
struct Task {
    day: usize,
    day_type: DayType,
    user_idx: usize,
    app_idx: usize,
    /// Appliance index across the whole use case, part of the substream key.
    app_uid: usize,
    copy: usize,
}

/// Simulation engine owning the use case and its calibration knobs.
///
/// The peak time range is derived once per run and shared by every day; the
/// per-day work iterates users, members, and appliances, summing their
/// profiles into one community curve per requested day.
pub struct Engine {
    use_case: UseCase,
    /// Fractional enlargement of the sampled peak time.
    pub peak_enlarge: f64,
    pub params: SwitchOnParams,
}

impl Engine {
    pub fn new(use_case: UseCase) -> Self {
        Self {
            use_case,
            peak_enlarge: DEFAULT_PEAK_ENLARGE,
            params: SwitchOnParams::default(),
        }
    }

    pub fn use_case(&self) -> &UseCase {
        &self.use_case
    }

    /// Generates one community profile per requested day, sequentially, all
    /// draws coming from the single injected stream.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when more than 365 days are requested; any
    /// per-appliance error aborts the whole run.
    pub fn run(&self, day_types: &[DayType], rng: &mut RngService) -> Result<Vec<DailyProfile>> {
        check_day_count(day_types.len())?;
        let peak = peak_time_range(&self.use_case, self.peak_enlarge, rng);

        let mut profiles = Vec::with_capacity(day_types.len());
        for (day, &day_type) in day_types.iter().enumerate() {
            let ctx = DayContext {
                day,
                day_type,
                peak,
                params: self.params,
            };
            let mut community = vec![0.0; MINUTES_PER_DAY];
            for user in &self.use_case.users {
                for _ in 0..user.num_users {
                    for appliance in &user.appliances {
                        let load =
                            generate_daily_profile(appliance, user.user_preference, &ctx, rng)?;
                        accumulate(&mut community, &load);
                    }
                }
            }
            profiles.push(community);
        }
        Ok(profiles)
    }

    /// Generates the same output shape with a parallel fan-out over
    /// (day, appliance, copy) tasks.
    ///
    /// Each task runs to completion on its own RNG substream derived from
    /// (seed, day, appliance, copy), so results match the sequential mode in
    /// distribution though not bit for bit. Partial results are never
    /// returned: the first failing task fails the run.
    pub fn run_parallel(&self, day_types: &[DayType], seed: u64) -> Result<Vec<DailyProfile>> {
        check_day_count(day_types.len())?;
        let mut root = RngService::from_seed(seed);
        let peak = peak_time_range(&self.use_case, self.peak_enlarge, &mut root);

        let mut tasks = Vec::new();
        for (day, &day_type) in day_types.iter().enumerate() {
            let mut app_uid = 0usize;
            for (user_idx, user) in self.use_case.users.iter().enumerate() {
                for app_idx in 0..user.appliances.len() {
                    for copy in 0..user.num_users as usize {
                        tasks.push(Task {
                            day,
                            day_type,
                            user_idx,
                            app_idx,
                            app_uid,
                            copy,
                        });
                    }
                    app_uid += 1;
                }
            }
        }

        let progress = ProgressBar::new(tasks.len() as u64);
        let partials: Result<Vec<(usize, DailyProfile)>> = tasks
            .par_iter()
            .map(|task| {
                let user = &self.use_case.users[task.user_idx];
                let appliance = &user.appliances[task.app_idx];
                let mut rng = RngService::substream(seed, task.day, task.app_uid, task.copy);
                let ctx = DayContext {
                    day: task.day,
                    day_type: task.day_type,
                    peak,
                    params: self.params,
                };
                let load = generate_daily_profile(appliance, user.user_preference, &ctx, &mut rng)?;
                progress.inc(1);
                Ok((task.day, load))
            })
            .collect();
        progress.finish_and_clear();

        let mut profiles = vec![vec![0.0; MINUTES_PER_DAY]; day_types.len()];
        for (day, load) in partials? {
            accumulate(&mut profiles[day], &load);
        }
        Ok(profiles)
    }
}

fn check_day_count(requested: usize) -> Result<()> {
    if requested > 365 {
        return Err(Error::InvalidArgument(format!(
            "cannot generate {requested} profiles, day indices must stay in [0, 365)"
        )));
    }
    Ok(())
}

fn accumulate(total: &mut [f64], load: &[f64]) {
    for (t, v) in total.iter_mut().zip(load) {
        *t += v;
    }
}
