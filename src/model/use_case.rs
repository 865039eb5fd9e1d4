//! A named collection of user categories forming one community.

use crate::model::user::User;
use crate::model::window::MINUTES_PER_DAY;
use crate::model::DailyProfile;

/// The modeled community: every user category whose load is aggregated.
#[derive(Debug, Clone, PartialEq)]
pub struct UseCase {
    pub name: String,
    pub users: Vec<User>,
}

impl UseCase {
    pub fn new(name: impl Into<String>, users: Vec<User>) -> Self {
        Self {
            name: name.into(),
            users,
        }
    }

    pub fn add_user(&mut self, user: User) {
        self.users.push(user);
    }

    /// Total appliance rows across all users, the catalog row count.
    pub fn appliance_count(&self) -> usize {
        self.users.iter().map(|u| u.appliances.len()).sum()
    }

    /// Community theoretical maximum, the sum of the user maxima.
    pub fn maximum_profile(&self) -> DailyProfile {
        let mut profile = vec![0.0; MINUTES_PER_DAY];
        for user in &self.users {
            for (total, value) in profile.iter_mut().zip(user.maximum_profile()) {
                *total += value;
            }
        }
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::UseCase;
    use crate::model::appliance::ApplianceConfig;
    use crate::model::power::PowerSeries;
    use crate::model::user::User;
    use crate::model::window::Window;

    #[test]
    fn community_maximum_sums_users() {
        let mut a = User::new("a", 1, 0).expect("valid");
        a.add_appliance(ApplianceConfig {
            name: "x".to_string(),
            power: PowerSeries::scalar(10.0),
            windows: [
                Window { start: 0, end: 10 },
                Window::EMPTY,
                Window::EMPTY,
            ],
            func_time: 5,
            ..ApplianceConfig::default()
        })
        .expect("valid appliance");
        let mut b = User::new("b", 2, 0).expect("valid");
        b.add_appliance(ApplianceConfig {
            name: "y".to_string(),
            power: PowerSeries::scalar(5.0),
            windows: [
                Window { start: 5, end: 15 },
                Window::EMPTY,
                Window::EMPTY,
            ],
            func_time: 5,
            ..ApplianceConfig::default()
        })
        .expect("valid appliance");

        let uc = UseCase::new("two users", vec![a, b]);
        assert_eq!(uc.appliance_count(), 2);
        let max = uc.maximum_profile();
        assert_eq!(max[0], 10.0);
        assert_eq!(max[7], 20.0);
        assert_eq!(max[12], 10.0);
        assert_eq!(max[15], 0.0);
    }
}
