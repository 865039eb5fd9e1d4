//! User categories: named groups of identical members owning appliances.

use crate::error::{Error, Result};
use crate::model::appliance::{Appliance, ApplianceConfig};
use crate::model::window::MINUTES_PER_DAY;
use crate::model::DailyProfile;

/// A user category with `num_users` identical members.
///
/// Users own their appliances outright; generation code receives the pieces
/// of user context it needs (the preference count) instead of appliances
/// holding back-references.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub name: String,
    pub num_users: u32,
    /// Number of preference slots; 0 disables preference filtering.
    pub user_preference: u32,
    pub appliances: Vec<Appliance>,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        num_users: u32,
        user_preference: u32,
    ) -> Result<Self> {
        let name = name.into();
        if num_users < 1 {
            return Err(Error::config(
                format!("user.{name}.num_users"),
                "must be >= 1",
            ));
        }
        Ok(Self {
            name,
            num_users,
            user_preference,
            appliances: Vec::new(),
        })
    }

    /// Validates and adds one appliance to the category.
    pub fn add_appliance(&mut self, cfg: ApplianceConfig) -> Result<()> {
        if cfg.pref_index > self.user_preference {
            return Err(Error::config(
                format!("appliance.{}.pref_index", cfg.name),
                format!(
                    "must be <= user_preference ({}), got {}",
                    self.user_preference, cfg.pref_index
                ),
            ));
        }
        self.appliances.push(Appliance::new(cfg)?);
        Ok(())
    }

    /// Theoretical maximum: the appliance maxima summed and scaled by the
    /// member count.
    pub fn maximum_profile(&self) -> DailyProfile {
        let mut profile = vec![0.0; MINUTES_PER_DAY];
        for appliance in &self.appliances {
            for (total, value) in profile.iter_mut().zip(appliance.maximum_profile()) {
                *total += value;
            }
        }
        for value in &mut profile {
            *value *= self.num_users as f64;
        }
        profile
    }
}
