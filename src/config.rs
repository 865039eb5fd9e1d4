//! TOML-based run configuration.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::calendar;
use crate::error::{Error, Result};
use crate::model::DayType;
use crate::sim::peak::DEFAULT_PEAK_ENLARGE;

/// Top-level run configuration parsed from TOML.
///
/// All fields have defaults; load from TOML with
/// [`RunConfig::from_toml_file`] or start from `RunConfig::default()`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Generation parameters.
    #[serde(default)]
    pub run: RunSection,
}

/// Generation parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunSection {
    /// Number of daily profiles to generate (1..=365).
    pub num_profiles: usize,
    /// Day-type policy: `"weekday"`, `"weekend"`, or `"calendar"` (follow the
    /// yearly weekday/weekend pattern by day index).
    pub day_type: String,
    /// Fractional enlargement of the sampled peak time.
    pub peak_enlarge: f64,
    /// Fan work out over (day, appliance, copy) tasks.
    pub parallel: bool,
    /// Master random seed; drawn from the operating system when absent.
    pub seed: Option<u64>,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            num_profiles: 1,
            day_type: "calendar".to_string(),
            peak_enlarge: DEFAULT_PEAK_ENLARGE,
            parallel: false,
            seed: None,
        }
    }
}

/// Day-type policies accepted by `run.day_type`.
const DAY_TYPE_POLICIES: &[&str] = &["weekday", "weekend", "calendar"];

impl RunConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if the file cannot be read or the
    /// TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if the TOML is invalid or contains
    /// unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::config("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<Error> {
        let mut errors = Vec::new();
        let r = &self.run;

        if r.num_profiles == 0 {
            errors.push(Error::config("run.num_profiles", "must be > 0"));
        }
        if r.num_profiles > 365 {
            errors.push(Error::config("run.num_profiles", "must be <= 365"));
        }
        if !DAY_TYPE_POLICIES.contains(&r.day_type.as_str()) {
            errors.push(Error::config(
                "run.day_type",
                format!(
                    "must be one of {}, got \"{}\"",
                    DAY_TYPE_POLICIES.join(", "),
                    r.day_type
                ),
            ));
        }
        if !(0.0..=1.0).contains(&r.peak_enlarge) {
            errors.push(Error::config("run.peak_enlarge", "must be in [0, 1]"));
        }

        errors
    }

    /// Expands the day-type policy into one entry per requested profile.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error for an unknown policy name.
    pub fn resolve_day_types(&self) -> Result<Vec<DayType>> {
        let n = self.run.num_profiles;
        match self.run.day_type.as_str() {
            "weekday" => Ok(vec![DayType::Weekday; n]),
            "weekend" => Ok(vec![DayType::Weekend; n]),
            "calendar" => Ok((0..n).map(calendar::day_type_of).collect()),
            other => Err(Error::config(
                "run.day_type",
                format!("unknown day-type policy \"{other}\""),
            )),
        }
    }
}
