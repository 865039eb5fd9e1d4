//! Domain model: use cases, user categories, appliances, windows, and duty
//! cycles. Everything here is immutable after construction; per-day scratch
//! lives inside the generator calls in [`crate::sim`].

pub mod appliance;
pub mod duty_cycle;
pub mod power;
pub mod use_case;
pub mod user;
pub mod window;

pub use appliance::{Appliance, ApplianceConfig};
pub use duty_cycle::{DutyCycle, DutyCycleConfig};
pub use power::PowerSeries;
pub use use_case::UseCase;
pub use user::User;
pub use window::{MINUTES_PER_DAY, Window};

use crate::error::Error;

/// One generated day of power samples in watts, one per minute.
pub type DailyProfile = Vec<f64>;

/// Kind of simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayType {
    Weekday,
    Weekend,
}

/// Days of the week an appliance may operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayScope {
    WeekdaysOnly,
    WeekendsOnly,
    #[default]
    AllDays,
}

impl DayScope {
    /// Numeric code used by the catalog table.
    pub fn code(self) -> u8 {
        match self {
            Self::WeekdaysOnly => 0,
            Self::WeekendsOnly => 1,
            Self::AllDays => 2,
        }
    }

    /// Parses the catalog code, rejecting non-enumerated values.
    pub fn from_code(code: u8) -> crate::error::Result<Self> {
        match code {
            0 => Ok(Self::WeekdaysOnly),
            1 => Ok(Self::WeekendsOnly),
            2 => Ok(Self::AllDays),
            other => Err(Error::config(
                "wd_we_type",
                format!("must be 0 (weekday), 1 (weekend) or 2 (either), got {other}"),
            )),
        }
    }

    /// Whether the appliance is allowed on the given day type.
    pub fn allows(self, day: DayType) -> bool {
        match self {
            Self::WeekdaysOnly => day == DayType::Weekday,
            Self::WeekendsOnly => day == DayType::Weekend,
            Self::AllDays => true,
        }
    }
}
