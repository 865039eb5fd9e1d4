//! Weekday/weekend calendar oracle.
//!
//! The engine only needs a day type per requested day; this module supplies
//! the default yearly pattern and is otherwise opaque to the simulation.

use crate::model::DayType;

/// Days in the simulated year.
pub const DAYS_PER_YEAR: usize = 365;

/// Day type by day-of-year index: the 6th and 7th day of every week are
/// weekends, starting the year on a weekday.
pub fn day_type_of(day_index: usize) -> DayType {
    if day_index % 7 >= 5 {
        DayType::Weekend
    } else {
        DayType::Weekday
    }
}

/// The full-year weekday/weekend pattern.
pub fn yearly_pattern() -> Vec<DayType> {
    (0..DAYS_PER_YEAR).map(day_type_of).collect()
}
