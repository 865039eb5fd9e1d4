//! Per-day rated power with seasonal variation.
//!
//! Catalog cells accept a plain scalar (broadcast to the whole year), a JSON
//! array of 366 values, or a JSON array of 366 single-element rows (the first
//! column of a serialized table). Anything else is rejected.

use serde_json::Value;

use crate::error::{Error, Result};

/// Entries in a normalized power series, one per day of a leap year.
pub const POWER_SERIES_LEN: usize = 366;

/// Rated power in watts for every day of the year.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerSeries(Vec<f64>);

impl PowerSeries {
    /// Broadcasts a single rating to all 366 days.
    pub fn scalar(watts: f64) -> Self {
        Self(vec![watts; POWER_SERIES_LEN])
    }

    /// Wraps an explicit series; the length must be exactly 366.
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        if values.len() != POWER_SERIES_LEN {
            return Err(Error::config(
                "power",
                format!(
                    "seasonal series must have {POWER_SERIES_LEN} entries, got {}",
                    values.len()
                ),
            ));
        }
        Ok(Self(values))
    }

    /// Parses a catalog cell: scalar, JSON array, or JSON single-column rows.
    pub fn parse(field: &str, cell: &str) -> Result<Self> {
        let cell = cell.trim();
        if let Ok(watts) = cell.parse::<f64>() {
            return Ok(Self::scalar(watts));
        }
        let json: Value = serde_json::from_str(cell).map_err(|_| {
            Error::config(field, "must be a number or a JSON-encoded series".to_string())
        })?;
        let rows = match json {
            Value::Array(rows) => rows,
            _ => {
                return Err(Error::config(
                    field,
                    "JSON power input must be an array".to_string(),
                ));
            }
        };
        let mut values = Vec::with_capacity(rows.len());
        for row in rows {
            let number = match row {
                Value::Number(n) => n.as_f64(),
                // serialized table row: take the first column
                Value::Array(cols) => cols.first().and_then(Value::as_f64),
                _ => None,
            };
            match number {
                Some(v) => values.push(v),
                None => {
                    return Err(Error::config(
                        field,
                        "JSON power entries must be numbers".to_string(),
                    ));
                }
            }
        }
        Self::from_values(values).map_err(|_| {
            Error::config(
                field,
                format!("seasonal series must have {POWER_SERIES_LEN} entries"),
            )
        })
    }

    /// Rating for one day; callers validate the day index.
    pub fn get(&self, day: usize) -> f64 {
        self.0[day]
    }

    /// Year-round mean rating, used by the theoretical maximum profile.
    pub fn mean(&self) -> f64 {
        self.0.iter().sum::<f64>() / self.0.len() as f64
    }

    /// The single rating when the series is constant.
    pub fn as_scalar(&self) -> Option<f64> {
        let first = self.0[0];
        self.0.iter().all(|&v| v == first).then_some(first)
    }

    /// Catalog cell representation; constant series collapse to the scalar.
    pub fn to_cell(&self) -> String {
        match self.as_scalar() {
            Some(watts) => format!("{watts}"),
            // a Vec of f64 always serializes
            None => serde_json::to_string(&self.0).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{POWER_SERIES_LEN, PowerSeries};

    #[test]
    fn scalar_broadcasts_to_full_year() {
        let p = PowerSeries::scalar(100.0);
        assert_eq!(p.get(0), 100.0);
        assert_eq!(p.get(POWER_SERIES_LEN - 1), 100.0);
        assert_eq!(p.mean(), 100.0);
    }

    #[test]
    fn from_values_rejects_wrong_length() {
        assert!(PowerSeries::from_values(vec![1.0; 365]).is_err());
        assert!(PowerSeries::from_values(vec![1.0; POWER_SERIES_LEN]).is_ok());
    }

    #[test]
    fn parse_scalar_cell() {
        let p = PowerSeries::parse("power", "150.5");
        assert_eq!(p.ok().map(|p| p.get(10)), Some(150.5));
    }

    #[test]
    fn parse_json_array_cell() {
        let cell = serde_json::to_string(&vec![2.0; POWER_SERIES_LEN]).expect("serialize");
        let p = PowerSeries::parse("power", &cell);
        assert_eq!(p.ok().map(|p| p.mean()), Some(2.0));
    }

    #[test]
    fn parse_json_rows_takes_first_column() {
        let rows: Vec<Vec<f64>> = (0..POWER_SERIES_LEN).map(|i| vec![i as f64]).collect();
        let cell = serde_json::to_string(&rows).expect("serialize");
        let p = PowerSeries::parse("power", &cell);
        assert_eq!(p.ok().map(|p| p.get(3)), Some(3.0));
    }

    #[test]
    fn parse_rejects_wrong_json_shape() {
        assert!(PowerSeries::parse("power", "{\"a\": 1}").is_err());
        assert!(PowerSeries::parse("power", "[1, 2, 3]").is_err());
        assert!(PowerSeries::parse("power", "not a number").is_err());
    }

    #[test]
    fn cell_round_trip_scalar_and_series() {
        let scalar = PowerSeries::scalar(70.0);
        assert_eq!(scalar.to_cell(), "70");
        let reparsed = PowerSeries::parse("power", &scalar.to_cell());
        assert_eq!(reparsed.ok().as_ref(), Some(&scalar));

        let mut values = vec![5.0; POWER_SERIES_LEN];
        values[100] = 9.0;
        let series = PowerSeries::from_values(values).expect("valid length");
        let reparsed = PowerSeries::parse("power", &series.to_cell());
        assert_eq!(reparsed.ok().as_ref(), Some(&series));
    }
}
