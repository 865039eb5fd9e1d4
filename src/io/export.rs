//! CSV export for generated load profiles.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::model::{DailyProfile, MINUTES_PER_DAY};

/// Column header for the flattened series export.
const HEADER: &str = "minute,power_w";

/// Exports generated profiles to a CSV file at the given path.
///
/// The days are flattened row-major into one continuous minute series, so a
/// seven-day run yields 7 x 1440 data rows. Produces deterministic output
/// for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(profiles: &[DailyProfile], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_series_csv(profiles, buf)
}

/// Writes the flattened series as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_series_csv(profiles: &[DailyProfile], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    let mut minute = 0usize;
    for profile in profiles {
        for &watts in profile {
            wtr.write_record(&[minute.to_string(), format!("{watts:.4}")])?;
            minute += 1;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Mean daily curve across all generated profiles.
pub fn average_profile(profiles: &[DailyProfile]) -> DailyProfile {
    let mut avg = vec![0.0; MINUTES_PER_DAY];
    if profiles.is_empty() {
        return avg;
    }
    for profile in profiles {
        for (total, &value) in avg.iter_mut().zip(profile) {
            *total += value;
        }
    }
    for value in &mut avg {
        *value /= profiles.len() as f64;
    }
    avg
}
