// Trigger rate from an LBNEWare CSV export. Each event row carries the internal 48-bit
// timestamp split over three 16-bit columns, counted in ticks of the 150 MHz clock.
// Rows that don't have the full column count (headers of sub-tables, summary lines, ...)
// are skipped.
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::constants::{
    CLOCK_FREQUENCY_HZ, TIMESTAMP_HIGH_COLUMN, TIMESTAMP_LOW_COLUMN, TIMESTAMP_MID_COLUMN,
    TRIGGER_ROW_COLUMNS,
};
use super::error::TriggerRateError;

/// Rebuild a timestamp from its three 16-bit words
pub fn reconstruct_timestamp(low: u16, mid: u16, high: u16) -> u64 {
    ((high as u64) << 32) + ((mid as u64) << 16) + low as u64
}

/// Summary of the events found in a trigger export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerRate {
    pub n_events: usize,
    pub first_timestamp: u64,
    pub last_timestamp: u64,
}

impl TriggerRate {
    /// Read a CSV export from disk
    pub fn from_file(path: &Path) -> Result<Self, TriggerRateError> {
        if !path.exists() {
            return Err(TriggerRateError::BadFilePath(path.to_path_buf()));
        }
        let mut contents = String::new();
        let mut file = File::open(path)?;
        file.read_to_string(&mut contents)?;
        let rate = Self::from_csv(&contents)?;
        spdlog::info!(
            "Found {} events in {} spanning {:.6} s",
            rate.n_events,
            path.display(),
            rate.duration_seconds()
        );
        Ok(rate)
    }

    /// Parse CSV text. The first line is a header and is always skipped.
    pub fn from_csv(contents: &str) -> Result<Self, TriggerRateError> {
        let mut n_events: usize = 0;
        let mut first_timestamp: u64 = 0;
        let mut last_timestamp: u64 = 0;

        for (row, line) in contents.lines().enumerate().skip(1) {
            let entries: Vec<&str> = line.split(',').collect();
            if entries.len() != TRIGGER_ROW_COLUMNS {
                continue;
            }
            let word = |col: usize| {
                entries[col]
                    .trim()
                    .parse::<u16>()
                    .map_err(|e| TriggerRateError::ParsingError(row + 1, e))
            };
            let timestamp = reconstruct_timestamp(
                word(TIMESTAMP_LOW_COLUMN)?,
                word(TIMESTAMP_MID_COLUMN)?,
                word(TIMESTAMP_HIGH_COLUMN)?,
            );
            if n_events == 0 {
                first_timestamp = timestamp;
            }
            last_timestamp = timestamp;
            n_events += 1;
        }

        let rate = Self {
            n_events,
            first_timestamp,
            last_timestamp,
        };
        if n_events < 2 || rate.span_ticks() <= 0 {
            return Err(TriggerRateError::InsufficientData(
                n_events,
                rate.span_ticks(),
            ));
        }
        Ok(rate)
    }

    /// Clock ticks between the first and last event. Negative if the clock wrapped.
    pub fn span_ticks(&self) -> i128 {
        self.last_timestamp as i128 - self.first_timestamp as i128
    }

    pub fn duration_seconds(&self) -> f64 {
        self.span_ticks() as f64 / CLOCK_FREQUENCY_HZ
    }

    /// Events per second
    pub fn rate_hz(&self) -> f64 {
        self.n_events as f64 / self.span_ticks() as f64 * CLOCK_FREQUENCY_HZ
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(low: u16, mid: u16, high: u16) -> String {
        let mut cols = vec![String::from("0"); TRIGGER_ROW_COLUMNS];
        cols[TIMESTAMP_LOW_COLUMN] = low.to_string();
        cols[TIMESTAMP_MID_COLUMN] = mid.to_string();
        cols[TIMESTAMP_HIGH_COLUMN] = high.to_string();
        cols.join(",")
    }

    #[test]
    fn test_reconstruct_timestamp() {
        assert_eq!(reconstruct_timestamp(1, 0, 0), 1);
        assert_eq!(reconstruct_timestamp(0, 1, 0), 65536);
        assert_eq!(reconstruct_timestamp(3, 2, 1), (1 << 32) + (2 << 16) + 3);
    }

    #[test]
    fn test_rate() {
        let csv = [
            String::from("header"),
            row(0, 0, 0),
            String::from("1,2,3"),
            row(0, 1, 0),
            row(0, 2, 0),
            row(0, 3, 0),
        ]
        .join("\n");
        let rate = TriggerRate::from_csv(&csv).unwrap();
        assert_eq!(rate.n_events, 4);
        assert_eq!(rate.span_ticks(), 3 * 65536);
        let expected = 4.0 / (3.0 * 65536.0) * 150.0e6;
        assert!((rate.rate_hz() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_header_only_row_is_skipped() {
        // a full-width header must not be parsed as an event
        let header = vec!["col"; TRIGGER_ROW_COLUMNS].join(",");
        let csv = [header, row(0, 0, 0), row(100, 0, 0)].join("\n");
        let rate = TriggerRate::from_csv(&csv).unwrap();
        assert_eq!(rate.n_events, 2);
    }

    #[test]
    fn test_insufficient_data() {
        let csv = [String::from("header"), row(5, 0, 0)].join("\n");
        assert!(matches!(
            TriggerRate::from_csv(&csv),
            Err(TriggerRateError::InsufficientData(1, _))
        ));
    }

    #[test]
    fn test_bad_word() {
        let mut cols: Vec<String> = row(0, 0, 0).split(',').map(String::from).collect();
        cols[TIMESTAMP_LOW_COLUMN] = String::from("nope");
        let csv = [String::from("header"), row(0, 0, 0), cols.join(",")].join("\n");
        assert!(matches!(
            TriggerRate::from_csv(&csv),
            Err(TriggerRateError::ParsingError(3, _))
        ));
    }
}
