//! Relative mass drift from solver conservation logs.
//!
//! Two log shapes occur in practice. The 2-D runs print lines such as
//!
//! ```text
//! mass at t=   0.3600000E+04,  dmass=   0.1182363E+08
//! ```
//!
//! where the time is the fourth whitespace token (trailing comma
//! stripped) and the mass value is the last. The 1-D runs write a numeric table
//! whose columns are picked by index. Both are described by [`LogFormat`].

use crate::error::{DataError, Result};
use gst_claw::solution::parse_real;
use log::{debug, info};
use serde::Serialize;
use std::path::Path;

/// Where the mass value sits on a record
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MassToken {
    Last,
    Index(usize),
}

/// What the logged mass column holds
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum LoggedQuantity {
    /// Total mass; drift is `|mass - reference| / reference`
    #[default]
    Total,
    /// Mass change since the start; drift is `|change| / reference`
    Change,
}

/// Token layout of one log record
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct LogFormat {
    pub time_token: usize,
    pub mass_token: MassToken,
    /// When set, records with any other token count are malformed
    pub token_count: Option<usize>,
    pub quantity: LoggedQuantity,
}

impl Default for LogFormat {
    fn default() -> Self {
        LogFormat {
            time_token: 3,
            mass_token: MassToken::Last,
            token_count: None,
            quantity: LoggedQuantity::Total,
        }
    }
}

impl LogFormat {
    /// Whitespace separated numeric table with time and mass columns
    pub fn table(time_column: usize, mass_column: usize) -> LogFormat {
        LogFormat {
            time_token: time_column,
            mass_token: MassToken::Index(mass_column),
            token_count: None,
            quantity: LoggedQuantity::Total,
        }
    }

    pub fn with_quantity(self, quantity: LoggedQuantity) -> LogFormat {
        LogFormat { quantity, ..self }
    }

    fn parse(&self, lineno: usize, line: &str) -> Result<(f64, f64)> {
        let malformed = |reason: String| DataError::MalformedLogLine { lineno, reason };
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if let Some(expected) = self.token_count {
            if tokens.len() != expected {
                return Err(malformed(format!(
                    "expected {} tokens, found {}",
                    expected,
                    tokens.len()
                )));
            }
        }
        let mass_index = match self.mass_token {
            MassToken::Last => tokens.len().checked_sub(1),
            MassToken::Index(idx) => Some(idx),
        };
        let time_token = tokens
            .get(self.time_token)
            .ok_or_else(|| malformed(format!("no time token at position {}", self.time_token)))?;
        let mass_token = mass_index
            .and_then(|idx| tokens.get(idx))
            .ok_or_else(|| malformed("no mass token".to_string()))?;
        let time = parse_real(time_token)
            .filter(|t| t.is_finite())
            .ok_or_else(|| malformed(format!("time {:?} is not a finite number", time_token)))?;
        let mass = parse_real(mass_token)
            .filter(|m| m.is_finite())
            .ok_or_else(|| malformed(format!("mass {:?} is not a finite number", mass_token)))?;
        Ok((time, mass))
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct DriftOptions {
    pub format: LogFormat,
    /// Samples after this time are reported as NaN
    pub cutoff: Option<f64>,
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct DriftSample {
    pub time: f64,
    pub drift: f64,
}

/// One drift sample per log record, in record order.
///
/// Any record that does not parse fails the whole series; nothing is
/// skipped silently.
pub fn relative_mass_drift<S: AsRef<str>>(
    log_lines: &[S],
    reference_mass: f64,
    options: &DriftOptions,
) -> Result<Vec<DriftSample>> {
    if !reference_mass.is_finite() || reference_mass == 0.0 {
        return Err(DataError::InvalidReferenceMass(reference_mass));
    }
    let mut samples = Vec::with_capacity(log_lines.len());
    for (idx, line) in log_lines.iter().enumerate() {
        let (time, mass) = options.format.parse(idx + 1, line.as_ref())?;
        let deviation = match options.format.quantity {
            LoggedQuantity::Total => mass - reference_mass,
            LoggedQuantity::Change => mass,
        };
        let drift = match options.cutoff {
            Some(cutoff) if time > cutoff => f64::NAN,
            _ => (deviation / reference_mass).abs(),
        };
        samples.push(DriftSample { time, drift });
    }
    debug!(
        "{} drift samples, max {:.3e}",
        samples.len(),
        max_drift(&samples)
    );
    Ok(samples)
}

/// Largest finite drift in `samples`, 0 when there is none
pub fn max_drift(samples: &[DriftSample]) -> f64 {
    samples
        .iter()
        .map(|s| s.drift)
        .filter(|d| d.is_finite())
        .fold(0.0, f64::max)
}

/// Read non-blank, non-comment records from a mass log, skipping the first
/// `skip` records.
pub fn read_mass_log(path: &Path, skip: usize) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
    let records: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .skip(skip)
        .map(str::to_string)
        .collect();
    info!("Read {} mass log records from {:?}", records.len(), path);
    Ok(records)
}

pub fn write_drift_csv(samples: &[DriftSample], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for sample in samples {
        writer.serialize(sample)?;
    }
    writer.flush().map_err(|e| DataError::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(t: &str, m: &str) -> String {
        format!("mass at t= {}, total= {}", t, m)
    }

    #[test]
    fn test_drift_example() {
        let lines = vec![line("3600.0", "1000.5"), line("7200.0", "999.0")];
        let samples = relative_mass_drift(&lines, 1000.0, &DriftOptions::default()).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].time, 3600.0);
        assert_eq!(samples[1].time, 7200.0);
        assert!((samples[0].drift - 0.0005).abs() < 1e-15);
        assert!((samples[1].drift - 0.001).abs() < 1e-15);
    }

    #[test]
    fn test_cutoff_boundary() {
        let cutoff = 18000.0;
        let lines = vec![
            line("17999.0", "1001.0"),
            line("18000.0", "999.0"),
            line("18001.0", "1000.0"),
        ];
        let options = DriftOptions {
            cutoff: Some(cutoff),
            ..Default::default()
        };
        let samples = relative_mass_drift(&lines, 1000.0, &options).unwrap();
        assert_eq!(samples.len(), lines.len());
        assert!(samples[0].drift.is_finite());
        assert!(samples[1].drift.is_finite());
        assert!(samples[2].drift.is_nan());
    }

    #[test]
    fn test_drift_is_non_negative() {
        let lines: Vec<String> = [990.0, 1000.0, 1010.0, 0.0]
            .iter()
            .enumerate()
            .map(|(k, m)| line(&format!("{}.0", k * 60), &m.to_string()))
            .collect();
        let samples = relative_mass_drift(&lines, 1000.0, &DriftOptions::default()).unwrap();
        assert_eq!(samples.len(), 4);
        assert!(samples.iter().all(|s| s.drift >= 0.0));
        assert_eq!(samples[3].drift, 1.0);
    }

    #[test]
    fn test_blank_line_is_malformed() {
        let lines = vec![line("0.0", "1000.0"), String::new()];
        let err = relative_mass_drift(&lines, 1000.0, &DriftOptions::default()).unwrap_err();
        assert!(matches!(err, DataError::MalformedLogLine { lineno: 2, .. }));
    }

    #[test]
    fn test_fortran_exponents_and_commas() {
        let lines = vec![line("0.3600000E+04,", "0.4842468507495660D+15")];
        let samples =
            relative_mass_drift(&lines, 0.484246850749566E+15, &DriftOptions::default()).unwrap();
        assert_eq!(samples[0].time, 3600.0);
        assert!(samples[0].drift < 1e-14);
    }

    #[test]
    fn test_cutoff_gives_nan() {
        let lines = vec![line("0.0", "1000.0"), line("20000.0", "1001.0")];
        let options = DriftOptions {
            cutoff: Some(5.0 * 3600.0),
            ..Default::default()
        };
        let samples = relative_mass_drift(&lines, 1000.0, &options).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].drift, 0.0);
        assert!(samples[1].drift.is_nan());
        assert_eq!(max_drift(&samples), 0.0);
    }

    #[test]
    fn test_malformed_line_fails() {
        let lines = vec![line("0.0", "1000.0"), "mass at t=".to_string()];
        let err = relative_mass_drift(&lines, 1000.0, &DriftOptions::default()).unwrap_err();
        assert!(matches!(err, DataError::MalformedLogLine { lineno: 2, .. }));
    }

    #[test]
    fn test_token_count_enforced() {
        let options = DriftOptions {
            format: LogFormat {
                token_count: Some(6),
                ..Default::default()
            },
            cutoff: None,
        };
        let lines = vec![line("0.0", "1000.0") + " extra"];
        let err = relative_mass_drift(&lines, 1000.0, &options).unwrap_err();
        assert!(matches!(err, DataError::MalformedLogLine { lineno: 1, .. }));
    }

    #[test]
    fn test_non_numeric_mass_fails() {
        let lines = vec![line("0.0", "NaNx")];
        assert!(relative_mass_drift(&lines, 1000.0, &DriftOptions::default()).is_err());
    }

    #[test]
    fn test_non_finite_values_are_malformed() {
        for (t, m) in [("3600.0", "NaN"), ("7200.0", "inf"), ("infinity", "1000.0")] {
            let lines = vec![line("0.0", "1000.0"), line(t, m)];
            let err = relative_mass_drift(&lines, 1000.0, &DriftOptions::default()).unwrap_err();
            assert!(matches!(err, DataError::MalformedLogLine { lineno: 2, .. }));
        }
    }

    #[test]
    fn test_zero_reference_mass() {
        let lines = vec![line("0.0", "1.0")];
        let err = relative_mass_drift(&lines, 0.0, &DriftOptions::default()).unwrap_err();
        assert!(matches!(err, DataError::InvalidReferenceMass(_)));
    }

    #[test]
    fn test_table_with_mass_change() {
        let options = DriftOptions {
            format: LogFormat::table(0, 2).with_quantity(LoggedQuantity::Change),
            cutoff: None,
        };
        let lines = vec!["0.0 1 0.0", "10.0 1 -0.786581E+07"];
        let samples = relative_mass_drift(&lines, 0.786581E+14, &options).unwrap();
        assert_eq!(samples[0].drift, 0.0);
        assert!((samples[1].drift - 1e-7).abs() < 1e-18);
    }

    #[test]
    fn test_read_mass_log_skips_records() {
        let path = std::env::temp_dir().join(format!("gst-data-mass-{}.txt", std::process::id()));
        std::fs::write(&path, "# t n dm\n0.0 1 0.0\n5.0 1 0.0\n\n10.0 1 2.0\n").unwrap();
        let records = read_mass_log(&path, 2).unwrap();
        assert_eq!(records, vec!["10.0 1 2.0".to_string()]);
        std::fs::remove_file(&path).unwrap();
    }
}
