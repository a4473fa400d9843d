//! Shared utility functions for GST crates.

/// Simulation time utility functions
pub mod time {
    pub const SECONDS_PER_HOUR: f64 = 3600.0;

    /// Convert a simulation time in seconds to hours
    pub fn hours(t: f64) -> f64 {
        t / SECONDS_PER_HOUR
    }

    /// Format a simulation time in seconds as "H:MM:SS".
    /// e.g., 3725.0 -> "1:02:05"
    pub fn format_hms(t: f64) -> String {
        let total = t.max(0.0).floor() as u64;
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        let seconds = total % 60;
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_format_hms() {
            assert_eq!(format_hms(0.0), "0:00:00");
            assert_eq!(format_hms(3725.0), "1:02:05");
            assert_eq!(format_hms(4.25 * 3600.0), "4:15:00");
        }

        #[test]
        fn test_hours() {
            assert_eq!(hours(5.0 * 3600.0), 5.0);
        }
    }
}

/// Coordinate grid helpers
pub mod grid {
    /// `n` evenly spaced values from `start` to `end`, both included.
    ///
    /// Returns an empty Vec for `n == 0` and `[start]` for `n == 1`.
    pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
        match n {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (end - start) / (n - 1) as f64;
                (0..n)
                    .map(|i| {
                        if i == n - 1 {
                            end
                        } else {
                            start + step * i as f64
                        }
                    })
                    .collect()
            }
        }
    }

}

/// Solver output file naming
pub mod files {
    /// Zero-padded numbered file name, e.g. `numbered("fort.q", 4, 4)` -> "fort.q0004"
    pub fn numbered(prefix: &str, number: usize, width: usize) -> String {
        format!("{}{:0width$}", prefix, number, width = width)
    }

    /// Frame file names use four digits: fort.t0004, fort.q0004, fort.b0004
    pub fn frame_file(kind: char, frameno: usize) -> String {
        numbered(&format!("fort.{}", kind), frameno, 4)
    }

    /// Gauge output files use five digits: gauge01001.txt
    pub fn gauge_file(gaugeno: u32) -> String {
        format!("{}.txt", numbered("gauge", gaugeno as usize, 5))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_frame_file() {
            assert_eq!(frame_file('t', 4), "fort.t0004");
            assert_eq!(frame_file('b', 12), "fort.b0012");
        }

        #[test]
        fn test_gauge_file() {
            assert_eq!(gauge_file(1001), "gauge01001.txt");
            assert_eq!(gauge_file(7760), "gauge07760.txt");
        }
    }
}

/// Resolution of required external locations
pub mod context {
    use crate::error::ContextError;
    use std::path::{Path, PathBuf};

    /// Resolve a required directory from an explicit path or, failing that,
    /// from the environment variable `var`. The directory must exist.
    pub fn resolve_dir(explicit: Option<&Path>, var: &str) -> Result<PathBuf, ContextError> {
        let dir = match explicit {
            Some(path) => path.to_path_buf(),
            None => match std::env::var_os(var) {
                Some(value) if !value.is_empty() => PathBuf::from(value),
                _ => return Err(ContextError::Unset(var.to_string())),
            },
        };
        if !dir.is_dir() {
            return Err(ContextError::NotADirectory {
                var: var.to_string(),
                path: dir,
            });
        }
        Ok(dir)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_resolve_explicit_dir() {
            let tmp = std::env::temp_dir();
            let dir = resolve_dir(Some(&tmp), "GST_TEST_UNUSED_VAR").unwrap();
            assert_eq!(dir, tmp);
        }

        #[test]
        fn test_resolve_unset_var() {
            let err = resolve_dir(None, "GST_TEST_SURELY_UNSET_VAR").unwrap_err();
            assert!(matches!(err, ContextError::Unset(_)));
        }

        #[test]
        fn test_resolve_missing_dir() {
            let missing = std::env::temp_dir().join("gst-utils-no-such-dir");
            let err = resolve_dir(Some(&missing), "TOPO_DIR").unwrap_err();
            assert!(matches!(err, ContextError::NotADirectory { .. }));
        }
    }
}

/// Error types
pub mod error {
    use std::path::PathBuf;
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum ContextError {
        #[error("environment variable {0} is not set")]
        Unset(String),

        #[error("{var} points to {path:?}, which is not a directory")]
        NotADirectory { var: String, path: PathBuf },
    }
}
