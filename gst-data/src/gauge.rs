//! Recorded gauge series paired with observed (DART buoy) data.
//!
//! Observations travel in an explicit [`ObservationSet`] handed to the
//! comparison, keyed by gauge number.

use crate::error::{DataError, Result};
use gst_claw::gauge::GaugeSeries;
use gst_claw::solution::parse_real;
use log::{info, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Suffix of detided DART records, `<gaugeno>..._notide.txt`
pub const DART_SUFFIX: &str = "_notide.txt";

/// Observed `(t seconds, eta)` samples keyed by gauge number
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationSet {
    series: BTreeMap<u32, Vec<(f64, f64)>>,
}

impl ObservationSet {
    pub fn new() -> ObservationSet {
        ObservationSet::default()
    }

    pub fn insert(&mut self, gaugeno: u32, samples: Vec<(f64, f64)>) {
        self.series.insert(gaugeno, samples);
    }

    pub fn get(&self, gaugeno: u32) -> Option<&[(f64, f64)]> {
        self.series.get(&gaugeno).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Parse a two column whitespace table; `#` lines and blanks are skipped.
    pub fn parse_table(text: &str) -> std::result::Result<Vec<(f64, f64)>, String> {
        let mut samples = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut tokens = line.split_whitespace();
            let (Some(t), Some(eta)) = (tokens.next(), tokens.next()) else {
                return Err(format!("line {}: expected at least 2 columns", idx + 1));
            };
            match (parse_real(t), parse_real(eta)) {
                (Some(t), Some(eta)) => samples.push((t, eta)),
                _ => return Err(format!("line {}: non-numeric value", idx + 1)),
            }
        }
        Ok(samples)
    }

    /// Load one file per listed gauge.
    pub fn from_files(files: &[(u32, PathBuf)]) -> Result<ObservationSet> {
        let mut set = ObservationSet::new();
        for (gaugeno, path) in files {
            let text = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
            let samples = ObservationSet::parse_table(&text).map_err(|reason| {
                DataError::MalformedObservations {
                    path: path.clone(),
                    reason,
                }
            })?;
            set.insert(*gaugeno, samples);
        }
        Ok(set)
    }

    /// Scan `dir` for `<gaugeno>*_notide.txt` for each gauge. Gauges with
    /// no match or several matches are skipped with a warning.
    pub fn from_dart_dir(dir: &Path, gaugenos: &[u32]) -> Result<ObservationSet> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .map_err(|e| DataError::io(dir, e))?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.ends_with(DART_SUFFIX))
            .collect();
        names.sort();

        let mut files = Vec::new();
        for &gaugeno in gaugenos {
            let prefix = gaugeno.to_string();
            let matches: Vec<&String> = names.iter().filter(|n| n.starts_with(&prefix)).collect();
            if matches.len() != 1 {
                warn!(
                    "found {} observation files for gauge {} in {:?}",
                    matches.len(),
                    gaugeno,
                    dir
                );
                continue;
            }
            files.push((gaugeno, dir.join(matches[0])));
        }
        let set = ObservationSet::from_files(&files)?;
        info!("Loaded observations for {} gauges from {:?}", set.len(), dir);
        Ok(set)
    }
}

/// Simulated series from one or more runs, plus observations when known
#[derive(Debug, Clone)]
pub struct GaugeComparison {
    pub gaugeno: u32,
    pub runs: Vec<(String, GaugeSeries)>,
    pub observed: Option<Vec<(f64, f64)>>,
}

impl GaugeComparison {
    /// Legend entries in drawing order
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.runs.iter().map(|(label, _)| label.as_str()).collect();
        if self.observed.is_some() {
            labels.push("DART data");
        }
        labels
    }
}

/// Read gauge `gaugeno` from each labelled output directory.
pub fn compare_gauge(
    gaugeno: u32,
    runs: &[(String, PathBuf)],
    observations: &ObservationSet,
) -> Result<GaugeComparison> {
    let mut series = Vec::with_capacity(runs.len());
    for (label, outdir) in runs {
        series.push((label.clone(), GaugeSeries::read(gaugeno, outdir)?));
    }
    Ok(GaugeComparison {
        gaugeno,
        runs: series,
        observed: observations.get(gaugeno).map(<[(f64, f64)]>::to_vec),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gst-data-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_table() {
        let samples = ObservationSet::parse_table("# t eta\n0.0 0.01\n\n60.0 -0.02 extra\n").unwrap();
        assert_eq!(samples, vec![(0.0, 0.01), (60.0, -0.02)]);
        assert!(ObservationSet::parse_table("0.0\n").is_err());
        assert!(ObservationSet::parse_table("0.0 abc\n").is_err());
    }

    #[test]
    fn test_from_dart_dir() {
        let dir = scratch("dart");
        std::fs::write(dir.join("21401_notide.txt"), "0.0 0.0\n60.0 0.1\n").unwrap();
        std::fs::write(dir.join("21413a_notide.txt"), "0.0 0.0\n").unwrap();
        std::fs::write(dir.join("21413b_notide.txt"), "0.0 0.0\n").unwrap();
        let set = ObservationSet::from_dart_dir(&dir, &[21401, 21413, 52402]).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(21401), Some(&[(0.0, 0.0), (60.0, 0.1)][..]));
        assert!(set.get(21413).is_none());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_compare_gauge_with_and_without_observations() {
        let dir = scratch("gauge");
        std::fs::write(
            dir.join("gauge21401.txt"),
            "# gauge_id= 21401\n# columns\n 1  0.0  4000.0 0.0 0.0  0.0\n 1  60.0 4000.0 0.0 0.0 0.05\n",
        )
        .unwrap();
        let mut observations = ObservationSet::new();
        observations.insert(21401, vec![(0.0, 0.0)]);
        let runs = vec![("SWE".to_string(), dir.clone())];

        let cmp = compare_gauge(21401, &runs, &observations).unwrap();
        assert_eq!(cmp.runs[0].1.eta, vec![0.0, 0.05]);
        assert_eq!(cmp.labels(), vec!["SWE", "DART data"]);

        let cmp = compare_gauge(21401, &runs, &ObservationSet::new()).unwrap();
        assert!(cmp.observed.is_none());
        assert_eq!(cmp.labels(), vec!["SWE"]);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
