use crate::error::{ClawError, Result};
use crate::solution::parse_real;
use csv::ReaderBuilder;
use gst_utils::files::gauge_file;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A point where the solver records a time series, active for `t1 <= t < t2`.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Gauge {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub t1: f64,
    pub t2: f64,
}

impl Gauge {
    pub fn new(id: u32, x: f64, y: f64, t1: f64, t2: f64) -> Gauge {
        Gauge { id, x, y, t1, t2 }
    }

    /// The activation window must be non-empty and the location finite.
    pub fn validate(&self) -> Result<()> {
        if !(self.x.is_finite() && self.y.is_finite()) {
            return Err(ClawError::InvalidGauge {
                id: self.id,
                reason: format!("location ({}, {}) is not finite", self.x, self.y),
            });
        }
        if !(self.t1 < self.t2) {
            return Err(ClawError::InvalidGauge {
                id: self.id,
                reason: format!("activation window [{}, {}) is empty", self.t1, self.t2),
            });
        }
        Ok(())
    }

    /// Parse a CSV string of gauges into a vector of Gauges, keeping row order.
    ///
    /// Expected CSV columns: id, x, y, t1, t2
    pub fn parse_gauge_csv(csv_object: &str) -> Result<Vec<Gauge>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(csv_object.as_bytes());
        let mut gauges = Vec::new();
        for row in rdr.deserialize::<Gauge>() {
            gauges.push(row?);
        }
        Ok(gauges)
    }
}

/// Time series recorded by the solver at one gauge.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeSeries {
    pub id: u32,
    /// Seconds
    pub t: Vec<f64>,
    /// Surface elevation, always the last column of each record
    pub eta: Vec<f64>,
}

impl GaugeSeries {
    /// Read `gaugeNNNNN.txt` from a solver output directory.
    pub fn read(gaugeno: u32, outdir: &Path) -> Result<GaugeSeries> {
        let path = outdir.join(gauge_file(gaugeno));
        let text = std::fs::read_to_string(&path).map_err(|e| ClawError::io(&path, e))?;
        let series = GaugeSeries::parse(gaugeno, &text).map_err(|reason| {
            ClawError::MalformedGauge {
                path: path.clone(),
                reason,
            }
        })?;
        debug!(
            "gauge {}: {} records from {:?}",
            gaugeno,
            series.t.len(),
            path
        );
        Ok(series)
    }

    /// Parse gauge output text. Lines starting with `#` are headers; each
    /// record is `level t q[0] .. q[n-1]`.
    pub fn parse(gaugeno: u32, text: &str) -> std::result::Result<GaugeSeries, String> {
        let mut t = Vec::new();
        let mut eta = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() < 3 {
                return Err(format!(
                    "line {}: expected level, time and values, found {} tokens",
                    lineno + 1,
                    tokens.len()
                ));
            }
            let time = parse_real(tokens[1])
                .ok_or_else(|| format!("line {}: bad time {:?}", lineno + 1, tokens[1]))?;
            let last = tokens[tokens.len() - 1];
            let value = parse_real(last)
                .ok_or_else(|| format!("line {}: bad value {:?}", lineno + 1, last))?;
            t.push(time);
            eta.push(value);
        }
        Ok(GaugeSeries { id: gaugeno, t, eta })
    }
}
