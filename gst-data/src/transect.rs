//! Surface elevation sampled along a straight line through a frame.
//!
//! Each sample takes its value from the finest patch covering the point.
//! Samples outside every patch, or inside a masked dry cell, are NaN so
//! that renderers break the line there instead of joining across gaps.

use crate::error::{DataError, Result};
use gst_claw::solution::Frame;
use gst_utils::grid::linspace;
use log::{debug, info};
use serde::Serialize;
use std::path::Path;

/// Straight segment in model coordinates (longitude, latitude)
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct TransectLine {
    pub start: (f64, f64),
    pub end: (f64, f64),
}

impl TransectLine {
    pub fn new(start: (f64, f64), end: (f64, f64)) -> TransectLine {
        TransectLine { start, end }
    }

    pub fn length(&self) -> f64 {
        let dx = self.end.0 - self.start.0;
        let dy = self.end.1 - self.start.1;
        (dx * dx + dy * dy).sqrt()
    }

    fn validate(&self) -> Result<()> {
        if self.start == self.end {
            return Err(DataError::DegenerateLine(self.start));
        }
        Ok(())
    }

    /// `count` evenly spaced points, both endpoints included
    pub fn points(&self, count: usize) -> Vec<(f64, f64)> {
        linspace(self.start.0, self.end.0, count)
            .into_iter()
            .zip(linspace(self.start.1, self.end.1, count))
            .collect()
    }
}

/// Which samples count as dry and get masked out
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub enum WetDryMask {
    /// Every covered sample keeps its surface value
    #[default]
    Unmasked,
    /// Samples with depth at or below the tolerance become NaN
    DryTolerance(f64),
}

impl WetDryMask {
    fn apply(&self, depth: f64, eta: f64) -> f64 {
        match self {
            WetDryMask::Unmasked => eta,
            WetDryMask::DryTolerance(tol) => {
                if depth.is_nan() || depth <= *tol {
                    f64::NAN
                } else {
                    eta
                }
            }
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct TransectPoint {
    pub x: f64,
    pub y: f64,
    /// Distance from the line start in model units
    pub arc: f64,
    pub eta: f64,
}

/// One frame's surface profile along a line
#[derive(Debug, Clone)]
pub struct Transect {
    pub frameno: usize,
    pub time: f64,
    pub points: Vec<TransectPoint>,
}

impl Transect {
    pub fn etas(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.eta).collect()
    }

    /// Samples that landed on wet, covered cells
    pub fn wet_count(&self) -> usize {
        self.points.iter().filter(|p| !p.eta.is_nan()).count()
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for point in &self.points {
            writer.serialize(point)?;
        }
        writer.flush().map_err(|e| DataError::io(path, e))?;
        Ok(())
    }
}

fn check_count(sample_count: usize) -> Result<()> {
    if sample_count < 2 {
        return Err(DataError::InvalidSampleCount(sample_count));
    }
    Ok(())
}

/// Sample an already loaded frame along `line`.
pub fn sample_frame(
    frame: &Frame,
    line: &TransectLine,
    sample_count: usize,
    mask: WetDryMask,
) -> Result<Transect> {
    line.validate()?;
    check_count(sample_count)?;

    let length = line.length();
    let step = length / (sample_count - 1) as f64;
    let points: Vec<TransectPoint> = line
        .points(sample_count)
        .into_iter()
        .enumerate()
        .map(|(k, (x, y))| {
            let (h, eta) = frame.depth_and_surface_at(x, y);
            TransectPoint {
                x,
                y,
                arc: step * k as f64,
                eta: mask.apply(h, eta),
            }
        })
        .collect();

    let transect = Transect {
        frameno: frame.frameno,
        time: frame.time,
        points,
    };
    debug!(
        "frame {}: {} of {} transect samples wet",
        frame.frameno,
        transect.wet_count(),
        sample_count
    );
    Ok(transect)
}

/// Read frame `frame_index` from `output_dir` and sample it along `line`.
///
/// Line and count are checked before any file is touched.
pub fn sample(
    frame_index: usize,
    output_dir: &Path,
    line: &TransectLine,
    sample_count: usize,
    mask: WetDryMask,
) -> Result<Transect> {
    line.validate()?;
    check_count(sample_count)?;
    let frame = Frame::read(frame_index, output_dir)?;
    sample_frame(&frame, line, sample_count, mask)
}

/// Matching transects from a run without and a run with the source term
#[derive(Debug, Clone)]
pub struct TransectComparison {
    pub line: TransectLine,
    pub baseline: Vec<Transect>,
    pub treatment: Vec<Transect>,
}

impl TransectComparison {
    /// Baseline and treatment transects paired by frame
    pub fn pairs(&self) -> impl Iterator<Item = (&Transect, &Transect)> {
        self.baseline.iter().zip(self.treatment.iter())
    }

    /// Largest absolute surface difference across all paired samples
    pub fn max_abs_difference(&self) -> f64 {
        self.pairs()
            .flat_map(|(a, b)| a.points.iter().zip(b.points.iter()))
            .map(|(p, q)| (p.eta - q.eta).abs())
            .filter(|d| !d.is_nan())
            .fold(0.0, f64::max)
    }
}

/// Sample the same frames from two output directories.
pub fn compare(
    baseline_dir: &Path,
    treatment_dir: &Path,
    frames: &[usize],
    line: &TransectLine,
    sample_count: usize,
    mask: WetDryMask,
) -> Result<TransectComparison> {
    let mut baseline = Vec::with_capacity(frames.len());
    let mut treatment = Vec::with_capacity(frames.len());
    for &frameno in frames {
        baseline.push(sample(frameno, baseline_dir, line, sample_count, mask)?);
        treatment.push(sample(frameno, treatment_dir, line, sample_count, mask)?);
    }
    let comparison = TransectComparison {
        line: *line,
        baseline,
        treatment,
    };
    info!(
        "Compared {} frames along transect, max |d eta| = {:.4e}",
        frames.len(),
        comparison.max_abs_difference()
    );
    Ok(comparison)
}
