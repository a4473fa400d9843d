//! Relative mass drift against time on a logarithmic axis.

use crate::error::{PlotError, Result};
use crate::series::{clamp_floor, split_at_nan};
use crate::Chart;
use gst_data::mass::DriftSample;
use gst_utils::time::hours;
use plotters::coord::Shift;
use plotters::prelude::*;

/// Bottom of the drift axis; smaller values, including exact zero, are
/// drawn at this floor.
pub const DRIFT_FLOOR: f64 = 1e-7;
pub const DRIFT_CEILING: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct MassRun {
    pub label: String,
    pub color: RGBColor,
    pub samples: Vec<DriftSample>,
}

pub struct MassDriftChart {
    pub title: String,
    pub runs: Vec<MassRun>,
}

impl MassDriftChart {
    pub fn new(runs: Vec<MassRun>) -> MassDriftChart {
        MassDriftChart {
            title: "Relative change in total mass".to_string(),
            runs,
        }
    }

    /// Hours against clamped drift, split wherever the drift is NaN
    fn segments(run: &MassRun) -> Vec<Vec<(f64, f64)>> {
        split_at_nan(
            run.samples
                .iter()
                .map(|s| (hours(s.time), clamp_floor(s.drift, DRIFT_FLOOR))),
        )
    }

    fn hour_range(&self) -> Option<(f64, f64)> {
        let times = self
            .runs
            .iter()
            .flat_map(|r| r.samples.iter())
            .map(|s| hours(s.time))
            .filter(|t| t.is_finite());
        let (lo, hi) = times.fold(None, |acc: Option<(f64, f64)>, t| match acc {
            None => Some((t, t)),
            Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
        })?;
        Some(if hi > lo { (lo, hi) } else { (lo, lo + 1.0) })
    }
}

impl Chart for MassDriftChart {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let (x0, x1) = self
            .hour_range()
            .ok_or_else(|| PlotError::Empty("no mass samples".to_string()))?;
        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, ("sans-serif", 20))
            .margin(20i32)
            .x_label_area_size(40u32)
            .y_label_area_size(70u32)
            .build_cartesian_2d(x0..x1, (DRIFT_FLOOR..DRIFT_CEILING).log_scale())?;
        chart
            .configure_mesh()
            .x_desc("Hours")
            .y_label_formatter(&|y| format!("{:.0e}", y))
            .draw()?;

        for run in &self.runs {
            let color = run.color;
            let mut labelled = false;
            for segment in MassDriftChart::segments(run) {
                let anno = chart.draw_series(LineSeries::new(segment, color.stroke_width(2)))?;
                if !labelled {
                    anno.label(run.label.as_str()).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                    });
                    labelled = true;
                }
            }
        }
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .background_style(WHITE)
            .border_style(BLACK)
            .draw()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(samples: &[(f64, f64)]) -> MassRun {
        MassRun {
            label: "with source term".to_string(),
            color: RED,
            samples: samples
                .iter()
                .map(|&(time, drift)| DriftSample { time, drift })
                .collect(),
        }
    }

    #[test]
    fn test_segments_clamp_and_break() {
        let r = run(&[(0.0, 0.0), (3600.0, 1e-3), (7200.0, f64::NAN), (10800.0, 2e-3)]);
        let segments = MassDriftChart::segments(&r);
        assert_eq!(
            segments,
            vec![vec![(0.0, DRIFT_FLOOR), (1.0, 1e-3)], vec![(3.0, 2e-3)]]
        );
    }

    #[test]
    fn test_hour_range() {
        let chart = MassDriftChart::new(vec![run(&[(0.0, 0.0), (18000.0, 1e-4)])]);
        assert_eq!(chart.hour_range(), Some((0.0, 5.0)));
        assert_eq!(MassDriftChart::new(vec![]).hour_range(), None);
    }
}
