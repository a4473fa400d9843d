//! All frames of a baseline/treatment transect comparison on one axis.

use crate::error::{PlotError, Result};
use crate::series::{padded_range, split_at_nan};
use crate::{Chart, BASELINE_COLOR, TREATMENT_COLOR};
use gst_data::transect::{Transect, TransectComparison, TransectPoint};
use plotters::coord::Shift;
use plotters::prelude::*;

/// Horizontal coordinate of a transect plot
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum TransectAxis {
    #[default]
    Longitude,
    Latitude,
    /// Distance along the line from its start
    Distance,
}

impl TransectAxis {
    fn of(&self, point: &TransectPoint) -> f64 {
        match self {
            TransectAxis::Longitude => point.x,
            TransectAxis::Latitude => point.y,
            TransectAxis::Distance => point.arc,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            TransectAxis::Longitude => "longitude along transect",
            TransectAxis::Latitude => "latitude along transect",
            TransectAxis::Distance => "distance along transect",
        }
    }
}

pub struct TransectChart<'a> {
    pub comparison: &'a TransectComparison,
    pub axis: TransectAxis,
    pub title: String,
    pub labels: (String, String),
}

impl<'a> TransectChart<'a> {
    pub fn new(comparison: &'a TransectComparison, axis: TransectAxis) -> TransectChart<'a> {
        let hours: Vec<String> = comparison
            .baseline
            .iter()
            .map(|t| format!("{}", gst_utils::time::hours(t.time).round()))
            .collect();
        TransectChart {
            comparison,
            axis,
            title: format!("Surface eta along transect at {} hours", hours.join(",")),
            labels: (
                "Without source terms".to_string(),
                "With source terms".to_string(),
            ),
        }
    }

    fn x_range(&self) -> (f64, f64) {
        let line = &self.comparison.line;
        match self.axis {
            TransectAxis::Longitude => ordered(line.start.0, line.end.0),
            TransectAxis::Latitude => ordered(line.start.1, line.end.1),
            TransectAxis::Distance => (0.0, line.length()),
        }
    }

    fn runs(&self, transect: &Transect) -> Vec<Vec<(f64, f64)>> {
        split_at_nan(transect.points.iter().map(|p| (self.axis.of(p), p.eta)))
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl Chart for TransectChart<'_> {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let (y0, y1) = padded_range(
            self.comparison
                .baseline
                .iter()
                .chain(self.comparison.treatment.iter())
                .flat_map(|t| t.points.iter().map(|p| p.eta)),
            0.05,
        )
        .ok_or_else(|| PlotError::Empty("every transect sample is NaN".to_string()))?;
        let (x0, x1) = self.x_range();

        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, ("sans-serif", 20))
            .margin(20i32)
            .x_label_area_size(40u32)
            .y_label_area_size(60u32)
            .build_cartesian_2d(x0..x1, y0..y1)?;
        chart
            .configure_mesh()
            .x_desc(self.axis.label())
            .y_desc("meters")
            .draw()?;

        let groups = [
            (&self.comparison.baseline, BASELINE_COLOR, &self.labels.0),
            (&self.comparison.treatment, TREATMENT_COLOR, &self.labels.1),
        ];
        for (transects, color, label) in groups {
            let mut labelled = false;
            for transect in transects.iter() {
                for run in self.runs(transect) {
                    let anno = chart.draw_series(LineSeries::new(run, color))?;
                    if !labelled {
                        anno.label(label.as_str()).legend(move |(x, y)| {
                            PathElement::new(vec![(x, y), (x + 20, y)], color)
                        });
                        labelled = true;
                    }
                }
            }
        }
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
        Ok(())
    }
}
