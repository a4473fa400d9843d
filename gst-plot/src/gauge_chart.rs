use crate::error::{PlotError, Result};
use crate::series::padded_range;
use crate::{Chart, BASELINE_COLOR, TREATMENT_COLOR};
use gst_data::gauge::GaugeComparison;
use gst_utils::time::hours;
use plotters::coord::Shift;
use plotters::prelude::*;

const RUN_COLORS: [RGBColor; 4] = [BASELINE_COLOR, TREATMENT_COLOR, GREEN, MAGENTA];

/// Surface elevation at one gauge against hours, observations in black.
pub struct GaugeChart<'a> {
    pub comparison: &'a GaugeComparison,
    /// Time window in seconds; defaults to the span of the simulated runs
    pub tlimits: Option<(f64, f64)>,
}

impl<'a> GaugeChart<'a> {
    pub fn new(comparison: &'a GaugeComparison) -> GaugeChart<'a> {
        GaugeChart {
            comparison,
            tlimits: None,
        }
    }

    fn hour_range(&self) -> Option<(f64, f64)> {
        if let Some((t1, t2)) = self.tlimits {
            return Some((hours(t1), hours(t2)));
        }
        padded_range(
            self.comparison
                .runs
                .iter()
                .flat_map(|(_, series)| series.t.iter().map(|t| hours(*t))),
            0.0,
        )
    }
}

impl Chart for GaugeChart<'_> {
    fn size(&self) -> (u32, u32) {
        (900, 400)
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let gaugeno = self.comparison.gaugeno;
        let (x0, x1) = self
            .hour_range()
            .ok_or_else(|| PlotError::Empty(format!("gauge {} has no records", gaugeno)))?;
        let observed = self.comparison.observed.as_deref().unwrap_or(&[]);
        let (y0, y1) = padded_range(
            self.comparison
                .runs
                .iter()
                .flat_map(|(_, series)| series.eta.iter().copied())
                .chain(observed.iter().map(|(_, eta)| *eta)),
            0.1,
        )
        .ok_or_else(|| PlotError::Empty(format!("gauge {} has no finite values", gaugeno)))?;

        let mut chart = ChartBuilder::on(root)
            .caption(format!("Gauge {}", gaugeno), ("sans-serif", 18))
            .margin(15i32)
            .x_label_area_size(35u32)
            .y_label_area_size(60u32)
            .build_cartesian_2d(x0..x1, y0..y1)?;
        chart
            .configure_mesh()
            .x_desc("Hours")
            .y_desc("meters")
            .draw()?;

        chart.draw_series(LineSeries::new(vec![(x0, 0.0), (x1, 0.0)], BLACK.mix(0.5)))?;
        for (idx, (label, series)) in self.comparison.runs.iter().enumerate() {
            let color = RUN_COLORS[idx % RUN_COLORS.len()];
            let points = series.t.iter().zip(series.eta.iter()).map(|(t, eta)| (hours(*t), *eta));
            chart
                .draw_series(LineSeries::new(points, color))?
                .label(label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }
        if !observed.is_empty() {
            let points = observed.iter().map(|(t, eta)| (hours(*t), *eta));
            chart
                .draw_series(LineSeries::new(points, BLACK))?
                .label("DART data")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK));
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
