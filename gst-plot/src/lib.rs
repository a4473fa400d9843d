//! Static figures comparing runs with and without the sphere source term.
//!
//! Every figure implements [`Chart`] and is written with [`save`], which
//! picks the backend from the file extension: `.svg` gives SVG, anything
//! else a bitmap (PNG).

pub mod colormap;
pub mod error;
pub mod frame_chart;
pub mod gauge_chart;
pub mod mass_chart;
pub mod series;
pub mod transect_chart;

use crate::error::Result;
use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// Line colors for the run without and with the source term
pub const BASELINE_COLOR: RGBColor = BLUE;
pub const TREATMENT_COLOR: RGBColor = RED;

/// A figure drawable onto any plotters backend
pub trait Chart {
    /// Pixel size of the figure
    fn size(&self) -> (u32, u32) {
        (900, 600)
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>;
}

/// Render `chart` to `path`.
pub fn save<C: Chart>(chart: &C, path: &Path) -> Result<()> {
    let size = chart.size();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("svg") => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            root.fill(&WHITE)?;
            chart.draw(&root)?;
            root.present()?;
        }
        _ => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            root.fill(&WHITE)?;
            chart.draw(&root)?;
            root.present()?;
        }
    }
    info!("Created {:?}", path);
    Ok(())
}
