//! Single-frame renderings.
//!
//! 2-D frames are shaded cell by cell, coarse patches first so refined
//! patches draw on top. Wet cells take the water colormap (surface over
//! the ocean, depth over land); dry cells take the land colormap. 1-D
//! frames are drawn as surface and topography profiles.

use crate::colormap::Colormap;
use crate::error::{PlotError, Result};
use crate::series::{padded_range, split_at_nan};
use crate::Chart;
use gst_claw::solution::{Component, Frame, Patch};
use gst_data::transect::TransectLine;
use gst_utils::time::format_hms;
use plotters::coord::Shift;
use plotters::prelude::*;

/// Depth at or below which a cell counts as dry
pub const DRY_TOLERANCE: f64 = 1e-3;

/// Which view of a 2-D frame to draw
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum FrameView {
    /// Whole computational domain
    Full,
    /// Close-up of a window `[x1, x2, y1, y2]`
    Zoom { window: [f64; 4] },
    /// Window (whole domain when `None`) with the transect line overlaid
    WithTransect {
        window: Option<[f64; 4]>,
        line: TransectLine,
    },
}

impl FrameView {
    /// Default water colormap and its value range for this view
    pub fn water_scale(&self) -> (Colormap, (f64, f64)) {
        match self {
            FrameView::Full => (Colormap::tsunami(), (-0.5, 0.5)),
            FrameView::Zoom { .. } => (Colormap::blue_white_red(), (-10.0, 10.0)),
            FrameView::WithTransect { .. } => (Colormap::tsunami(), (-2.0, 2.0)),
        }
    }

    fn window(&self, frame: &Frame) -> Option<[f64; 4]> {
        match self {
            FrameView::Full => frame.extent(),
            FrameView::Zoom { window } => Some(*window),
            FrameView::WithTransect { window, .. } => window.or_else(|| frame.extent()),
        }
    }
}

/// Shading of one 2-D cell
#[derive(Debug, PartialEq, Clone, Copy)]
enum CellShade {
    Water(f64),
    Land(f64),
}

fn shade(depth: f64, eta: f64, dry_tolerance: f64) -> Option<CellShade> {
    if depth.is_nan() || eta.is_nan() {
        return None;
    }
    if depth <= dry_tolerance {
        return Some(CellShade::Land(eta));
    }
    let topo = eta - depth;
    Some(CellShade::Water(if topo < 0.0 { eta } else { depth }))
}

pub struct FrameChart<'a> {
    pub frame: &'a Frame,
    pub view: FrameView,
    pub title: String,
    pub water: (Colormap, (f64, f64)),
    pub land: (Colormap, (f64, f64)),
    pub dry_tolerance: f64,
}

impl<'a> FrameChart<'a> {
    pub fn new(frame: &'a Frame, view: FrameView) -> FrameChart<'a> {
        FrameChart {
            frame,
            view,
            title: format!("Surface at {} after earthquake", format_hms(frame.time)),
            water: view.water_scale(),
            land: (Colormap::land(), (0.0, 100.0)),
            dry_tolerance: DRY_TOLERANCE,
        }
    }

    /// Keep the water colormap, change its value range
    pub fn with_water_range(mut self, range: (f64, f64)) -> FrameChart<'a> {
        self.water.1 = range;
        self
    }

    pub fn with_land_range(mut self, range: (f64, f64)) -> FrameChart<'a> {
        self.land.1 = range;
        self
    }

    fn cell_color(&self, patch: &Patch, i: usize, j: usize) -> Option<RGBColor> {
        let depth = patch.value(Component::Depth.index(self.frame.num_eqn), i, j);
        let eta = patch.value(Component::Surface.index(self.frame.num_eqn), i, j);
        match shade(depth, eta, self.dry_tolerance)? {
            CellShade::Water(v) => self.water.0.color(v, self.water.1),
            CellShade::Land(v) => self.land.0.color(v, self.land.1),
        }
    }

    fn draw_plan<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let [x1, x2, y1, y2] = self
            .view
            .window(self.frame)
            .ok_or_else(|| PlotError::Empty(format!("frame {} has no patches", self.frame.frameno)))?;
        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, ("sans-serif", 18))
            .margin(15i32)
            .x_label_area_size(35u32)
            .y_label_area_size(50u32)
            .build_cartesian_2d(x1..x2, y1..y2)?;
        chart.configure_mesh().disable_mesh().draw()?;

        for patch in self.frame.patches_by_level() {
            let cells = (0..patch.my).flat_map(|j| (0..patch.mx).map(move |i| (i, j)));
            chart.draw_series(cells.filter_map(|(i, j)| {
                let color = self.cell_color(patch, i, j)?;
                let x0 = patch.xlow + i as f64 * patch.dx;
                let y0 = patch.ylow + j as f64 * patch.dy;
                Some(Rectangle::new(
                    [(x0, y0), (x0 + patch.dx, y0 + patch.dy)],
                    color.filled(),
                ))
            }))?;
        }

        if let FrameView::WithTransect { line, .. } = self.view {
            chart.draw_series(LineSeries::new(vec![line.start, line.end], BLACK.stroke_width(1)))?;
        }
        Ok(())
    }

    /// Surface and topography of a 1-D frame, one run per patch
    fn profiles(&self) -> (Vec<Vec<(f64, f64)>>, Vec<Vec<(f64, f64)>>) {
        let mut surface = Vec::new();
        let mut topo = Vec::new();
        let (h_idx, eta_idx) = (
            Component::Depth.index(self.frame.num_eqn),
            Component::Surface.index(self.frame.num_eqn),
        );
        for patch in self.frame.patches_by_level() {
            let cells: Vec<(f64, f64, f64)> = (0..patch.mx)
                .map(|i| (patch.x_center(i), patch.value(h_idx, i, 0), patch.value(eta_idx, i, 0)))
                .collect();
            surface.extend(split_at_nan(cells.iter().map(|&(x, h, eta)| {
                (x, if h > self.dry_tolerance { eta } else { f64::NAN })
            })));
            topo.extend(split_at_nan(cells.iter().map(|&(x, h, eta)| (x, eta - h))));
        }
        (surface, topo)
    }

    fn draw_profile<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let (surface, topo) = self.profiles();
        let (x1, x2) = padded_range(surface.iter().chain(topo.iter()).flatten().map(|p| p.0), 0.0)
            .ok_or_else(|| PlotError::Empty(format!("frame {} has no cells", self.frame.frameno)))?;
        let (y1, y2) = padded_range(surface.iter().flatten().map(|p| p.1), 0.1)
            .ok_or_else(|| PlotError::Empty(format!("frame {} is dry", self.frame.frameno)))?;

        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, ("sans-serif", 18))
            .margin(15i32)
            .x_label_area_size(35u32)
            .y_label_area_size(60u32)
            .build_cartesian_2d(x1..x2, y1..y2)?;
        chart.configure_mesh().y_desc("meters").draw()?;
        for run in topo {
            chart.draw_series(LineSeries::new(run, GREEN))?;
        }
        for run in surface {
            chart.draw_series(LineSeries::new(run, BLUE.stroke_width(2)))?;
        }
        Ok(())
    }
}

impl Chart for FrameChart<'_> {
    fn size(&self) -> (u32, u32) {
        if self.frame.num_dim == 1 {
            (900, 500)
        } else {
            (800, 700)
        }
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        if self.frame.num_dim == 1 {
            self.draw_profile(root)
        } else {
            self.draw_plan(root)
        }
    }
}
