//! Validated assembly of [`RunData`] from its required pieces.
//!
//! Building is one-shot and deterministic: inputs are checked, external
//! locations are resolved, and the caller's ordering of flag regions and
//! gauges is kept exactly. Nothing is written to disk here.

use crate::error::{ClawError, Result};
use crate::flag_region::FlagRegion;
use crate::gauge::Gauge;
use crate::rundata::{RunData, TopoFile};
use gst_utils::context::resolve_dir;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming the base topography directory
pub const TOPO_DIR_VAR: &str = "TOPO_DIR";
/// Environment variable naming the base deformation (dtopo) directory
pub const DTOPO_DIR_VAR: &str = "DTOPO_DIR";

/// Rectangular computational domain
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct DomainBounds {
    pub lower: [f64; 2],
    pub upper: [f64; 2],
}

impl DomainBounds {
    pub fn new(x: (f64, f64), y: (f64, f64)) -> DomainBounds {
        DomainBounds {
            lower: [x.0, y.0],
            upper: [x.1, y.1],
        }
    }

    /// The domain grown by `margin` on every side, as `[x1, x2, y1, y2]`
    pub fn padded(&self, margin: f64) -> [f64; 4] {
        [
            self.lower[0] - margin,
            self.upper[0] + margin,
            self.lower[1] - margin,
            self.upper[1] + margin,
        ]
    }

    pub(crate) fn validate(&self) -> Result<()> {
        for dim in 0..2 {
            let (lo, hi) = (self.lower[dim], self.upper[dim]);
            if !(lo.is_finite() && hi.is_finite() && lo < hi) {
                return Err(ClawError::InvalidDomain(format!(
                    "dimension {}: lower {} must be below upper {}",
                    dim + 1,
                    lo,
                    hi
                )));
            }
        }
        Ok(())
    }
}

/// Coarsest-level cell counts
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct Resolution {
    pub num_cells: [u32; 2],
}

impl Resolution {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.num_cells.iter().any(|n| *n == 0) {
            return Err(ClawError::InvalidResolution(format!(
                "cell counts {:?} must be positive",
                self.num_cells
            )));
        }
        Ok(())
    }
}

/// Topography and deformation files, named relative to their base
/// directories. The directories come from explicit paths or from
/// [`TOPO_DIR_VAR`] / [`DTOPO_DIR_VAR`].
#[derive(Debug, PartialEq, Clone, Default)]
pub struct TopoSources {
    pub topo_dir: Option<PathBuf>,
    pub dtopo_dir: Option<PathBuf>,
    pub topofiles: Vec<TopoFile>,
    pub dtopofiles: Vec<TopoFile>,
}

impl TopoSources {
    /// Resolve base directories and return absolute topo and dtopo lists.
    fn resolve(&self) -> Result<(Vec<TopoFile>, Vec<TopoFile>)> {
        let topo_dir = resolve_dir(self.topo_dir.as_deref(), TOPO_DIR_VAR)?;
        let topofiles = rebase(&self.topofiles, &topo_dir);
        let dtopofiles = if self.dtopofiles.is_empty() {
            Vec::new()
        } else {
            let dtopo_dir = resolve_dir(self.dtopo_dir.as_deref(), DTOPO_DIR_VAR)?;
            rebase(&self.dtopofiles, &dtopo_dir)
        };
        Ok((topofiles, dtopofiles))
    }
}

fn rebase(files: &[TopoFile], dir: &std::path::Path) -> Vec<TopoFile> {
    files
        .iter()
        .map(|f| TopoFile::new(f.topo_type, dir.join(&f.path)))
        .collect()
}

/// Validate inputs and assemble run data with solver defaults elsewhere.
///
/// `refinement_regions` are kept in the given order; the caller is
/// responsible for listing coarse defaults before narrower overrides.
pub fn build_config(
    domain_bounds: DomainBounds,
    resolution: Resolution,
    refinement_regions: Vec<FlagRegion>,
    gauges: Vec<Gauge>,
    topography_sources: &TopoSources,
) -> Result<RunData> {
    let (topofiles, dtopofiles) = topography_sources.resolve()?;

    let mut rundata = RunData::default();
    rundata.clawdata.lower = domain_bounds.lower;
    rundata.clawdata.upper = domain_bounds.upper;
    rundata.clawdata.num_cells = resolution.num_cells;
    rundata.flagregions = refinement_regions;
    rundata.gauges = gauges;
    rundata.topo_data.topofiles = topofiles;
    rundata.dtopo_data.dtopofiles = dtopofiles;
    rundata.validate()?;

    for region in &rundata.flagregions {
        debug!(
            "flag region {}: levels {}..{} for t in [{}, {}]",
            region.name, region.minlevel, region.maxlevel, region.t1, region.t2
        );
    }
    info!(
        "Built run data: {} flag regions, {} gauges, {} topo files, {} dtopo files",
        rundata.flagregions.len(),
        rundata.gauges.len(),
        rundata.topo_data.topofiles.len(),
        rundata.dtopo_data.dtopofiles.len()
    );
    Ok(rundata)
}
