//! Hierarchical run parameters handed to the solver.
//!
//! Each section mirrors one solver input file; see [`crate::datafile`] for
//! the serialization. Defaults follow the solver's own defaults, scenario
//! code overrides what it needs by plain field assignment.

use crate::builder::{DomainBounds, Resolution, DTOPO_DIR_VAR, TOPO_DIR_VAR};
use crate::error::Result;
use crate::flag_region::FlagRegion;
use crate::gauge::Gauge;
use crate::solution::OutputFormat;
use gst_utils::context::resolve_dir;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Boundary condition at one domain edge
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum BoundaryCondition {
    User,
    Extrap,
    Periodic,
    Wall,
}

impl BoundaryCondition {
    pub fn code(&self) -> u32 {
        match self {
            BoundaryCondition::User => 0,
            BoundaryCondition::Extrap => 1,
            BoundaryCondition::Periodic => 2,
            BoundaryCondition::Wall => 3,
        }
    }
}

/// Wave limiter applied to each wave family
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Limiter {
    None,
    Minmod,
    Superbee,
    VanLeer,
    Mc,
}

impl Limiter {
    pub fn code(&self) -> u32 {
        match self {
            Limiter::None => 0,
            Limiter::Minmod => 1,
            Limiter::Superbee => 2,
            Limiter::VanLeer => 3,
            Limiter::Mc => 4,
        }
    }
}

/// Splitting used for source terms or dimensions
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Splitting {
    None,
    Godunov,
    Strang,
}

impl Splitting {
    pub fn code(&self) -> u32 {
        match self {
            Splitting::None => 0,
            Splitting::Godunov => 1,
            Splitting::Strang => 2,
        }
    }
}

/// When frames are written
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum OutputStyle {
    /// `num_output_times` equally spaced frames up to `tfinal`
    Uniform {
        num_output_times: u32,
        tfinal: f64,
        output_t0: bool,
    },
    /// Explicit output times
    Times(Vec<f64>),
    /// Every `step_interval` steps for `total_steps` steps
    Steps {
        step_interval: u32,
        total_steps: u32,
        output_t0: bool,
    },
}

impl OutputStyle {
    pub fn code(&self) -> u32 {
        match self {
            OutputStyle::Uniform { .. } => 1,
            OutputStyle::Times(_) => 2,
            OutputStyle::Steps { .. } => 3,
        }
    }
}

/// Checkpoint policy; the sign of the solver code selects alternating files
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum Checkpoint {
    None,
    AtEnd,
    Times { times: Vec<f64>, alternate: bool },
    Interval { steps: u32, alternate: bool },
}

impl Checkpoint {
    pub fn code(&self) -> i32 {
        let signed = |code: i32, alternate: bool| if alternate { -code } else { code };
        match self {
            Checkpoint::None => 0,
            Checkpoint::AtEnd => 1,
            Checkpoint::Times { alternate, .. } => signed(2, *alternate),
            Checkpoint::Interval { alternate, .. } => signed(3, *alternate),
        }
    }
}

/// Core parameters written to `claw.data`
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ClawData {
    pub num_dim: u32,
    pub lower: [f64; 2],
    pub upper: [f64; 2],
    pub num_cells: [u32; 2],
    pub num_eqn: u32,
    pub num_aux: u32,
    pub capa_index: u32,
    pub t0: f64,
    pub restart: bool,
    pub restart_file: String,
    pub output_style: OutputStyle,
    pub output_format: OutputFormat,
    pub output_aux_onlyonce: bool,
    pub verbosity: u32,
    pub dt_variable: bool,
    pub dt_initial: f64,
    pub dt_max: f64,
    pub cfl_desired: f64,
    pub cfl_max: f64,
    pub steps_max: u32,
    pub order: u32,
    pub dimensional_split: Splitting,
    pub transverse_waves: u32,
    pub num_waves: u32,
    pub limiter: Vec<Limiter>,
    pub use_fwaves: bool,
    pub source_split: Splitting,
    pub num_ghost: u32,
    pub bc_lower: [BoundaryCondition; 2],
    pub bc_upper: [BoundaryCondition; 2],
    pub checkpoint: Checkpoint,
}

impl Default for ClawData {
    fn default() -> Self {
        ClawData {
            num_dim: 2,
            lower: [0.0, 0.0],
            upper: [1.0, 1.0],
            num_cells: [100, 100],
            num_eqn: 3,
            num_aux: 3,
            capa_index: 2,
            t0: 0.0,
            restart: false,
            restart_file: String::new(),
            output_style: OutputStyle::Uniform {
                num_output_times: 10,
                tfinal: 3600.0,
                output_t0: true,
            },
            output_format: OutputFormat::Binary64,
            output_aux_onlyonce: false,
            verbosity: 1,
            dt_variable: true,
            dt_initial: 0.2,
            dt_max: 1e99,
            cfl_desired: 0.75,
            cfl_max: 1.0,
            steps_max: 5000,
            order: 2,
            dimensional_split: Splitting::None,
            transverse_waves: 2,
            num_waves: 3,
            limiter: vec![Limiter::Mc; 3],
            use_fwaves: true,
            source_split: Splitting::Godunov,
            num_ghost: 2,
            bc_lower: [BoundaryCondition::Extrap; 2],
            bc_upper: [BoundaryCondition::Extrap; 2],
            checkpoint: Checkpoint::None,
        }
    }
}

/// How each aux array is interpreted by the AMR code
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum AuxType {
    Center,
    Capacity,
    Xleft,
    Yleft,
}

impl AuxType {
    pub fn label(&self) -> &'static str {
        match self {
            AuxType::Center => "center",
            AuxType::Capacity => "capacity",
            AuxType::Xleft => "xleft",
            AuxType::Yleft => "yleft",
        }
    }
}

/// Adaptive refinement parameters written to `amr.data`
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct AmrData {
    pub amr_levels_max: u32,
    pub refinement_ratios_x: Vec<u32>,
    pub refinement_ratios_y: Vec<u32>,
    pub refinement_ratios_t: Vec<u32>,
    pub aux_type: Vec<AuxType>,
    pub flag_richardson: bool,
    pub flag_richardson_tol: f64,
    pub flag2refine: bool,
    pub flag2refine_tol: f64,
    pub regrid_interval: u32,
    pub regrid_buffer_width: u32,
    pub clustering_cutoff: f64,
    pub verbosity_regrid: u32,
    /// Debug print switches: dprint, eprint, edebug, gprint, nprint,
    /// pprint, rprint, sprint, tprint, uprint
    pub debug_flags: [bool; 10],
}

impl Default for AmrData {
    fn default() -> Self {
        AmrData {
            amr_levels_max: 1,
            refinement_ratios_x: vec![],
            refinement_ratios_y: vec![],
            refinement_ratios_t: vec![],
            aux_type: vec![AuxType::Center, AuxType::Capacity, AuxType::Yleft],
            flag_richardson: false,
            flag_richardson_tol: 1.0,
            flag2refine: true,
            flag2refine_tol: 0.5,
            regrid_interval: 3,
            regrid_buffer_width: 2,
            clustering_cutoff: 0.7,
            verbosity_regrid: 0,
            debug_flags: [false; 10],
        }
    }
}

/// Physics parameters written to `geoclaw.data`
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct GeoData {
    pub gravity: f64,
    /// 1 = Cartesian meters, 2 = longitude/latitude degrees
    pub coordinate_system: u32,
    /// Spherical source-term treatment: 0 none, 1 mass only, 2 full
    pub sphere_source: u32,
    pub earth_radius: f64,
    pub coriolis_forcing: bool,
    pub sea_level: f64,
    pub dry_tolerance: f64,
    pub friction_forcing: bool,
    pub manning_coefficient: f64,
    pub friction_depth: f64,
}

impl Default for GeoData {
    fn default() -> Self {
        GeoData {
            gravity: 9.81,
            coordinate_system: 2,
            sphere_source: 0,
            earth_radius: 6367.5e3,
            coriolis_forcing: false,
            sea_level: 0.0,
            dry_tolerance: 1e-3,
            friction_forcing: true,
            manning_coefficient: 0.025,
            friction_depth: 1e6,
        }
    }
}

/// Refinement criteria written to `refinement.data`
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RefinementData {
    pub wave_tolerance: f64,
    pub speed_tolerance: Vec<f64>,
    pub deep_depth: f64,
    pub max_level_deep: u32,
    pub variable_dt_refinement_ratios: bool,
}

impl Default for RefinementData {
    fn default() -> Self {
        RefinementData {
            wave_tolerance: 0.1,
            speed_tolerance: vec![1e12; 6],
            deep_depth: 1e2,
            max_level_deep: 3,
            variable_dt_refinement_ratios: false,
        }
    }
}

/// A topography or deformation file reference; the file itself is opaque.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct TopoFile {
    pub topo_type: u32,
    pub path: PathBuf,
}

impl TopoFile {
    pub fn new(topo_type: u32, path: impl Into<PathBuf>) -> TopoFile {
        TopoFile {
            topo_type,
            path: path.into(),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct TopoData {
    pub topofiles: Vec<TopoFile>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct DtopoData {
    pub dtopofiles: Vec<TopoFile>,
    pub dt_max_dtopo: f64,
}

impl Default for DtopoData {
    fn default() -> Self {
        DtopoData {
            dtopofiles: vec![],
            dt_max_dtopo: 1e99,
        }
    }
}

/// Initial perturbation of the water surface written to `qinit.data`
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct QinitData {
    /// 0 = none, otherwise the component perturbed by `qinitfiles`
    pub qinit_type: u32,
    pub qinitfiles: Vec<TopoFile>,
    pub variable_eta_init: bool,
}

/// Uniform rectangular grid on which the solver tracks maxima
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct FGmaxGrid {
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
    pub dx: f64,
    pub tstart_max: f64,
    pub tend_max: f64,
    pub dt_check: f64,
    pub min_level_check: u32,
    pub arrival_tol: f64,
    /// 0 = piecewise constant in cells
    pub interp_method: u32,
}

impl FGmaxGrid {
    /// Solver code for a uniform rectangular x-y grid
    pub fn point_style(&self) -> u32 {
        2
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct FGmaxData {
    pub num_fgmax_val: u32,
    pub fgmax_grids: Vec<FGmaxGrid>,
}

impl Default for FGmaxData {
    fn default() -> Self {
        FGmaxData {
            num_fgmax_val: 1,
            fgmax_grids: vec![],
        }
    }
}

/// Everything the solver reads for one run.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct RunData {
    pub clawdata: ClawData,
    pub amrdata: AmrData,
    pub geo_data: GeoData,
    pub refinement_data: RefinementData,
    pub topo_data: TopoData,
    pub dtopo_data: DtopoData,
    pub qinit_data: QinitData,
    pub gauges: Vec<Gauge>,
    /// Ordered; later entries may override earlier ones in the solver
    pub flagregions: Vec<FlagRegion>,
    pub fgmax_data: FGmaxData,
}

impl RunData {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<RunData> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check everything the solver relies on: domain, cell counts, every
    /// flag region and gauge, and that the directories holding the topo and
    /// dtopo files exist.
    pub fn validate(&self) -> Result<()> {
        let c = &self.clawdata;
        DomainBounds::new((c.lower[0], c.upper[0]), (c.lower[1], c.upper[1])).validate()?;
        Resolution {
            num_cells: c.num_cells,
        }
        .validate()?;
        for region in &self.flagregions {
            region.validate()?;
        }
        for gauge in &self.gauges {
            gauge.validate()?;
        }
        check_parent_dirs(&self.topo_data.topofiles, TOPO_DIR_VAR)?;
        check_parent_dirs(&self.dtopo_data.dtopofiles, DTOPO_DIR_VAR)?;
        Ok(())
    }
}

fn check_parent_dirs(files: &[TopoFile], var: &str) -> Result<()> {
    for file in files {
        let parent = file.path.parent().unwrap_or_else(|| std::path::Path::new("."));
        resolve_dir(Some(parent), var)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClawError;

    #[test]
    fn test_codes() {
        assert_eq!(Limiter::Mc.code(), 4);
        assert_eq!(BoundaryCondition::Extrap.code(), 1);
        assert_eq!(Splitting::Godunov.code(), 1);
        assert_eq!(
            Checkpoint::Times {
                times: vec![3600.0],
                alternate: true
            }
            .code(),
            -2
        );
        assert_eq!(OutputStyle::Times(vec![1.0]).code(), 2);
    }

    #[test]
    fn test_json_round_trip_keeps_region_order() {
        let mut rundata = RunData::default();
        rundata.flagregions = vec![
            FlagRegion::new("coarse", (1, 2), (0.0, 1e9), [-1.0, 1.0, -1.0, 1.0]),
            FlagRegion::new("fine", (3, 3), (10.0, 20.0), [0.0, 0.5, 0.0, 0.5]),
            FlagRegion::new("finer", (4, 4), (15.0, 20.0), [0.1, 0.2, 0.1, 0.2]),
        ];
        rundata.gauges = vec![Gauge::new(1, 0.1, 0.1, 0.0, 1e10)];
        let json = rundata.to_json().unwrap();
        let back = RunData::from_json(&json).unwrap();
        let names: Vec<&str> = back.flagregions.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["coarse", "fine", "finer"]);
        assert_eq!(back, rundata);
    }

    fn valid_rundata() -> RunData {
        let mut rundata = RunData::default();
        rundata.clawdata.lower = [-199.0, 12.0];
        rundata.clawdata.upper = [-110.0, 63.0];
        rundata.clawdata.num_cells = [89, 51];
        rundata.gauges = vec![Gauge::new(1, -150.0, 40.0, 0.0, 1e10)];
        rundata.topo_data.topofiles = vec![TopoFile::new(3, std::env::temp_dir().join("etopo1.asc"))];
        rundata
    }

    #[test]
    fn test_validate_accepts_consistent_run() {
        valid_rundata().validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_loaded_inverted_gauge() {
        let mut rundata = valid_rundata();
        rundata.gauges.push(Gauge::new(2, -150.0, 40.0, 7200.0, 3600.0));
        let back = RunData::from_json(&rundata.to_json().unwrap()).unwrap();
        let err = back.validate().unwrap_err();
        assert!(matches!(err, ClawError::InvalidGauge { id: 2, .. }));
    }

    #[test]
    fn test_validate_rejects_zero_cells() {
        let mut rundata = valid_rundata();
        rundata.clawdata.num_cells = [0, 0];
        assert!(matches!(
            rundata.validate().unwrap_err(),
            ClawError::InvalidResolution(_)
        ));
    }

    #[test]
    fn test_validate_rejects_missing_topo_dir() {
        let mut rundata = valid_rundata();
        rundata.topo_data.topofiles = vec![TopoFile::new(
            3,
            std::env::temp_dir().join("gst-claw-no-topo-here").join("etopo1.asc"),
        )];
        assert!(matches!(
            rundata.validate().unwrap_err(),
            ClawError::MissingContext(_)
        ));
    }
}
