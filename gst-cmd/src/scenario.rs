//! Built-in scenarios: the Aleutian (Butler) run configuration and the
//! fixed analysis presets for the comparison studies.

use clap::ValueEnum;
use gst_claw::builder::{build_config, DomainBounds, Resolution, TopoSources};
use gst_claw::error::ClawError;
use gst_claw::flag_region::{FlagRegion, T_FOREVER};
use gst_claw::gauge::Gauge;
use gst_claw::rundata::{Checkpoint, FGmaxGrid, OutputStyle, RunData, TopoFile};
use gst_data::mass::{DriftOptions, LogFormat, LoggedQuantity};
use gst_data::transect::{TransectLine, WetDryMask};
use gst_plot::transect_chart::TransectAxis;
use gst_utils::time::SECONDS_PER_HOUR;
use std::path::PathBuf;

pub static BUTLER_FLAGREGIONS: &str = include_str!("../../fixtures/butler_flagregions.csv");
pub static BUTLER_GAUGES: &str = include_str!("../../fixtures/butler_gauges.csv");
pub static BUTLER_TOPOFILES: &str = include_str!("../../fixtures/butler_topofiles.csv");

/// 1/16 arcsecond in degrees; cell edges are offset by this much
const SEC16: f64 = 1.0 / (6.0 * 3600.0);
const BUTLER_DTOPO: &str = "Butler6.tt3";
const BUTLER_GAUGE_FINE_ON: f64 = 15420.0;

pub fn parse_topofile_csv(csv_object: &str) -> Result<Vec<TopoFile>, ClawError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_object.as_bytes());
    let mut files = Vec::new();
    for row in rdr.deserialize::<TopoFile>() {
        files.push(row?);
    }
    Ok(files)
}

pub fn butler_domain() -> DomainBounds {
    DomainBounds::new((-199.0 - SEC16, -110.0 - SEC16), (12.0 - SEC16, 63.0 - SEC16))
}

/// Flag regions for the Butler run: two whole-domain defaults, then the
/// tabulated windows narrowing toward Hilo.
pub fn butler_flagregions() -> Result<Vec<FlagRegion>, ClawError> {
    let padded = butler_domain().padded(0.1);
    let mut regions = vec![
        FlagRegion::new("Region_domain_firsthour", (1, 3), (0.0, 3600.0), padded),
        FlagRegion::new("Region_domain_1hour_plus", (1, 2), (3600.0, T_FOREVER), padded),
    ];
    regions.extend(FlagRegion::parse_flag_region_csv(BUTLER_FLAGREGIONS)?);
    Ok(regions)
}

/// Assemble the Butler run. `sphere_source` selects the spherical source
/// term treatment (0 disables it).
pub fn butler_rundata(
    topo_dir: Option<PathBuf>,
    dtopo_dir: Option<PathBuf>,
    sphere_source: u32,
) -> Result<RunData, ClawError> {
    let sources = TopoSources {
        topo_dir,
        dtopo_dir,
        topofiles: parse_topofile_csv(BUTLER_TOPOFILES)?,
        dtopofiles: vec![TopoFile::new(3, BUTLER_DTOPO)],
    };
    let gauges = Gauge::parse_gauge_csv(BUTLER_GAUGES)?;
    let mut rundata = build_config(
        butler_domain(),
        Resolution {
            num_cells: [89, 51],
        },
        butler_flagregions()?,
        gauges,
        &sources,
    )?;

    let claw = &mut rundata.clawdata;
    claw.output_style = OutputStyle::Uniform {
        num_output_times: 6,
        tfinal: 6.0 * SECONDS_PER_HOUR,
        output_t0: true,
    };
    claw.checkpoint = Checkpoint::Times {
        times: (1..16).map(|h| h as f64 * SECONDS_PER_HOUR).collect(),
        alternate: true,
    };

    let amr = &mut rundata.amrdata;
    amr.amr_levels_max = 3;
    amr.refinement_ratios_x = vec![15, 4, 2, 5, 3, 2, 3];
    amr.refinement_ratios_y = vec![15, 4, 2, 5, 3, 2, 3];
    amr.refinement_ratios_t = vec![15, 4, 2, 5, 3, 2, 3];

    rundata.geo_data.sphere_source = sphere_source;
    rundata.refinement_data.wave_tolerance = 0.02;
    rundata.refinement_data.variable_dt_refinement_ratios = true;
    rundata.dtopo_data.dt_max_dtopo = 0.2;

    rundata.fgmax_data.num_fgmax_val = 2;
    rundata.fgmax_data.fgmax_grids = vec![
        FGmaxGrid {
            x1: -155.1,
            x2: -155.02,
            y1: 19.71,
            y2: 19.76,
            dx: 1.0 / 3600.0,
            tstart_max: BUTLER_GAUGE_FINE_ON,
            tend_max: 1e10,
            dt_check: 30.0,
            min_level_check: 3,
            arrival_tol: 1e-2,
            interp_method: 0,
        },
        FGmaxGrid {
            x1: -155.248,
            x2: -155.238,
            y1: 19.987,
            y2: 19.998,
            dx: 1.0 / (3.0 * 3600.0),
            tstart_max: BUTLER_GAUGE_FINE_ON,
            tend_max: 1e10,
            dt_check: 20.0,
            min_level_check: 3,
            arrival_tol: 1e-2,
            interp_method: 0,
        },
    ];
    Ok(rundata)
}

/// Transect comparison presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransectCase {
    /// Trans-Pacific line from Japan toward Hawaii, 8 hourly frames
    Tohoku,
    /// Aleutians to Hawaii, 5 hourly frames, plotted against latitude
    Butler,
}

pub struct TransectPreset {
    pub name: &'static str,
    pub line: TransectLine,
    pub sample_count: usize,
    pub mask: WetDryMask,
    pub axis: TransectAxis,
    pub frames: Vec<usize>,
    pub baseline_dir: PathBuf,
    pub treatment_dir: PathBuf,
}

impl TransectCase {
    pub fn preset(&self) -> TransectPreset {
        match self {
            TransectCase::Tohoku => TransectPreset {
                name: "tohoku",
                line: TransectLine::new((145.0, 35.0), (210.0, 20.0)),
                sample_count: 1000,
                mask: WetDryMask::DryTolerance(0.01),
                axis: TransectAxis::Longitude,
                frames: (1..=8).collect(),
                baseline_dir: PathBuf::from("_output_nosphere"),
                treatment_dir: PathBuf::from("_output_sphere"),
            },
            TransectCase::Butler => TransectPreset {
                name: "butler",
                line: TransectLine::new((-168.0, 51.0), (-150.0, 12.0)),
                sample_count: 1000,
                mask: WetDryMask::Unmasked,
                axis: TransectAxis::Latitude,
                frames: (1..=5).collect(),
                baseline_dir: PathBuf::from("_output_nosphere_6hr"),
                treatment_dir: PathBuf::from("_output_sphere_6hr"),
            },
        }
    }
}

/// Mass conservation presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MassCase {
    /// 1-D radially symmetric ring
    Ring,
    /// 2-D non-polar axisymmetric hump
    Nonpolar,
}

pub struct MassPreset {
    pub num_dim: usize,
    pub reference_mass: f64,
    pub baseline_log: PathBuf,
    pub treatment_log: PathBuf,
    pub baseline: DriftOptions,
    pub treatment: DriftOptions,
    /// Leading records excluded from the plot
    pub skip: usize,
}

impl MassCase {
    pub fn preset(&self) -> MassPreset {
        match self {
            MassCase::Ring => {
                let options = DriftOptions {
                    format: LogFormat::table(0, 2).with_quantity(LoggedQuantity::Change),
                    cutoff: None,
                };
                MassPreset {
                    num_dim: 1,
                    reference_mass: 0.786581E+14,
                    baseline_log: PathBuf::from("_output_nosphere/total_zeta_mass.txt"),
                    treatment_log: PathBuf::from("_output_sphere/total_zeta_mass.txt"),
                    baseline: options.clone(),
                    treatment: options,
                    skip: 2,
                }
            }
            MassCase::Nonpolar => {
                let format = LogFormat::default().with_quantity(LoggedQuantity::Change);
                MassPreset {
                    num_dim: 2,
                    reference_mass: 0.484246850749566E+15,
                    baseline_log: PathBuf::from("_output_nosphere/zeta.txt"),
                    treatment_log: PathBuf::from("_output_sphere/zeta.txt"),
                    baseline: DriftOptions {
                        format,
                        cutoff: None,
                    },
                    treatment: DriftOptions {
                        format,
                        cutoff: Some(5.0 * SECONDS_PER_HOUR),
                    },
                    skip: 2,
                }
            }
        }
    }
}

/// Frame rendering presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FrameCase {
    Tohoku,
    Butler,
    /// 1-D ring profiles
    Ring,
}

pub struct FramePreset {
    pub name: &'static str,
    pub outdir: PathBuf,
    pub frames: Vec<usize>,
    /// Line drawn over 2-D frames
    pub transect: Option<TransectLine>,
    /// Water colormap range overriding the view default
    pub water_range: Option<(f64, f64)>,
    pub land_range: (f64, f64),
}

impl FrameCase {
    pub fn preset(&self) -> FramePreset {
        match self {
            FrameCase::Tohoku => FramePreset {
                name: "tohoku_sphere",
                outdir: PathBuf::from("_output_sphere"),
                frames: (0..=8).collect(),
                transect: Some(TransectCase::Tohoku.preset().line),
                water_range: None,
                land_range: (0.0, 100.0),
            },
            FrameCase::Butler => FramePreset {
                name: "butler_nosphere",
                outdir: PathBuf::from("_output_nosphere_6hr"),
                frames: vec![1, 3, 5],
                transect: Some(TransectCase::Butler.preset().line),
                water_range: Some((-1.0, 1.0)),
                land_range: (0.0, 2000.0),
            },
            FrameCase::Ring => FramePreset {
                name: "sphere",
                outdir: PathBuf::from("_output_sphere"),
                frames: vec![0, 4, 8, 10, 12, 14],
                transect: None,
                water_range: None,
                land_range: (0.0, 100.0),
            },
        }
    }
}

/// DART buoys with detided records for the Tohoku event
pub const TOHOKU_DART_GAUGES: [u32; 8] = [21401, 21413, 21414, 21415, 21418, 21419, 51407, 52402];

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
        (Some(std::env::temp_dir()), Some(std::env::temp_dir()))
    }

    #[test]
    fn test_fixtures_parse() {
        assert_eq!(parse_topofile_csv(BUTLER_TOPOFILES).unwrap().len(), 8);
        assert_eq!(Gauge::parse_gauge_csv(BUTLER_GAUGES).unwrap().len(), 10);
        assert_eq!(butler_flagregions().unwrap().len(), 15);
    }

    #[test]
    fn test_butler_region_order() {
        let regions = butler_flagregions().unwrap();
        assert_eq!(regions[0].name, "Region_domain_firsthour");
        assert_eq!(regions[2].name, "Region_dtopo");
        assert_eq!(regions[14].name, "Region_Hilo_13sec");
        assert_eq!(regions[14].spatial_region, [-155.252, -155.23, 19.98, 20.01]);
    }

    #[test]
    fn test_butler_rundata() {
        let (topo, dtopo) = temp_dirs();
        let rundata = butler_rundata(topo, dtopo, 2).unwrap();
        assert_eq!(rundata.clawdata.num_cells, [89, 51]);
        assert_eq!(rundata.geo_data.sphere_source, 2);
        assert_eq!(rundata.gauges.len(), 10);
        assert_eq!(rundata.gauges[9].id, 7760);
        assert_eq!(rundata.fgmax_data.fgmax_grids.len(), 2);
        assert_eq!(
            rundata.dtopo_data.dtopofiles[0].path,
            std::env::temp_dir().join("Butler6.tt3")
        );
        assert!((rundata.clawdata.lower[0] - (-199.0 - SEC16)).abs() < 1e-12);
    }

    #[test]
    fn test_butler_rundata_needs_topo_dir() {
        let missing = Some(std::env::temp_dir().join("gst-cmd-missing-topo"));
        let err = butler_rundata(missing, None, 0).unwrap_err();
        assert!(matches!(err, ClawError::MissingContext(_)));
    }

    #[test]
    fn test_presets() {
        let tohoku = TransectCase::Tohoku.preset();
        assert_eq!(tohoku.frames, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(tohoku.mask, WetDryMask::DryTolerance(0.01));
        let nonpolar = MassCase::Nonpolar.preset();
        assert_eq!(nonpolar.treatment.cutoff, Some(18000.0));
        assert_eq!(nonpolar.baseline.cutoff, None);
        assert_eq!(FrameCase::Ring.preset().frames.len(), 6);
    }
}
