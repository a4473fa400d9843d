//! Command implementations for the GST CLI.
//!
//! One subcommand per fixed task: write solver inputs for the built-in
//! scenario, and produce the transect, mass drift, frame and gauge
//! figures comparing runs with and without the sphere source term.

use clap::{Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod plots;
pub mod scenario;
pub mod setrun;

use scenario::{FrameCase, MassCase, TransectCase, TOHOKU_DART_GAUGES};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Write solver .data files for the Aleutian (Butler) scenario
    Setrun {
        /// Directory receiving the .data files
        #[arg(short = 'o', long, default_value = ".")]
        outdir: PathBuf,

        /// Base directory of the topography files
        #[arg(long, env = "TOPO_DIR")]
        topo_dir: Option<PathBuf>,

        /// Base directory of the deformation (dtopo) files
        #[arg(long, env = "DTOPO_DIR")]
        dtopo_dir: Option<PathBuf>,

        /// Sphere source term: 0 off, 1 mass only, 2 full
        #[arg(long, default_value_t = 2)]
        sphere_source: u32,

        /// Also write KML overlays of the inputs into this directory
        #[arg(long)]
        kml: Option<PathBuf>,

        /// Also dump the assembled run data as JSON
        #[arg(long)]
        dump_json: Option<PathBuf>,

        /// Write .data files from a JSON dump instead of the built-in scenario
        #[arg(long)]
        from_json: Option<PathBuf>,
    },

    /// Overlay surface transects from runs without and with the source term
    Transect {
        #[arg(value_enum, default_value_t = TransectCase::Tohoku)]
        case: TransectCase,

        #[arg(long)]
        baseline: Option<PathBuf>,

        #[arg(long)]
        treatment: Option<PathBuf>,

        /// Comma separated frame numbers
        #[arg(long, value_delimiter = ',')]
        frames: Option<Vec<usize>>,

        /// Points sampled along the line
        #[arg(long)]
        samples: Option<usize>,

        #[arg(long, default_value = ".")]
        plotdir: PathBuf,

        #[arg(long, value_enum, default_value_t = ImageFormat::Png)]
        format: ImageFormat,

        /// Also export each transect as CSV
        #[arg(long)]
        csv: bool,
    },

    /// Plot relative mass drift from conservation logs
    Mass {
        #[arg(value_enum, default_value_t = MassCase::Nonpolar)]
        case: MassCase,

        #[arg(long)]
        baseline_log: Option<PathBuf>,

        #[arg(long)]
        treatment_log: Option<PathBuf>,

        #[arg(long, default_value = ".")]
        plotdir: PathBuf,

        #[arg(long, value_enum, default_value_t = ImageFormat::Png)]
        format: ImageFormat,

        /// Also export the drift series as CSV
        #[arg(long)]
        csv: bool,
    },

    /// Render individual frames
    Frames {
        #[arg(value_enum, default_value_t = FrameCase::Tohoku)]
        case: FrameCase,

        #[arg(long)]
        outdir: Option<PathBuf>,

        /// Comma separated frame numbers
        #[arg(long, value_delimiter = ',')]
        frames: Option<Vec<usize>>,

        /// Close-up window x1,x2,y1,y2
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        zoom: Option<Vec<f64>>,

        #[arg(long, default_value = ".")]
        plotdir: PathBuf,

        #[arg(long, value_enum, default_value_t = ImageFormat::Png)]
        format: ImageFormat,
    },

    /// Plot gauge time series, with DART observations when available
    Gauges {
        #[arg(short = 'o', long, default_value = "_output")]
        outdir: PathBuf,

        #[arg(long, default_value = "SWE")]
        label: String,

        /// Second run drawn on the same axes
        #[arg(long)]
        outdir2: Option<PathBuf>,

        #[arg(long, default_value = "second run")]
        label2: String,

        /// Comma separated gauge numbers (defaults to the Tohoku DART buoys)
        #[arg(long, value_delimiter = ',')]
        gauges: Option<Vec<u32>>,

        /// Directory of `<gaugeno>*_notide.txt` observation files
        #[arg(long)]
        dart_dir: Option<PathBuf>,

        /// Time window in seconds, t1,t2
        #[arg(long, value_delimiter = ',')]
        tlimits: Option<Vec<f64>>,

        #[arg(long, default_value = ".")]
        plotdir: PathBuf,

        #[arg(long, value_enum, default_value_t = ImageFormat::Png)]
        format: ImageFormat,
    },
}

fn window(values: Vec<f64>) -> anyhow::Result<[f64; 4]> {
    <[f64; 4]>::try_from(values.as_slice())
        .map_err(|_| anyhow::anyhow!("zoom window needs 4 values x1,x2,y1,y2, got {}", values.len()))
}

fn time_window(values: Vec<f64>) -> anyhow::Result<(f64, f64)> {
    match values.as_slice() {
        [t1, t2] if t1 < t2 => Ok((*t1, *t2)),
        _ => anyhow::bail!("tlimits needs two increasing values t1,t2, got {:?}", values),
    }
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Setrun {
            outdir,
            topo_dir,
            dtopo_dir,
            sphere_source,
            kml,
            dump_json,
            from_json,
        } => setrun::run_setrun(setrun::SetrunArgs {
            outdir,
            topo_dir,
            dtopo_dir,
            sphere_source,
            kml_dir: kml,
            dump_json,
            from_json,
        }),
        Command::Transect {
            case,
            baseline,
            treatment,
            frames,
            samples,
            plotdir,
            format,
            csv,
        } => plots::run_transect(plots::TransectArgs {
            case,
            baseline_dir: baseline,
            treatment_dir: treatment,
            frames,
            sample_count: samples,
            plotdir,
            extension: format.extension().to_string(),
            csv,
        }),
        Command::Mass {
            case,
            baseline_log,
            treatment_log,
            plotdir,
            format,
            csv,
        } => plots::run_mass(plots::MassArgs {
            case,
            baseline_log,
            treatment_log,
            plotdir,
            extension: format.extension().to_string(),
            csv,
        }),
        Command::Frames {
            case,
            outdir,
            frames,
            zoom,
            plotdir,
            format,
        } => plots::run_frames(plots::FramesArgs {
            case,
            outdir,
            frames,
            zoom: zoom.map(window).transpose()?,
            plotdir,
            extension: format.extension().to_string(),
        }),
        Command::Gauges {
            outdir,
            label,
            outdir2,
            label2,
            gauges,
            dart_dir,
            tlimits,
            plotdir,
            format,
        } => plots::run_gauges(plots::GaugesArgs {
            outdir,
            label,
            second: outdir2.map(|dir| (label2, dir)),
            gauges: gauges.unwrap_or_else(|| TOHOKU_DART_GAUGES.to_vec()),
            dart_dir,
            tlimits: tlimits.map(time_window).transpose()?,
            plotdir,
            extension: format.extension().to_string(),
        }),
    }
}
