//! Figure-producing subcommands. Each reads solver output, reduces it with
//! `gst-data` and writes one or more figures with `gst-plot`.

use crate::scenario::{FrameCase, MassCase, TransectCase};
use anyhow::Context;
use gst_claw::solution::Frame;
use gst_data::gauge::{compare_gauge, ObservationSet};
use gst_data::mass::{max_drift, read_mass_log, relative_mass_drift, write_drift_csv};
use gst_data::transect::compare;
use gst_plot::frame_chart::{FrameChart, FrameView};
use gst_plot::gauge_chart::GaugeChart;
use gst_plot::mass_chart::{MassDriftChart, MassRun};
use gst_plot::transect_chart::TransectChart;
use gst_plot::{save, BASELINE_COLOR, TREATMENT_COLOR};
use gst_utils::files::numbered;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Image extension used for every figure name
pub fn image_name(stem: &str, extension: &str) -> String {
    format!("{}.{}", stem, extension)
}

fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {:?}", dir))
}

pub struct TransectArgs {
    pub case: TransectCase,
    pub baseline_dir: Option<PathBuf>,
    pub treatment_dir: Option<PathBuf>,
    pub frames: Option<Vec<usize>>,
    pub sample_count: Option<usize>,
    pub plotdir: PathBuf,
    pub extension: String,
    pub csv: bool,
}

pub fn run_transect(args: TransectArgs) -> anyhow::Result<()> {
    let preset = args.case.preset();
    let frames = args.frames.unwrap_or(preset.frames);
    let baseline_dir = args.baseline_dir.unwrap_or(preset.baseline_dir);
    let treatment_dir = args.treatment_dir.unwrap_or(preset.treatment_dir);
    let last_hour = frames.iter().max().copied().unwrap_or(0);

    let comparison = compare(
        &baseline_dir,
        &treatment_dir,
        &frames,
        &preset.line,
        args.sample_count.unwrap_or(preset.sample_count),
        preset.mask,
    )?;

    ensure_dir(&args.plotdir)?;
    let stem = format!("{}_transect_{}hrs", preset.name, last_hour);
    let chart = TransectChart::new(&comparison, preset.axis);
    save(&chart, &args.plotdir.join(image_name(&stem, &args.extension)))?;

    if args.csv {
        for (label, transects) in [("nosphere", &comparison.baseline), ("sphere", &comparison.treatment)] {
            for transect in transects {
                let name = format!("{}_{}_{}.csv", preset.name, label, numbered("frame", transect.frameno, 4));
                let path = args.plotdir.join(name);
                transect.write_csv(&path)?;
                info!("Wrote {:?}", path);
            }
        }
    }
    Ok(())
}

pub struct MassArgs {
    pub case: MassCase,
    pub baseline_log: Option<PathBuf>,
    pub treatment_log: Option<PathBuf>,
    pub plotdir: PathBuf,
    pub extension: String,
    pub csv: bool,
}

pub fn run_mass(args: MassArgs) -> anyhow::Result<()> {
    let preset = args.case.preset();
    let runs = [
        (
            "nosphere",
            "no source term",
            BASELINE_COLOR,
            args.baseline_log.unwrap_or(preset.baseline_log),
            &preset.baseline,
        ),
        (
            "sphere",
            "with source term",
            TREATMENT_COLOR,
            args.treatment_log.unwrap_or(preset.treatment_log),
            &preset.treatment,
        ),
    ];

    let mut series = Vec::with_capacity(runs.len());
    for (run, label, color, log_path, options) in runs {
        let records = read_mass_log(&log_path, preset.skip)?;
        let samples = relative_mass_drift(&records, preset.reference_mass, options)
            .with_context(|| format!("computing mass drift from {:?}", log_path))?;
        info!("{}: max relative drift {:.3e}", label, max_drift(&samples));
        series.push((run, label, color, log_path, samples));
    }

    ensure_dir(&args.plotdir)?;
    let mut chart_runs = Vec::with_capacity(series.len());
    for (run, label, color, log_path, samples) in series {
        if args.csv {
            let stem = log_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("mass");
            let path = args.plotdir.join(format!("{}_{}_drift.csv", stem, run));
            write_drift_csv(&samples, &path)?;
            info!("Wrote {:?}", path);
        }
        chart_runs.push(MassRun {
            label: label.to_string(),
            color,
            samples,
        });
    }

    let stem = format!("mass{}d", preset.num_dim);
    save(
        &MassDriftChart::new(chart_runs),
        &args.plotdir.join(image_name(&stem, &args.extension)),
    )?;
    Ok(())
}

pub struct FramesArgs {
    pub case: FrameCase,
    pub outdir: Option<PathBuf>,
    pub frames: Option<Vec<usize>>,
    /// `[x1, x2, y1, y2]` close-up instead of the preset view
    pub zoom: Option<[f64; 4]>,
    pub plotdir: PathBuf,
    pub extension: String,
}

pub fn run_frames(args: FramesArgs) -> anyhow::Result<()> {
    let preset = args.case.preset();
    let outdir = args.outdir.unwrap_or(preset.outdir);
    let frames = args.frames.unwrap_or(preset.frames);
    ensure_dir(&args.plotdir)?;

    for frameno in frames {
        let frame = Frame::read(frameno, &outdir)?;
        let view = match (args.zoom, preset.transect) {
            (Some(window), _) => FrameView::Zoom { window },
            (None, Some(line)) => FrameView::WithTransect { window: None, line },
            (None, None) => FrameView::Full,
        };
        let mut chart = FrameChart::new(&frame, view).with_land_range(preset.land_range);
        if let Some(range) = preset.water_range {
            chart = chart.with_water_range(range);
        }

        let stem = if frame.num_dim == 1 {
            format!("{}_1d_frame{:02}", preset.name, frameno)
        } else {
            format!("{}_frame{:02}", preset.name, frameno)
        };
        save(&chart, &args.plotdir.join(image_name(&stem, &args.extension)))?;
    }
    Ok(())
}

pub struct GaugesArgs {
    pub outdir: PathBuf,
    pub label: String,
    pub second: Option<(String, PathBuf)>,
    pub gauges: Vec<u32>,
    pub dart_dir: Option<PathBuf>,
    pub tlimits: Option<(f64, f64)>,
    pub plotdir: PathBuf,
    pub extension: String,
}

pub fn run_gauges(args: GaugesArgs) -> anyhow::Result<()> {
    let observations = match &args.dart_dir {
        Some(dir) => ObservationSet::from_dart_dir(dir, &args.gauges)?,
        None => ObservationSet::new(),
    };
    let mut runs = vec![(args.label.clone(), args.outdir.clone())];
    if let Some(second) = &args.second {
        runs.push(second.clone());
    }
    ensure_dir(&args.plotdir)?;

    for &gaugeno in &args.gauges {
        let comparison = compare_gauge(gaugeno, &runs, &observations)?;
        if comparison.observed.is_none() && args.dart_dir.is_some() {
            warn!("no observations for gauge {}", gaugeno);
        }
        let chart = GaugeChart {
            tlimits: args.tlimits,
            ..GaugeChart::new(&comparison)
        };
        let stem = numbered("gauge", gaugeno as usize, 5);
        save(&chart, &args.plotdir.join(image_name(&stem, &args.extension)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gst_claw::error::ClawError;
    use gst_data::error::DataError;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gst-cmd-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_image_name() {
        assert_eq!(image_name("tohoku_transect_8hrs", "png"), "tohoku_transect_8hrs.png");
    }

    #[test]
    fn test_transect_missing_frame_fails() {
        let dir = scratch("transect-missing");
        let err = run_transect(TransectArgs {
            case: TransectCase::Butler,
            baseline_dir: Some(dir.clone()),
            treatment_dir: Some(dir.clone()),
            frames: Some(vec![1]),
            sample_count: Some(10),
            plotdir: dir.clone(),
            extension: "png".to_string(),
            csv: false,
        })
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::Claw(ClawError::FrameNotFound { frameno: 1, .. }))
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_mass_malformed_log_fails() {
        let dir = scratch("mass-malformed");
        let log = dir.join("total_zeta_mass.txt");
        std::fs::write(&log, "0.0 1 0.0\n1.0 1 0.0\n2.0 1 oops\n").unwrap();
        let err = run_mass(MassArgs {
            case: MassCase::Ring,
            baseline_log: Some(log.clone()),
            treatment_log: Some(log),
            plotdir: dir.clone(),
            extension: "png".to_string(),
            csv: false,
        })
        .unwrap_err();
        assert!(err.chain().any(|cause| cause.to_string().contains("malformed mass log line 1")));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_mass_failure_leaves_no_artifacts() {
        let dir = scratch("mass-partial");
        let good = dir.join("good.txt");
        let bad = dir.join("bad.txt");
        std::fs::write(&good, "0.0 1 0.0\n1.0 1 0.0\n2.0 1 1.0e9\n").unwrap();
        std::fs::write(&bad, "0.0 1 0.0\n1.0 1 0.0\n2.0 1 oops\n").unwrap();
        let plotdir = dir.join("plots");
        let err = run_mass(MassArgs {
            case: MassCase::Ring,
            baseline_log: Some(good),
            treatment_log: Some(bad),
            plotdir: plotdir.clone(),
            extension: "png".to_string(),
            csv: true,
        })
        .unwrap_err();
        assert!(err.chain().any(|cause| cause.to_string().contains("bad.txt")));
        assert!(!plotdir.exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
