//! Write solver input files for the built-in scenario.

use crate::scenario::butler_rundata;
use anyhow::Context;
use gst_claw::kml::{input_kmls, write_kmls};
use gst_claw::rundata::RunData;
use log::info;
use std::path::{Path, PathBuf};

pub struct SetrunArgs {
    pub outdir: PathBuf,
    pub topo_dir: Option<PathBuf>,
    pub dtopo_dir: Option<PathBuf>,
    pub sphere_source: u32,
    pub kml_dir: Option<PathBuf>,
    pub dump_json: Option<PathBuf>,
    pub from_json: Option<PathBuf>,
}

fn load_json(path: &Path) -> anyhow::Result<RunData> {
    let json = std::fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    let rundata =
        RunData::from_json(&json).with_context(|| format!("parsing run data from {:?}", path))?;
    rundata
        .validate()
        .with_context(|| format!("validating run data from {:?}", path))?;
    Ok(rundata)
}

/// Everything is rendered before the first file is written.
pub fn run_setrun(args: SetrunArgs) -> anyhow::Result<()> {
    let rundata = match &args.from_json {
        Some(path) => load_json(path)?,
        None => butler_rundata(args.topo_dir, args.dtopo_dir, args.sphere_source)?,
    };
    let json = match &args.dump_json {
        Some(path) => Some((path, rundata.to_json()?)),
        None => None,
    };
    let kmls = args.kml_dir.as_ref().map(|dir| (dir, input_kmls(&rundata)));

    let written = rundata.write(&args.outdir)?;
    info!("Wrote {} data files to {:?}", written.len(), args.outdir);

    if let Some((path, text)) = json {
        std::fs::write(path, text).with_context(|| format!("writing {:?}", path))?;
        info!("Wrote {:?}", path);
    }
    if let Some((dir, files)) = kmls {
        let kmls = write_kmls(&files, dir)?;
        info!("Wrote {} KML files to {:?}", kmls.len(), dir);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gst-cmd-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_setrun_writes_data_json_and_kml() {
        let dir = scratch("setrun");
        let args = SetrunArgs {
            outdir: dir.clone(),
            topo_dir: Some(std::env::temp_dir()),
            dtopo_dir: Some(std::env::temp_dir()),
            sphere_source: 2,
            kml_dir: Some(dir.join("kml")),
            dump_json: Some(dir.join("rundata.json")),
            from_json: None,
        };
        run_setrun(args).unwrap();
        assert!(dir.join("claw.data").is_file());
        let json = std::fs::read_to_string(dir.join("rundata.json")).unwrap();
        assert_eq!(RunData::from_json(&json).unwrap().flagregions.len(), 15);
        assert!(dir.join("flagregions.data").is_file());
        assert!(dir.join("kml").join("Domain.kml").is_file());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_setrun_from_json_round_trip() {
        let dir = scratch("setrun-json");
        std::fs::create_dir_all(&dir).unwrap();
        let json = dir.join("rundata.json");
        run_setrun(SetrunArgs {
            outdir: dir.join("first"),
            topo_dir: Some(std::env::temp_dir()),
            dtopo_dir: Some(std::env::temp_dir()),
            sphere_source: 0,
            kml_dir: None,
            dump_json: Some(json.clone()),
            from_json: None,
        })
        .unwrap();
        run_setrun(SetrunArgs {
            outdir: dir.join("second"),
            topo_dir: None,
            dtopo_dir: None,
            sphere_source: 2,
            kml_dir: None,
            dump_json: None,
            from_json: Some(json),
        })
        .unwrap();
        for name in ["claw.data", "geoclaw.data", "gauges.data"] {
            assert_eq!(
                std::fs::read_to_string(dir.join("first").join(name)).unwrap(),
                std::fs::read_to_string(dir.join("second").join(name)).unwrap()
            );
        }
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_setrun_rejects_invalid_json_without_writing() {
        let dir = scratch("setrun-bad-json");
        std::fs::create_dir_all(&dir).unwrap();
        let mut rundata = butler_rundata(
            Some(std::env::temp_dir()),
            Some(std::env::temp_dir()),
            2,
        )
        .unwrap();
        rundata.gauges[0].t1 = 7200.0;
        rundata.gauges[0].t2 = 3600.0;
        rundata.clawdata.num_cells = [0, 0];
        let json = dir.join("rundata.json");
        std::fs::write(&json, rundata.to_json().unwrap()).unwrap();

        let outdir = dir.join("out");
        let err = run_setrun(SetrunArgs {
            outdir: outdir.clone(),
            topo_dir: None,
            dtopo_dir: None,
            sphere_source: 2,
            kml_dir: Some(dir.join("kml")),
            dump_json: None,
            from_json: Some(json),
        })
        .unwrap_err();
        assert!(err.downcast_ref::<gst_claw::error::ClawError>().is_some());
        assert!(!outdir.exists());
        assert!(!dir.join("kml").exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
