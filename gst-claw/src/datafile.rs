//! Serialization of [`RunData`] to the solver's `*.data` input files.
//!
//! Every file starts with a generated-file banner and contains one
//! parameter per line in the form `value =: name`, with the value
//! left-justified to 20 columns. File lists and per-region blocks are
//! preceded by their count.

use crate::error::{ClawError, Result};
use crate::rundata::{Checkpoint, OutputStyle, RunData, TopoFile};
use itertools::Itertools;
use log::info;
use std::path::{Path, PathBuf};

const BANNER: &str = "########################################################
### DO NOT EDIT THIS FILE:  GENERATED AUTOMATICALLY ####
### To modify data, edit the run scenario           ####
###    and then run `gst-cli setrun` again           ####
########################################################

";

/// A value that can appear on the left of `=:`
pub trait DataValue {
    fn render(&self) -> String;
}

impl DataValue for f64 {
    fn render(&self) -> String {
        format!("{:?}", self)
    }
}

impl DataValue for u32 {
    fn render(&self) -> String {
        self.to_string()
    }
}

impl DataValue for i32 {
    fn render(&self) -> String {
        self.to_string()
    }
}

impl DataValue for usize {
    fn render(&self) -> String {
        self.to_string()
    }
}

impl DataValue for bool {
    fn render(&self) -> String {
        let flag = if *self { "T" } else { "F" };
        flag.to_string()
    }
}

impl DataValue for &str {
    fn render(&self) -> String {
        format!("'{}'", self)
    }
}

impl<T: DataValue> DataValue for [T] {
    fn render(&self) -> String {
        self.iter().map(DataValue::render).join(" ")
    }
}

impl<T: DataValue, const N: usize> DataValue for [T; N] {
    fn render(&self) -> String {
        self.as_slice().render()
    }
}

impl<T: DataValue> DataValue for Vec<T> {
    fn render(&self) -> String {
        self.as_slice().render()
    }
}

/// In-memory contents of one data file
pub struct DataFile {
    name: &'static str,
    text: String,
}

impl DataFile {
    pub fn new(name: &'static str) -> DataFile {
        DataFile {
            name,
            text: BANNER.to_string(),
        }
    }

    pub fn value<V: DataValue + ?Sized>(&mut self, name: &str, value: &V) -> &mut Self {
        self.text
            .push_str(&format!("{:<20} =: {}\n", value.render(), name));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.text.push('\n');
        self
    }

    pub fn raw(&mut self, line: &str) -> &mut Self {
        self.text.push_str(line);
        self.text.push('\n');
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn write_in(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.name);
        std::fs::write(&path, &self.text).map_err(|e| ClawError::io(&path, e))?;
        Ok(path)
    }
}

impl RunData {
    /// Render all input files without touching the filesystem.
    pub fn data_files(&self) -> Vec<DataFile> {
        vec![
            self.claw_file(),
            self.amr_file(),
            self.geoclaw_file(),
            self.refinement_file(),
            self.topo_file(),
            self.dtopo_file(),
            self.qinit_file(),
            self.gauges_file(),
            self.flagregions_file(),
            self.fgmax_file(),
        ]
    }

    /// Write all input files into `dir`, creating it if needed.
    pub fn write(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir).map_err(|e| ClawError::io(dir, e))?;
        let mut written = Vec::new();
        for file in self.data_files() {
            let path = file.write_in(dir)?;
            info!("Wrote {:?}", path);
            written.push(path);
        }
        Ok(written)
    }

    fn claw_file(&self) -> DataFile {
        let c = &self.clawdata;
        let mut f = DataFile::new("claw.data");
        f.value("num_dim", &c.num_dim)
            .value("lower", &c.lower)
            .value("upper", &c.upper)
            .value("num_cells", &c.num_cells)
            .blank()
            .value("num_eqn", &c.num_eqn)
            .value("num_waves", &c.num_waves)
            .value("num_aux", &c.num_aux)
            .blank()
            .value("t0", &c.t0)
            .blank()
            .value("output_style", &c.output_style.code());
        match &c.output_style {
            OutputStyle::Uniform {
                num_output_times,
                tfinal,
                output_t0,
            } => {
                f.value("num_output_times", num_output_times)
                    .value("tfinal", tfinal)
                    .value("output_t0", output_t0);
            }
            OutputStyle::Times(times) => {
                f.value("num_output_times", &times.len()).value("output_times", times);
            }
            OutputStyle::Steps {
                step_interval,
                total_steps,
                output_t0,
            } => {
                f.value("output_step_interval", step_interval)
                    .value("total_steps", total_steps)
                    .value("output_t0", output_t0);
            }
        }
        f.blank()
            .value("output_format", &c.output_format.code())
            .value("output_q_components", &vec![1u32; c.num_eqn as usize]);
        if c.num_aux > 0 {
            f.value("output_aux_components", &vec![0u32; c.num_aux as usize])
                .value("output_aux_onlyonce", &c.output_aux_onlyonce);
        }
        f.blank()
            .value("dt_initial", &c.dt_initial)
            .value("dt_max", &c.dt_max)
            .value("cfl_max", &c.cfl_max)
            .value("cfl_desired", &c.cfl_desired)
            .value("steps_max", &c.steps_max)
            .blank()
            .value("dt_variable", &c.dt_variable)
            .value("order", &c.order)
            .value("dimensional_split", &c.dimensional_split.code())
            .value("verbosity", &c.verbosity)
            .value("transverse_waves", &c.transverse_waves)
            .value(
                "limiter",
                &c.limiter.iter().map(|l| l.code()).collect::<Vec<u32>>(),
            )
            .value("use_fwaves", &c.use_fwaves)
            .value("source_split", &c.source_split.code())
            .blank()
            .value("capa_index", &c.capa_index)
            .value("num_ghost", &c.num_ghost)
            .value(
                "bc_lower",
                &c.bc_lower.iter().map(|bc| bc.code()).collect::<Vec<u32>>(),
            )
            .value(
                "bc_upper",
                &c.bc_upper.iter().map(|bc| bc.code()).collect::<Vec<u32>>(),
            )
            .blank()
            .value("restart", &c.restart)
            .value("restart_file", &c.restart_file.as_str())
            .value("checkpt_style", &c.checkpoint.code());
        match &c.checkpoint {
            Checkpoint::Times { times, .. } => {
                f.value("num_chkpt_times", &times.len()).value("chkpt_times", times);
            }
            Checkpoint::Interval { steps, .. } => {
                f.value("checkpt_interval", steps);
            }
            Checkpoint::None | Checkpoint::AtEnd => {}
        }
        f
    }

    fn amr_file(&self) -> DataFile {
        let a = &self.amrdata;
        let labels: Vec<&str> = a.aux_type.iter().map(|t| t.label()).collect();
        let mut f = DataFile::new("amr.data");
        f.value("amr_levels_max", &a.amr_levels_max)
            .value("num_ratios", &a.refinement_ratios_x.len())
            .value("refinement_ratios_x", &a.refinement_ratios_x)
            .value("refinement_ratios_y", &a.refinement_ratios_y)
            .value("refinement_ratios_t", &a.refinement_ratios_t)
            .value("num_aux", &a.aux_type.len())
            .value("aux_type", &labels)
            .blank()
            .value("flag_richardson", &a.flag_richardson)
            .value("flag_richardson_tol", &a.flag_richardson_tol)
            .value("flag2refine", &a.flag2refine)
            .value("flag2refine_tol", &a.flag2refine_tol)
            .value("regrid_interval", &a.regrid_interval)
            .value("regrid_buffer_width", &a.regrid_buffer_width)
            .value("clustering_cutoff", &a.clustering_cutoff)
            .value("verbosity_regrid", &a.verbosity_regrid)
            .blank();
        let names = [
            "dprint", "eprint", "edebug", "gprint", "nprint", "pprint", "rprint", "sprint",
            "tprint", "uprint",
        ];
        for (name, flag) in names.iter().zip(a.debug_flags.iter()) {
            f.value(name, flag);
        }
        f
    }

    fn geoclaw_file(&self) -> DataFile {
        let g = &self.geo_data;
        let mut f = DataFile::new("geoclaw.data");
        f.value("gravity", &g.gravity)
            .value("coordinate_system", &g.coordinate_system)
            .value("sphere_source", &g.sphere_source)
            .value("earth_radius", &g.earth_radius)
            .value("coriolis_forcing", &g.coriolis_forcing)
            .value("sea_level", &g.sea_level)
            .value("dry_tolerance", &g.dry_tolerance)
            .value("friction_forcing", &g.friction_forcing)
            .value("manning_coefficient", &g.manning_coefficient)
            .value("friction_depth", &g.friction_depth);
        f
    }

    fn refinement_file(&self) -> DataFile {
        let r = &self.refinement_data;
        let mut f = DataFile::new("refinement.data");
        f.value("wave_tolerance", &r.wave_tolerance)
            .value("speed_tolerance", &r.speed_tolerance)
            .value("deep_depth", &r.deep_depth)
            .value("max_level_deep", &r.max_level_deep)
            .value(
                "variable_dt_refinement_ratios",
                &r.variable_dt_refinement_ratios,
            );
        f
    }

    fn topo_file(&self) -> DataFile {
        let mut f = DataFile::new("topo.data");
        f.value("num_topo_files", &self.topo_data.topofiles.len());
        write_file_list(&mut f, &self.topo_data.topofiles, "topo_type");
        f
    }

    fn dtopo_file(&self) -> DataFile {
        let d = &self.dtopo_data;
        let mut f = DataFile::new("dtopo.data");
        f.value("num_dtopo_files", &d.dtopofiles.len());
        write_file_list(&mut f, &d.dtopofiles, "dtopo_type");
        f.blank().value("dt_max_dtopo", &d.dt_max_dtopo);
        f
    }

    fn qinit_file(&self) -> DataFile {
        let q = &self.qinit_data;
        let mut f = DataFile::new("qinit.data");
        f.value("qinit_type", &q.qinit_type)
            .value("num_qinit_files", &q.qinitfiles.len());
        write_file_list(&mut f, &q.qinitfiles, "qinit_type");
        f.blank().value("variable_eta_init", &q.variable_eta_init);
        f
    }

    fn gauges_file(&self) -> DataFile {
        let mut f = DataFile::new("gauges.data");
        f.value("num_gauges", &self.gauges.len());
        for g in &self.gauges {
            f.raw(&format!(
                "{:4} {:19.10e} {:17.10e} {:13.6e} {:13.6e}",
                g.id, g.x, g.y, g.t1, g.t2
            ));
        }
        f
    }

    fn flagregions_file(&self) -> DataFile {
        let mut f = DataFile::new("flagregions.data");
        f.value("num_flagregions", &self.flagregions.len());
        for region in &self.flagregions {
            f.blank()
                .value("name", &region.name.as_str())
                .value("minlevel", &region.minlevel)
                .value("maxlevel", &region.maxlevel)
                .value("t1", &region.t1)
                .value("t2", &region.t2)
                .value("spatial_region_type", &region.spatial_region_type())
                .value("spatial_region", &region.spatial_region);
        }
        f
    }

    fn fgmax_file(&self) -> DataFile {
        let d = &self.fgmax_data;
        let mut f = DataFile::new("fgmax_grids.data");
        f.value("num_fgmax_val", &d.num_fgmax_val)
            .value("num_fgmax_grids", &d.fgmax_grids.len());
        for fg in &d.fgmax_grids {
            let nx = ((fg.x2 - fg.x1) / fg.dx).round() as usize + 1;
            let ny = ((fg.y2 - fg.y1) / fg.dx).round() as usize + 1;
            f.blank()
                .value("tstart_max", &fg.tstart_max)
                .value("tend_max", &fg.tend_max)
                .value("dt_check", &fg.dt_check)
                .value("min_level_check", &fg.min_level_check)
                .value("arrival_tol", &fg.arrival_tol)
                .value("interp_method", &fg.interp_method)
                .value("point_style", &fg.point_style())
                .value("x1, y1", &[fg.x1, fg.y1])
                .value("x2, y2", &[fg.x2, fg.y2])
                .value("nx, ny", &[nx, ny]);
        }
        f
    }
}

fn write_file_list(f: &mut DataFile, files: &[TopoFile], type_name: &str) {
    for file in files {
        f.blank()
            .raw(&format!("'{}'", file.path.display()))
            .value(type_name, &file.topo_type);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flag_region::FlagRegion;
    use crate::gauge::Gauge;

    fn find<'a>(files: &'a [DataFile], name: &str) -> &'a str {
        files
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.text())
            .unwrap()
    }

    #[test]
    fn test_value_line_format() {
        let mut f = DataFile::new("x.data");
        f.value("num_dim", &2u32)
            .value("dt_max", &1e99)
            .value("use_fwaves", &true)
            .value("lower", &[-199.5, 12.0]);
        let lines: Vec<&str> = f.text().lines().skip(6).collect();
        assert_eq!(lines[0], "2                    =: num_dim");
        assert_eq!(lines[1], "1e99                 =: dt_max");
        assert_eq!(lines[2], "T                    =: use_fwaves");
        assert_eq!(lines[3], "-199.5 12.0          =: lower");
    }

    #[test]
    fn test_flagregions_written_in_order() {
        let mut rundata = RunData::default();
        rundata.flagregions = vec![
            FlagRegion::new("first", (1, 3), (0.0, 3600.0), [-1.0, 1.0, -1.0, 1.0]),
            FlagRegion::new("second", (4, 4), (0.0, 30.0), [0.0, 0.5, 0.0, 0.5]),
        ];
        let files = rundata.data_files();
        let text = find(&files, "flagregions.data");
        assert!(text.contains("2                    =: num_flagregions"));
        let first = text.find("'first'").unwrap();
        let second = text.find("'second'").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_gauges_and_files_written() {
        let mut rundata = RunData::default();
        rundata.gauges = vec![Gauge::new(1001, -162.0, 51.5, 0.0, 1e10)];
        rundata.topo_data.topofiles = vec![TopoFile::new(3, "/topo/etopo1.asc")];
        let files = rundata.data_files();
        assert_eq!(files.len(), 10);
        let gauges = find(&files, "gauges.data");
        assert!(gauges.contains("1                    =: num_gauges"));
        assert!(gauges.contains("1001"));
        let topo = find(&files, "topo.data");
        assert!(topo.contains("'/topo/etopo1.asc'"));
        assert!(topo.contains("3                    =: topo_type"));
    }

    #[test]
    fn test_write_creates_all_files() {
        let dir = std::env::temp_dir().join(format!("gst-claw-datafile-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let written = RunData::default().write(&dir).unwrap();
        assert_eq!(written.len(), 10);
        assert!(dir.join("claw.data").is_file());
        assert!(dir.join("fgmax_grids.data").is_file());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
