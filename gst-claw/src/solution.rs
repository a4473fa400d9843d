//! Reader for solver frame output.
//!
//! A frame `N` in an output directory consists of:
//! - `fort.tNNNN`: time and sizes, one `value name` pair per line
//!   (time, num_eqn, num_patches, num_aux, num_dim, and in newer
//!   versions num_ghost and the output format)
//! - `fort.qNNNN`: per-patch headers, followed by the cell values when the
//!   output format is ASCII
//! - `fort.bNNNN`: raw little-endian `f64` cell values, including ghost
//!   cells, when the output format is binary
//!
//! Point queries return the value of the cell containing the point on the
//! finest patch covering it, or NaN when no patch covers it.

use crate::error::{ClawError, Result};
use gst_utils::files::frame_file;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Cell data encoding of a frame
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Ascii,
    Binary64,
}

impl OutputFormat {
    /// Solver code written to `claw.data`
    pub fn code(&self) -> u32 {
        match self {
            OutputFormat::Ascii => 1,
            OutputFormat::Binary64 => 3,
        }
    }

    fn from_label(label: &str) -> Option<OutputFormat> {
        match label.trim_matches('\'').to_lowercase().as_str() {
            "ascii" | "1" => Some(OutputFormat::Ascii),
            "binary" | "binary64" | "3" => Some(OutputFormat::Binary64),
            _ => None,
        }
    }
}

/// Which conserved quantity to read from the state vector.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Component {
    /// Water depth h, always the first component
    Depth,
    /// Surface elevation eta, always the last component
    Surface,
    Index(usize),
}

impl Component {
    pub fn index(&self, num_eqn: usize) -> usize {
        match self {
            Component::Depth => 0,
            Component::Surface => num_eqn.saturating_sub(1),
            Component::Index(m) => *m,
        }
    }
}

/// Contents of `fort.tNNNN`
#[derive(Debug, Clone, PartialEq)]
pub struct FrameHeader {
    pub time: f64,
    pub num_eqn: usize,
    pub num_patches: usize,
    pub num_aux: usize,
    pub num_dim: usize,
    pub num_ghost: usize,
    pub format: Option<OutputFormat>,
}

impl FrameHeader {
    pub fn parse(text: &str) -> std::result::Result<FrameHeader, String> {
        let values: Vec<&str> = text
            .lines()
            .filter_map(|line| line.split_whitespace().next())
            .collect();
        if values.len() < 5 {
            return Err(format!("expected at least 5 header values, found {}", values.len()));
        }
        let int = |idx: usize, name: &str| -> std::result::Result<usize, String> {
            values[idx]
                .parse::<usize>()
                .map_err(|_| format!("{} is not an integer: {:?}", name, values[idx]))
        };
        let time = parse_real(values[0]).ok_or_else(|| format!("bad time {:?}", values[0]))?;
        Ok(FrameHeader {
            time,
            num_eqn: int(1, "num_eqn")?,
            num_patches: int(2, "num_patches")?,
            num_aux: int(3, "num_aux")?,
            num_dim: int(4, "num_dim")?,
            num_ghost: if values.len() > 5 { int(5, "num_ghost")? } else { 0 },
            format: values.get(6).and_then(|label| OutputFormat::from_label(label)),
        })
    }
}

/// One AMR grid of a frame. In 1-D, `my == 1`, `ylow == 0` and `dy == 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub grid_number: usize,
    pub level: usize,
    pub mx: usize,
    pub my: usize,
    pub xlow: f64,
    pub ylow: f64,
    pub dx: f64,
    pub dy: f64,
    pub num_eqn: usize,
    /// Cell values, `num_eqn` per cell, cells ordered with `i` fastest
    pub q: Vec<f64>,
}

impl Patch {
    pub fn value(&self, m: usize, i: usize, j: usize) -> f64 {
        self.q[(j * self.mx + i) * self.num_eqn + m]
    }

    pub fn xupper(&self) -> f64 {
        self.xlow + self.mx as f64 * self.dx
    }

    pub fn yupper(&self) -> f64 {
        self.ylow + self.my as f64 * self.dy
    }

    pub fn x_center(&self, i: usize) -> f64 {
        self.xlow + (i as f64 + 0.5) * self.dx
    }

    pub fn y_center(&self, j: usize) -> f64 {
        self.ylow + (j as f64 + 0.5) * self.dy
    }

    fn is_1d(&self) -> bool {
        self.dy == 0.0
    }

    /// Indices of the cell containing `(x, y)`; `y` is ignored in 1-D.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        if !(x >= self.xlow && x <= self.xupper()) {
            return None;
        }
        let i = (((x - self.xlow) / self.dx).floor() as usize).min(self.mx - 1);
        if self.is_1d() {
            return Some((i, 0));
        }
        if !(y >= self.ylow && y <= self.yupper()) {
            return None;
        }
        let j = (((y - self.ylow) / self.dy).floor() as usize).min(self.my - 1);
        Some((i, j))
    }
}

/// An immutable snapshot of solver state at one output time.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub frameno: usize,
    pub time: f64,
    pub num_eqn: usize,
    pub num_aux: usize,
    pub num_dim: usize,
    pub patches: Vec<Patch>,
}

impl Frame {
    /// Read frame `frameno` from `outdir`.
    pub fn read(frameno: usize, outdir: &Path) -> Result<Frame> {
        let t_path = outdir.join(frame_file('t', frameno));
        let q_path = outdir.join(frame_file('q', frameno));
        if !t_path.is_file() || !q_path.is_file() {
            return Err(ClawError::FrameNotFound {
                frameno,
                outdir: outdir.to_path_buf(),
            });
        }
        let header_text = read_text(&t_path)?;
        let header = FrameHeader::parse(&header_text).map_err(|reason| malformed(&t_path, reason))?;

        let b_path = outdir.join(frame_file('b', frameno));
        let format = header.format.unwrap_or(if b_path.is_file() {
            OutputFormat::Binary64
        } else {
            OutputFormat::Ascii
        });

        let q_text = read_text(&q_path)?;
        let patches = match format {
            OutputFormat::Ascii => {
                parse_ascii_patches(&q_text, &header).map_err(|reason| malformed(&q_path, reason))?
            }
            OutputFormat::Binary64 => {
                if !b_path.is_file() {
                    return Err(ClawError::FrameNotFound {
                        frameno,
                        outdir: outdir.to_path_buf(),
                    });
                }
                let bytes = std::fs::read(&b_path).map_err(|e| ClawError::io(&b_path, e))?;
                parse_binary_patches(&q_text, &bytes, &header)
                    .map_err(|reason| malformed(&b_path, reason))?
            }
        };
        debug!(
            "frame {} at t = {} from {:?}: {} patches ({:?})",
            frameno,
            header.time,
            outdir,
            patches.len(),
            format
        );
        Ok(Frame {
            frameno,
            time: header.time,
            num_eqn: header.num_eqn,
            num_aux: header.num_aux,
            num_dim: header.num_dim,
            patches,
        })
    }

    /// The finest patch covering `(x, y)`, later patches winning ties.
    pub fn finest_patch_at(&self, x: f64, y: f64) -> Option<(&Patch, (usize, usize))> {
        let mut best: Option<(&Patch, (usize, usize))> = None;
        for patch in &self.patches {
            if let Some(cell) = patch.cell_at(x, y) {
                match best {
                    Some((current, _)) if current.level > patch.level => {}
                    _ => best = Some((patch, cell)),
                }
            }
        }
        best
    }

    /// Piecewise-constant value of `component` at `(x, y)`, NaN outside the domain.
    pub fn value_at(&self, component: Component, x: f64, y: f64) -> f64 {
        let m = component.index(self.num_eqn);
        match self.finest_patch_at(x, y) {
            Some((patch, (i, j))) => patch.value(m, i, j),
            None => f64::NAN,
        }
    }

    /// Depth and surface elevation at `(x, y)`.
    pub fn depth_and_surface_at(&self, x: f64, y: f64) -> (f64, f64) {
        match self.finest_patch_at(x, y) {
            Some((patch, (i, j))) => (
                patch.value(Component::Depth.index(self.num_eqn), i, j),
                patch.value(Component::Surface.index(self.num_eqn), i, j),
            ),
            None => (f64::NAN, f64::NAN),
        }
    }

    /// Patches sorted coarse to fine, so finer patches draw on top.
    pub fn patches_by_level(&self) -> Vec<&Patch> {
        let mut patches: Vec<&Patch> = self.patches.iter().collect();
        patches.sort_by_key(|patch| patch.level);
        patches
    }

    /// Bounding box `[x1, x2, y1, y2]` of all patches.
    pub fn extent(&self) -> Option<[f64; 4]> {
        self.patches.iter().fold(None, |acc, p| {
            let ext = [p.xlow, p.xupper(), p.ylow, p.yupper()];
            Some(match acc {
                None => ext,
                Some([x1, x2, y1, y2]) => [x1.min(ext[0]), x2.max(ext[1]), y1.min(ext[2]), y2.max(ext[3])],
            })
        })
    }
}

/// Parse a Fortran real, accepting `D` exponents and the exponent-without-`E`
/// form written for three-digit exponents (e.g. `0.1234-100`).
pub fn parse_real(token: &str) -> Option<f64> {
    let token = token.trim().trim_end_matches(',');
    if let Ok(value) = token.parse::<f64>() {
        return Some(value);
    }
    let normalized = token.replace(['D', 'd'], "E");
    if let Ok(value) = normalized.parse::<f64>() {
        return Some(value);
    }
    let split = normalized
        .char_indices()
        .skip(1)
        .filter(|(_, c)| *c == '+' || *c == '-')
        .map(|(idx, _)| idx)
        .last()?;
    let (mantissa, exponent) = normalized.split_at(split);
    if mantissa.ends_with(['E', 'e']) {
        return None;
    }
    format!("{}E{}", mantissa, exponent).parse::<f64>().ok()
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| ClawError::io(path, e))
}

fn malformed(path: &Path, reason: String) -> ClawError {
    ClawError::MalformedFrame {
        path: PathBuf::from(path),
        reason,
    }
}

struct PatchHeader {
    grid_number: usize,
    level: usize,
    mx: usize,
    my: usize,
    xlow: f64,
    ylow: f64,
    dx: f64,
    dy: f64,
}

impl PatchHeader {
    fn lines(num_dim: usize) -> usize {
        if num_dim == 1 {
            5
        } else {
            8
        }
    }

    fn parse(values: &[&str], num_dim: usize) -> std::result::Result<PatchHeader, String> {
        let int = |idx: usize| -> std::result::Result<usize, String> {
            values[idx]
                .parse::<usize>()
                .map_err(|_| format!("expected integer in patch header, found {:?}", values[idx]))
        };
        let real = |idx: usize| -> std::result::Result<f64, String> {
            parse_real(values[idx]).ok_or_else(|| format!("expected real in patch header, found {:?}", values[idx]))
        };
        let header = if num_dim == 1 {
            PatchHeader {
                grid_number: int(0)?,
                level: int(1)?,
                mx: int(2)?,
                my: 1,
                xlow: real(3)?,
                ylow: 0.0,
                dx: real(4)?,
                dy: 0.0,
            }
        } else {
            PatchHeader {
                grid_number: int(0)?,
                level: int(1)?,
                mx: int(2)?,
                my: int(3)?,
                xlow: real(4)?,
                ylow: real(5)?,
                dx: real(6)?,
                dy: real(7)?,
            }
        };
        if header.mx == 0 || header.my == 0 {
            return Err(format!("patch {} has no cells", header.grid_number));
        }
        Ok(header)
    }

    fn into_patch(self, num_eqn: usize, q: Vec<f64>) -> Patch {
        Patch {
            grid_number: self.grid_number,
            level: self.level,
            mx: self.mx,
            my: self.my,
            xlow: self.xlow,
            ylow: self.ylow,
            dx: self.dx,
            dy: self.dy,
            num_eqn,
            q,
        }
    }
}

/// Product of sizes read from a file, or an error when it overflows.
fn checked_size(grid_number: usize, factors: &[usize]) -> std::result::Result<usize, String> {
    factors
        .iter()
        .try_fold(1usize, |acc, &n| acc.checked_mul(n))
        .ok_or_else(|| format!("patch {}: sizes {:?} overflow", grid_number, factors))
}

fn parse_ascii_patches(text: &str, header: &FrameHeader) -> std::result::Result<Vec<Patch>, String> {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
    let header_lines = PatchHeader::lines(header.num_dim);
    let mut patches = Vec::new();
    for patchno in 0..header.num_patches {
        let values: Vec<&str> = lines
            .by_ref()
            .take(header_lines)
            .filter_map(|line| line.split_whitespace().next())
            .collect();
        if values.len() < header_lines {
            return Err(format!(
                "expected {} patches, header of patch {} is truncated",
                header.num_patches,
                patchno + 1
            ));
        }
        let patch_header = PatchHeader::parse(&values, header.num_dim)?;
        let cells = checked_size(patch_header.grid_number, &[patch_header.mx, patch_header.my])?;
        let mut q = Vec::new();
        for _ in 0..cells {
            let line = lines
                .next()
                .ok_or_else(|| format!("patch {} ends early", patch_header.grid_number))?;
            let row = line
                .split_whitespace()
                .map(|token| parse_real(token).ok_or_else(|| format!("bad value {:?}", token)))
                .collect::<std::result::Result<Vec<f64>, String>>()?;
            if row.len() != header.num_eqn {
                return Err(format!(
                    "patch {}: expected {} values per cell, found {}",
                    patch_header.grid_number,
                    header.num_eqn,
                    row.len()
                ));
            }
            q.extend(row);
        }
        patches.push(patch_header.into_patch(header.num_eqn, q));
    }
    Ok(patches)
}

fn parse_binary_patches(
    q_text: &str,
    bytes: &[u8],
    header: &FrameHeader,
) -> std::result::Result<Vec<Patch>, String> {
    if bytes.len() % 8 != 0 {
        return Err(format!("{} bytes is not a whole number of f64 values", bytes.len()));
    }
    let data: Vec<f64> = bytes
        .chunks_exact(8)
        .map(|chunk| {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(chunk);
            f64::from_le_bytes(raw)
        })
        .collect();

    let header_lines = PatchHeader::lines(header.num_dim);
    let values: Vec<&str> = q_text
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .collect();
    if values.len() < header_lines.saturating_mul(header.num_patches) {
        return Err(format!(
            "expected {} patch headers, found {} header lines",
            header.num_patches,
            values.len()
        ));
    }

    let g = header.num_ghost;
    let meqn = header.num_eqn;
    let mut offset = 0usize;
    let mut patches = Vec::new();
    for chunk in values.chunks(header_lines).take(header.num_patches) {
        let patch_header = PatchHeader::parse(chunk, header.num_dim)?;
        let mx = patch_header.mx;
        let my = patch_header.my;
        let grid_number = patch_header.grid_number;
        let padded = |n: usize| {
            g.checked_mul(2)
                .and_then(|ghosts| n.checked_add(ghosts))
                .ok_or_else(|| format!("patch {}: size {} overflows with ghost cells", grid_number, n))
        };
        let (nx, ny) = if header.num_dim == 1 {
            (padded(mx)?, 1)
        } else {
            (padded(mx)?, padded(my)?)
        };
        let len = checked_size(grid_number, &[meqn, nx, ny])?;
        if len > data.len() - offset {
            return Err(format!(
                "data for patch {} is truncated: needs {} values, {} left",
                grid_number,
                len,
                data.len() - offset
            ));
        }
        let block = &data[offset..offset + len];
        offset += len;

        // Fortran order: component fastest, then i, then j, ghost cells included
        let jg = if header.num_dim == 1 { 0 } else { g };
        let mut q = Vec::with_capacity(meqn * mx * my);
        for j in 0..my {
            for i in 0..mx {
                let base = ((j + jg) * nx + (i + g)) * meqn;
                q.extend_from_slice(&block[base..base + meqn]);
            }
        }
        patches.push(patch_header.into_patch(meqn, q));
    }
    if offset != data.len() {
        return Err(format!(
            "{} trailing values after the last patch",
            data.len() - offset
        ));
    }
    Ok(patches)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORT_T: &str = "    0.36000000000000E+04    time
                   4    num_eqn
                   2    nstates
                   0    num_aux
                   2    num_dim
                   2    num_ghost
";

    // Level-1 patch covering [0,2]x[0,1] with 2x1 cells, and a level-2
    // patch covering [1,2]x[0,1] with 1x1 cell.
    const FORT_Q: &str = "                 1    grid_number
                 1    AMR_level
                 2    mx
                 1    my
    0.00000000000000E+00    xlow
    0.00000000000000E+00    ylow
    0.10000000000000E+01    dx
    0.10000000000000E+01    dy

    0.1000000E+02  0.0000000E+00  0.0000000E+00  0.5000000E+00
    0.2000000E+02  0.0000000E+00  0.0000000E+00  0.2500000E+00

                 2    grid_number
                 2    AMR_level
                 1    mx
                 1    my
    0.10000000000000E+01    xlow
    0.00000000000000E+00    ylow
    0.10000000000000E+01    dx
    0.10000000000000E+01    dy

    0.3000000E+02  0.0000000E+00  0.0000000E+00  0.7500000E+00
";

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gst-claw-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_real_variants() {
        assert_eq!(parse_real("0.5E+01"), Some(5.0));
        assert_eq!(parse_real("0.5D+01"), Some(5.0));
        assert_eq!(parse_real("3600.0,"), Some(3600.0));
        assert_eq!(parse_real("0.1000-100"), Some(0.1e-100));
        assert_eq!(parse_real("-0.25"), Some(-0.25));
        assert_eq!(parse_real("abc"), None);
    }

    #[test]
    fn test_header_parse() {
        let header = FrameHeader::parse(FORT_T).unwrap();
        assert_eq!(header.time, 3600.0);
        assert_eq!(header.num_eqn, 4);
        assert_eq!(header.num_patches, 2);
        assert_eq!(header.num_dim, 2);
        assert_eq!(header.num_ghost, 2);
        assert_eq!(header.format, None);
    }

    #[test]
    fn test_read_ascii_frame_and_finest_lookup() {
        let dir = scratch_dir("ascii");
        std::fs::write(dir.join("fort.t0003"), FORT_T).unwrap();
        std::fs::write(dir.join("fort.q0003"), FORT_Q).unwrap();
        let frame = Frame::read(3, &dir).unwrap();
        assert_eq!(frame.time, 3600.0);
        assert_eq!(frame.patches.len(), 2);

        // Coarse patch only
        assert_eq!(frame.value_at(Component::Surface, 0.5, 0.5), 0.5);
        assert_eq!(frame.value_at(Component::Depth, 0.5, 0.5), 10.0);
        // Fine patch overrides the coarse cell
        assert_eq!(frame.value_at(Component::Surface, 1.5, 0.5), 0.75);
        assert_eq!(frame.depth_and_surface_at(1.5, 0.5), (30.0, 0.75));
        // Outside every patch
        assert!(frame.value_at(Component::Surface, 5.0, 0.5).is_nan());
        assert_eq!(frame.extent(), Some([0.0, 2.0, 0.0, 1.0]));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_read_binary_frame_strips_ghost_cells() {
        let dir = scratch_dir("binary");
        let fort_t = "0.0 time\n2 num_eqn\n1 nstates\n0 num_aux\n2 num_dim\n1 num_ghost\nbinary64 format\n";
        let fort_q = "1 grid_number\n1 AMR_level\n2 mx\n1 my\n0.0 xlow\n0.0 ylow\n1.0 dx\n1.0 dy\n";
        // 4 x 3 cells with ghosts, 2 components each; interior cells are
        // (i=1, j=1) and (i=2, j=1).
        let mut values = vec![-1.0f64; 2 * 4 * 3];
        let interior = |i: usize, j: usize| (j * 4 + i) * 2;
        values[interior(1, 1)] = 5.0;
        values[interior(1, 1) + 1] = 0.1;
        values[interior(2, 1)] = 6.0;
        values[interior(2, 1) + 1] = 0.2;
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        std::fs::write(dir.join("fort.t0000"), fort_t).unwrap();
        std::fs::write(dir.join("fort.q0000"), fort_q).unwrap();
        std::fs::write(dir.join("fort.b0000"), bytes).unwrap();

        let frame = Frame::read(0, &dir).unwrap();
        let patch = &frame.patches[0];
        assert_eq!(patch.q, vec![5.0, 0.1, 6.0, 0.2]);
        assert_eq!(frame.value_at(Component::Surface, 1.5, 0.5), 0.2);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_frame_is_not_found() {
        let dir = scratch_dir("missing");
        let err = Frame::read(7, &dir).unwrap_err();
        assert!(matches!(err, ClawError::FrameNotFound { frameno: 7, .. }));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_truncated_ascii_is_malformed() {
        let dir = scratch_dir("truncated");
        std::fs::write(dir.join("fort.t0001"), FORT_T).unwrap();
        let truncated: String = FORT_Q.lines().take(12).collect::<Vec<_>>().join("\n");
        std::fs::write(dir.join("fort.q0001"), truncated).unwrap();
        let err = Frame::read(1, &dir).unwrap_err();
        assert!(matches!(err, ClawError::MalformedFrame { .. }));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    fn oversized_patch_q(mx: &str, my: &str) -> String {
        format!(
            "1 grid_number\n1 AMR_level\n{} mx\n{} my\n0.0 xlow\n0.0 ylow\n1.0 dx\n1.0 dy\n",
            mx, my
        )
    }

    #[test]
    fn test_oversized_ascii_patch_is_malformed() {
        let dir = scratch_dir("oversized-ascii");
        std::fs::write(dir.join("fort.t0002"), FORT_T.replace("2    nstates", "1    nstates")).unwrap();
        for (mx, my) in [("100000000000", "1000"), ("18446744073709551615", "2")] {
            std::fs::write(dir.join("fort.q0002"), oversized_patch_q(mx, my)).unwrap();
            let err = Frame::read(2, &dir).unwrap_err();
            assert!(matches!(err, ClawError::MalformedFrame { .. }));
        }
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_oversized_binary_patch_is_malformed() {
        let dir = scratch_dir("oversized-binary");
        let fort_t = "0.0 time\n2 num_eqn\n1 nstates\n0 num_aux\n2 num_dim\n1 num_ghost\nbinary64 format\n";
        std::fs::write(dir.join("fort.t0003"), fort_t).unwrap();
        std::fs::write(dir.join("fort.b0003"), [0u8; 64]).unwrap();
        for (mx, my) in [("100000000000", "1000"), ("18446744073709551615", "2")] {
            std::fs::write(dir.join("fort.q0003"), oversized_patch_q(mx, my)).unwrap();
            let err = Frame::read(3, &dir).unwrap_err();
            assert!(matches!(err, ClawError::MalformedFrame { .. }));
        }
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_one_dimensional_lookup_ignores_y() {
        let patch = Patch {
            grid_number: 1,
            level: 1,
            mx: 4,
            my: 1,
            xlow: 0.0,
            ylow: 0.0,
            dx: 0.5,
            dy: 0.0,
            num_eqn: 3,
            q: vec![
                1.0, 0.0, 0.1, 1.0, 0.0, 0.2, 1.0, 0.0, 0.3, 1.0, 0.0, 0.4,
            ],
        };
        assert_eq!(patch.cell_at(1.2, 99.0), Some((2, 0)));
        assert_eq!(patch.cell_at(2.0, 0.0), Some((3, 0)));
        assert_eq!(patch.cell_at(2.1, 0.0), None);
    }
}
