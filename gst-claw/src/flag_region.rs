use crate::error::{ClawError, Result};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};

/// Effectively "forever" for flag region and gauge end times
pub const T_FOREVER: f64 = 1e9;

/// A space-time rectangle with the refinement levels the solver must keep
/// between `minlevel` and `maxlevel` while `t1 <= t <= t2`.
///
/// Regions are written in list order; the solver decides precedence.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct FlagRegion {
    pub name: String,
    pub minlevel: u32,
    pub maxlevel: u32,
    pub t1: f64,
    pub t2: f64,
    /// `[x1, x2, y1, y2]`
    pub spatial_region: [f64; 4],
}

impl FlagRegion {
    pub fn new(
        name: &str,
        levels: (u32, u32),
        times: (f64, f64),
        spatial_region: [f64; 4],
    ) -> FlagRegion {
        FlagRegion {
            name: name.to_string(),
            minlevel: levels.0,
            maxlevel: levels.1,
            t1: times.0,
            t2: times.1,
            spatial_region,
        }
    }

    /// Solver code for a rectangular region
    pub fn spatial_region_type(&self) -> u32 {
        1
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| ClawError::InvalidRegion {
            name: self.name.clone(),
            reason,
        };
        if self.minlevel < 1 || self.minlevel > self.maxlevel {
            return Err(invalid(format!(
                "levels {}..{} must satisfy 1 <= minlevel <= maxlevel",
                self.minlevel, self.maxlevel
            )));
        }
        if self.t1 > self.t2 {
            return Err(invalid(format!("t1 {} is after t2 {}", self.t1, self.t2)));
        }
        let [x1, x2, y1, y2] = self.spatial_region;
        if x1 >= x2 || y1 >= y2 {
            return Err(invalid(format!(
                "rectangle [{}, {}, {}, {}] is empty",
                x1, x2, y1, y2
            )));
        }
        Ok(())
    }

    /// Parse a CSV string of flag regions into a vector of FlagRegions,
    /// keeping row order.
    ///
    /// Expected CSV columns: name, minlevel, maxlevel, t1, t2, x1, x2, y1, y2
    pub fn parse_flag_region_csv(csv_object: &str) -> Result<Vec<FlagRegion>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(csv_object.as_bytes());
        let mut regions = Vec::new();
        for row in rdr.deserialize::<FlagRegionRow>() {
            regions.push(row?.into());
        }
        Ok(regions)
    }
}

#[derive(Debug, Deserialize)]
struct FlagRegionRow {
    name: String,
    minlevel: u32,
    maxlevel: u32,
    t1: f64,
    t2: f64,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl From<FlagRegionRow> for FlagRegion {
    fn from(row: FlagRegionRow) -> Self {
        FlagRegion {
            name: row.name,
            minlevel: row.minlevel,
            maxlevel: row.maxlevel,
            t1: row.t1,
            t2: row.t2,
            spatial_region: [row.x1, row.x2, row.y1, row.y2],
        }
    }
}
