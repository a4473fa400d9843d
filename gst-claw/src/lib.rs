//! Solver-facing types for GeoClaw sphere-source runs.
//!
//! - [`rundata`]: hierarchical run parameters, assembled by
//!   [`builder::build_config`] and written by [`datafile`]
//! - [`solution`]: frame reader with finest-patch point queries
//! - [`gauge`]: gauge definitions and recorded gauge time series
//! - [`kml`]: map overlays of the run inputs

pub mod builder;
pub mod datafile;
pub mod error;
pub mod flag_region;
pub mod gauge;
pub mod kml;
pub mod rundata;
pub mod solution;
