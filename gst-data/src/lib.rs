//! Reductions over solver output for comparing runs with and without the
//! sphere source term.
//!
//! - [`transect`]: surface elevation along a straight line
//! - [`mass`]: relative drift of total mass from conservation logs
//! - [`gauge`]: gauge series paired with observed data

pub mod error;
pub mod gauge;
pub mod mass;
pub mod transect;
