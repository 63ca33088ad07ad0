//! CLI command implementations.

pub mod chart;
pub mod convert;
pub mod overview;
pub mod probe;
pub mod report;
pub mod validate;
