//! Command implementations

pub mod headers;
pub mod simulate;
