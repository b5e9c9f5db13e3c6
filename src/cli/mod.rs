//! CLI layer
//!
//! Developer harness commands built with clap.

pub mod commands;
pub mod output;

pub use output::{Output, Table};
