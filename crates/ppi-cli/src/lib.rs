//! Profanity Power Index command line
//!
//! `collect` fills the index, `extract` turns it into a CSV report, `build`
//! renders the static site and `serve` exposes the report to dashboards.

pub mod cli;
pub mod commands;
pub mod logging;

pub use cli::{Cli, Commands};
