//! Library portion of the recast CLI.
//!
//! Contains argument definitions and command logic, re-exported for the
//! binary and integration tests.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;

pub use cli::{Cli, Commands, RunArgs};
pub use commands::run::execute;
