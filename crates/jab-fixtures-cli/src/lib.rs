//! jabfix CLI library
//!
//! Command-line front end for `jab-fixtures`: list the demo catalog, fetch
//! the demo files, and hold a launched session open for manual inspection.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

mod commands;
mod config;
mod error;
pub mod handlers;
mod output;

pub use commands::{Cli, ColorArg, Commands, FetchArgs, HoldArgs, LaunchArgs, ListArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{render_table, Reporter};
