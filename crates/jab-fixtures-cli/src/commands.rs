//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// jabfix: fetch and launch Swing demo applications for accessibility tests
#[derive(Parser, Debug)]
#[command(name = "jabfix")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Harness configuration file (YAML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List catalog entries
    List(ListArgs),

    /// Download missing demo applications
    Fetch(FetchArgs),

    /// Launch a demo application and bind a driver to its window
    Launch(LaunchArgs),

    /// Launch the Java Control Panel and bind a driver to it
    ControlPanel(HoldArgs),

    /// Show effective configuration
    Config,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the fetch command
#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// Download directory (overrides configuration)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,
}

/// Arguments for the launch command
#[derive(Parser, Debug)]
pub struct LaunchArgs {
    /// Catalog entry name, e.g. BUTTON or table-ftf-edit
    pub app: String,

    /// Session options
    #[command(flatten)]
    pub hold: HoldArgs,
}

/// How long to keep a launched session alive
#[derive(Parser, Debug)]
pub struct HoldArgs {
    /// Keep the session for this many milliseconds instead of waiting for Enter
    #[arg(long)]
    pub hold_ms: Option<u64>,

    /// Poll for the window after binding, up to this many milliseconds
    #[arg(long)]
    pub wait_ms: Option<u64>,
}

/// Color argument for CLI
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum ColorArg {
    /// Automatic detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
