//! jabfix: Swing demo fixtures from the command line
//!
//! ## Usage
//!
//! ```bash
//! jabfix list                     # Show the catalog
//! jabfix fetch --dir jnlps        # Download missing demo files
//! jabfix launch BUTTON            # Launch, bind, wait for Enter, tear down
//! jabfix config                   # Print effective configuration
//! ```

use clap::Parser;
use jab_fixtures::logging;
use jab_fixtures_cli::{handlers, Cli, CliConfig, CliResult, ColorChoice, Commands, Verbosity};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    logging::init(config.verbosity.log_directive());

    let harness_config = handlers::load_harness_config(cli.config.as_deref())?;
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::List(args) => handlers::run_list(&harness_config, &args, &mut stdout),
        Commands::Fetch(args) => handlers::run_fetch(&config, harness_config, &args),
        Commands::Launch(args) => handlers::run_launch(&config, harness_config, &args),
        Commands::ControlPanel(args) => {
            handlers::run_control_panel(&config, harness_config, &args)
        }
        Commands::Config => handlers::run_config(&harness_config, &mut stdout),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.into();
    CliConfig::new().with_verbosity(verbosity).with_color(color)
}
