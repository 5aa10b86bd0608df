//! `fleetdash` - CLI for fleet scenario planning
//!
//! This binary runs one-shot fleet reports against the baseline fleet, or an
//! interactive session in which aircraft can be added and retired.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;

use fleetdash::cli::{Cli, Command, ConfigCommand, Shell};
use fleetdash::{init_logging, BaselineFleet, Config, FleetSession};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
        Command::Session => handle_session(&config),
        report => {
            let mut session = FleetSession::new(BaselineFleet)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            if let Some(command) = report.into_report() {
                Shell::new(&mut session, &config).execute(command, &mut out)?;
            }
            out.flush()?;
            Ok(())
        }
    }
}

fn handle_session(config: &Config) -> anyhow::Result<()> {
    let mut session = FleetSession::new(BaselineFleet)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "fleetdash {}", env!("CARGO_PKG_VERSION"))?;
    Shell::new(&mut session, config)
        .run(stdin.lock(), &mut out)
        .context("session ended unexpectedly")?;
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Report]");
                println!("  Start year:         {}", config.report.start_year);
                println!("  Years projected:    {}", config.report.year_count);
                println!();
                println!("[Export]");
                println!("  Output path:        {}", config.export_path().display());
                println!();
                println!("[Session]");
                match config.session.today {
                    Some(today) => println!("  Today:              {today}"),
                    None => println!("  Today:              (local date)"),
                }
                println!("  Prompt:             {:?}", config.session.prompt);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
