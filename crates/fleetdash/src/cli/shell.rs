//! Interactive scenario session.
//!
//! Each input line is parsed as a command with clap and executed against one
//! [`FleetSession`]. Rejected requests are reported and the session carries
//! on with the fleet unchanged.

use std::io::{BufRead, Write};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::{debug, error};

use super::commands::{
    AddArgs, AgeArgs, BreakdownArgs, ExportArgs, ListArgs, RemoveArgs, RemoveOldestArgs,
    StatsArgs, SummaryArgs,
};
use super::render;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::export;
use crate::session::FleetSession;

/// One line of session input.
#[derive(Debug, Parser)]
#[command(name = "fleet", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

/// Commands available inside a session.
#[derive(Debug, Subcommand)]
pub enum ShellCommand {
    /// Add an aircraft to the fleet
    Add(AddArgs),

    /// Retire the N oldest active aircraft
    RemoveOldest(RemoveOldestArgs),

    /// Retire aircraft by registration
    Remove(RemoveArgs),

    /// Restore the baseline fleet
    Reset,

    /// Show additions and removals for a day
    Summary(SummaryArgs),

    /// Show the fleet table
    List(ListArgs),

    /// Show the average-age projection
    Age(AgeArgs),

    /// Show the fleet breakdown on a date
    Breakdown(BreakdownArgs),

    /// Show fleet statistics
    Stats(StatsArgs),

    /// Export the fleet as CSV
    Export(ExportArgs),

    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

/// Whether the session should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next command.
    Continue,
    /// Stop reading.
    Quit,
}

/// Executes commands against a session.
#[derive(Debug)]
pub struct Shell<'a> {
    session: &'a mut FleetSession,
    config: &'a Config,
}

impl<'a> Shell<'a> {
    /// Create a shell over `session`.
    #[must_use]
    pub fn new(session: &'a mut FleetSession, config: &'a Config) -> Self {
        Self { session, config }
    }

    /// Read commands from `input` until it ends or `quit` is entered.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails. Command
    /// failures are reported to `out` and do not end the session.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        writeln!(out, "Type 'help' for a list of commands.")?;
        self.prompt(out)?;

        for line in input.lines() {
            let line = line?;
            match self.execute_line(&line, out) {
                Ok(Flow::Quit) => return Ok(()),
                Ok(Flow::Continue) => {}
                Err(e) if e.is_rejection() => writeln!(out, "error: {e}")?,
                Err(Error::Io(e)) => return Err(Error::Io(e)),
                Err(e) => {
                    error!("Command failed: {e}");
                    writeln!(out, "error: {e}")?;
                }
            }
            self.prompt(out)?;
        }

        writeln!(out)?;
        Ok(())
    }

    fn prompt<W: Write>(&self, out: &mut W) -> Result<()> {
        write!(out, "{}", self.config.session.prompt)?;
        out.flush()?;
        Ok(())
    }

    /// Parse and execute one line of input.
    ///
    /// Blank lines and lines starting with `#` are ignored. Parse errors and
    /// help requests are written to `out`.
    ///
    /// # Errors
    ///
    /// Returns the error of the executed command.
    pub fn execute_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Flow::Continue);
        }

        match ShellLine::try_parse_from(line.split_whitespace()) {
            Ok(parsed) => self.execute(parsed.command, out),
            Err(e) => {
                debug!("Unparsed input: {line}");
                write!(out, "{}", e.render())?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Execute one command.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rejected, the store fails, or the
    /// output cannot be written. A failed command leaves the fleet unchanged.
    pub fn execute<W: Write>(&mut self, command: ShellCommand, out: &mut W) -> Result<Flow> {
        match command {
            ShellCommand::Add(args) => {
                let candidate = args.into_candidate();
                let registration = candidate.registration.clone();
                self.session.add_aircraft(candidate)?;
                writeln!(out, "{registration} added to the fleet.")?;
            }
            ShellCommand::RemoveOldest(args) => {
                let exit_date = self.date_or_today(args.exit_date);
                let outcome = self.session.remove_oldest(exit_date, args.count)?;
                render::write_removal(out, &outcome)?;
            }
            ShellCommand::Remove(args) => {
                let exit_date = self.date_or_today(args.exit_date);
                let outcome = self
                    .session
                    .remove_by_registration(exit_date, &args.registrations)?;
                render::write_removal(out, &outcome)?;
            }
            ShellCommand::Reset => {
                self.session.reset()?;
                writeln!(out, "Fleet reset to its original state.")?;
            }
            ShellCommand::Summary(args) => {
                let summary = self.session.change_summary(self.date_or_today(args.date))?;
                if args.json {
                    render::write_json(out, &summary)?;
                } else {
                    render::write_change_summary(out, &summary)?;
                }
            }
            ShellCommand::List(args) => {
                let records = match args.active_on {
                    Some(date) => self.session.active_as_of(date)?,
                    None => self.session.records()?,
                };
                if args.json {
                    render::write_json(out, &records)?;
                } else {
                    render::write_records(out, &records)?;
                }
            }
            ShellCommand::Age(args) => {
                let start_year = args.start_year.unwrap_or(self.config.report.start_year);
                let year_count = args.years.unwrap_or(self.config.report.year_count);
                let overview = self.session.age_overview(start_year, year_count)?;
                if args.json {
                    render::write_json(out, &overview)?;
                } else {
                    render::write_age_overview(out, &overview)?;
                }
            }
            ShellCommand::Breakdown(args) => {
                let date = self.date_or_today(args.date);
                let distributions = args
                    .by
                    .fields()
                    .into_iter()
                    .map(|field| self.session.distribution(date, field))
                    .collect::<Result<Vec<_>>>()?;
                if args.json {
                    render::write_json(out, &distributions)?;
                } else {
                    for (i, distribution) in distributions.iter().enumerate() {
                        if i > 0 {
                            writeln!(out)?;
                        }
                        render::write_distribution(out, distribution)?;
                    }
                }
            }
            ShellCommand::Stats(args) => {
                let stats = self.session.stats()?;
                if args.json {
                    render::write_json(out, &stats)?;
                } else {
                    render::write_stats(out, &stats)?;
                }
            }
            ShellCommand::Export(args) => {
                if args.stdout {
                    out.write_all(&self.session.export_csv()?)?;
                } else {
                    let path = args.output.unwrap_or_else(|| self.config.export_path());
                    let records = self.session.records()?;
                    export::write_csv(&records, &path)?;
                    writeln!(
                        out,
                        "Exported {} records to {}",
                        records.len(),
                        path.display()
                    )?;
                }
            }
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn date_or_today(&self, date: Option<NaiveDate>) -> NaiveDate {
        date.unwrap_or_else(|| self.config.today())
    }
}
