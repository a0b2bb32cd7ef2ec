#![forbid(unsafe_code)]

mod output;
mod parser;

use anyhow::Context;
use clap::Parser;
use output::{CliError, OutputMode, Report};
use parser::{ParseError, ParsedInput};
use pivot_core::config::resolve_config;
use pivot_core::{Command, JsonStorage, Session};
use std::env;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "pivot: command-driven investigation case manager",
    long_about = "Reads commands line by line from stdin. Type `help` at the prompt for the command list."
)]
struct Cli {
    /// Data file to load and save (overrides `[storage] data_file`).
    #[arg(long, value_name = "PATH")]
    data: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, conflicts_with = "format")]
    json: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress the banner, the prompt and info logs.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn output_flag(&self) -> Option<OutputMode> {
        if self.json {
            Some(OutputMode::Json)
        } else {
            self.format
        }
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env("PIVOT_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "pivot=debug,info"
        } else if quiet {
            "warn"
        } else {
            "pivot=info,warn"
        })
    });

    let format = env::var("PIVOT_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}

enum Flow {
    Continue,
    Exit,
}

/// Prompt loop state: the session plus where and how to report.
struct Repl {
    session: Session,
    storage: JsonStorage,
    mode: OutputMode,
}

impl Repl {
    fn handle(&mut self, line: &str) -> anyhow::Result<Flow> {
        match parser::parse_command(line) {
            Err(ParseError::Empty) => {}
            Err(err) => {
                debug!(line, "rejected input: {err}");
                output::render_error(self.mode, &CliError::from(&err))?;
            }
            Ok(ParsedInput::Help) => output::render_notice(self.mode, parser::HELP)?,
            Ok(ParsedInput::Exit) => return Ok(Flow::Exit),
            Ok(ParsedInput::Save) => {
                if self.save()? {
                    let message = format!(
                        "Saved {} case(s) to {}",
                        self.session.repository().cases().len(),
                        self.storage.path().display()
                    );
                    output::render_notice(self.mode, &message)?;
                }
            }
            Ok(ParsedInput::Command(command)) => self.run(&command)?,
        }
        Ok(Flow::Continue)
    }

    fn run(&mut self, command: &Command) -> anyhow::Result<()> {
        match self.session.execute(command) {
            Ok(outcome) => {
                output::render_report(self.mode, &Report::new(&self.session, &outcome))?;
                if outcome.mutated {
                    self.save()?;
                }
            }
            Err(err) => output::render_error(self.mode, &CliError::from(&err))?,
        }
        Ok(())
    }

    /// Write the repository to disk. A failed save is reported, not fatal.
    fn save(&self) -> anyhow::Result<bool> {
        match self.storage.save(self.session.repository().cases()) {
            Ok(()) => Ok(true),
            Err(err) => {
                warn!(path = %self.storage.path().display(), "failed to save cases: {err}");
                output::render_error(self.mode, &CliError::from(&err))?;
                Ok(false)
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let project_root = env::current_dir()?;
    let config = resolve_config(
        &project_root,
        cli.data.as_deref(),
        cli.output_flag().map(OutputMode::as_str),
    )
    .context("failed to load configuration")?;
    let mode = OutputMode::from_config(&config.resolved_output).unwrap_or(OutputMode::Text);
    debug!(output = mode.as_str(), data = %config.data_path.display(), "resolved configuration");

    let storage = JsonStorage::new(&config.data_path);
    let cases = storage
        .load()
        .with_context(|| format!("failed to load {}", storage.path().display()))?
        .unwrap_or_default();
    let mut session = Session::new(cases).context("stored cases are not unique")?;
    if config.project.display.show_archived_on_start {
        session.execute(&Command::ListCases { archived: true })?;
    }

    let stdin = io::stdin();
    let prompt = stdin.is_terminal() && !cli.quiet && !mode.is_json();
    if prompt {
        println!(
            "pivot {}: type `help` for commands, `exit` to quit",
            env!("CARGO_PKG_VERSION")
        );
    }

    let mut repl = Repl {
        session,
        storage,
        mode,
    };
    let mut input = stdin.lock();
    let mut line = String::new();
    loop {
        if prompt {
            print!("> ");
            io::stdout().flush()?;
        }
        line.clear();
        if input.read_line(&mut line).context("failed to read command")? == 0 {
            break;
        }
        if matches!(repl.handle(&line)?, Flow::Exit) {
            break;
        }
    }

    repl.save()?;
    info!(
        cases = repl.session.repository().cases().len(),
        "session ended"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_flags_defers_output_to_config() {
        let cli = Cli::parse_from(["pivot"]);
        assert!(cli.data.is_none());
        assert_eq!(cli.output_flag(), None);
        assert!(!cli.verbose && !cli.quiet);
    }

    #[test]
    fn json_flag_sets_output_mode() {
        let cli = Cli::parse_from(["pivot", "--json"]);
        assert_eq!(cli.output_flag(), Some(OutputMode::Json));
    }

    #[test]
    fn format_flag_parses_value() {
        let cli = Cli::parse_from(["pivot", "--format", "text"]);
        assert_eq!(cli.output_flag(), Some(OutputMode::Text));
    }

    #[test]
    fn json_and_format_conflict() {
        assert!(Cli::try_parse_from(["pivot", "--json", "--format", "pretty"]).is_err());
    }

    #[test]
    fn data_flag_parsed() {
        let cli = Cli::parse_from(["pivot", "--data", "/tmp/cases.json", "-q"]);
        assert_eq!(cli.data, Some(PathBuf::from("/tmp/cases.json")));
        assert!(cli.quiet);
    }
}
