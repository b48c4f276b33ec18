//! The `tally_cli` command surface: parse, gate, load, run one command.

pub mod args;
pub mod output;
pub mod render;
pub mod table;

use std::env;
use std::io::{self, Write};

use dialoguer::Password;
use thiserror::Error;
use tracing::debug;

pub use args::{parse, Command, USAGE};

use crate::config::{Config, ConfigManager};
use crate::core::services::{EntryService, ServiceError, SummaryService, SummaryView};
use crate::core::{AuthError, AuthSession, Clock, GroupBy, SummaryError, SystemClock, ViewRequest};
use crate::domain::{Amounted, Ledger, RangeError, ValidationError};
use crate::errors::LedgerError;
use crate::storage::{open_store, LedgerStore, RejectedRow};
use crate::utils::build_info;

use output::{styled, MessageKind};

/// Environment variable consulted before prompting for the access password.
pub const PASSWORD_ENV: &str = "TALLY_PASSWORD";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Summary(#[from] SummaryError),
    #[error(transparent)]
    Range(#[from] RangeError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("password prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => 2,
            _ => 1,
        }
    }
}

/// A loaded ledger plus everything a command needs to act on it.
pub struct App {
    pub config: Config,
    store: Box<dyn LedgerStore>,
    ledger: Ledger,
    clock: Box<dyn Clock>,
    session: AuthSession,
    view: SummaryView,
}

impl App {
    /// Loads the ledger through `store`. Rows the store could not read are
    /// returned so the caller can report them.
    pub fn open(
        config: Config,
        store: Box<dyn LedgerStore>,
        clock: Box<dyn Clock>,
        session: AuthSession,
    ) -> Result<(Self, Vec<RejectedRow>), CliError> {
        session.require()?;
        let report = store.load()?;
        debug!(
            "loaded {} entries from {}",
            report.ledger.len(),
            report.path.display()
        );
        let app = Self {
            config,
            store,
            ledger: report.ledger,
            clock,
            session,
            view: SummaryView::new(),
        };
        Ok((app, report.rejected))
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Type and category when every entry has a category, otherwise type only.
    fn default_group_by(&self) -> GroupBy {
        if self.ledger.has_type_only_entries() {
            GroupBy::by_type()
        } else {
            GroupBy::by_type_and_category()
        }
    }

    pub fn execute(&mut self, command: Command, out: &mut dyn Write) -> Result<(), CliError> {
        self.session.require()?;
        let symbol = self.config.currency_symbol.clone();

        match command {
            Command::Add(draft) => {
                let position =
                    EntryService::record_and_persist(self.store.as_ref(), &mut self.ledger, draft)?;
                if let Some(entry) = self.ledger.get(position) {
                    let category = entry
                        .category()
                        .map(|c| format!(" ({c})"))
                        .unwrap_or_default();
                    writeln!(
                        out,
                        "{}",
                        styled(
                            MessageKind::Success,
                            format!(
                                "recorded {} of {} on {}{}",
                                entry.kind().as_str(),
                                render::money(&symbol, entry.amount()),
                                entry.date(),
                                category
                            )
                        )
                    )?;
                }
            }
            Command::Summary {
                view,
                group_by,
                json,
            } => {
                let view =
                    view.unwrap_or_else(|| ViewRequest::granular(self.config.default_granularity));
                let group_by = group_by.unwrap_or_else(|| self.default_group_by());
                let report =
                    self.view
                        .refresh(&self.ledger, view, &group_by, self.clock.as_ref())?;
                if json {
                    writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
                } else {
                    writeln!(out, "{}", render::render_report(report, &symbol))?;
                }
            }
            Command::Metrics { json } => {
                let metrics = SummaryService::fixed_metrics(&self.ledger, self.clock.as_ref())?;
                if json {
                    writeln!(out, "{}", serde_json::to_string_pretty(&metrics)?)?;
                } else {
                    writeln!(out, "{}", render::render_metrics(&metrics, &symbol))?;
                }
            }
            Command::Running { granularity } => {
                let granularity = granularity.unwrap_or(self.config.default_granularity);
                let totals = SummaryService::running_totals(&self.ledger, granularity)?;
                let title = format!("Running totals ({granularity})");
                writeln!(out, "{}", styled(MessageKind::Section, title))?;
                writeln!(out, "{}", render::render_running(&totals, &symbol))?;
            }
            informational @ (Command::Version | Command::Help) => {
                write_informational(&informational, out)?
            }
        }
        Ok(())
    }
}

fn write_informational(command: &Command, out: &mut dyn Write) -> io::Result<()> {
    match command {
        Command::Version => writeln!(out, "{}", build_info::current().summary()),
        _ => writeln!(out, "{USAGE}"),
    }
}

/// Passes the access gate: open when no password is configured, otherwise
/// `TALLY_PASSWORD` or an interactive prompt must match.
pub fn authenticate(config: &Config) -> Result<AuthSession, CliError> {
    let Some(expected) = config.access_password.as_deref() else {
        return Ok(AuthSession::open());
    };
    let attempt = match env::var(PASSWORD_ENV) {
        Ok(value) => value,
        Err(_) => Password::new().with_prompt("Password").interact()?,
    };
    Ok(AuthSession::login(Some(expected), &attempt)?)
}

/// Entry point used by the binary. `args` excludes the program name.
pub fn run_cli(args: &[String]) -> Result<(), CliError> {
    let command = parse(args)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if command.is_informational() {
        write_informational(&command, &mut out)?;
        return Ok(());
    }

    let manager = ConfigManager::new()?;
    let config = manager.load()?;
    let session = authenticate(&config)?;
    let store = open_store(config.storage_format, manager.ledger_path(&config));

    let (mut app, rejected) = App::open(config, store, Box::new(SystemClock), session)?;
    if !rejected.is_empty() {
        output::warning(format!(
            "skipped {} unreadable row(s) in the stored ledger",
            rejected.len()
        ));
        for row in &rejected {
            output::warning(format!("  row {}: {}", row.line, row.reason));
        }
    }

    app.execute(command, &mut out)
}
