//! Argument parsing for the `tally_cli` binary.

use chrono::NaiveDate;

use crate::core::{GroupBy, ViewRequest};
use crate::domain::{parse_amount, EntryDraft, EntryKind, EntryTimestamp, Granularity};

use super::CliError;

pub const USAGE: &str = "Usage: tally_cli <command>\n\
Commands:\n  \
add <date> <expense|saving> <amount> [category] [--notes TEXT]\n  \
summary [daily|weekly|monthly|yearly|week|range START END] [--by type,category] [--every G] [--json]\n  \
metrics [--json]\n  \
running [daily|weekly|monthly|yearly]\n  \
version";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add(EntryDraft),
    Summary {
        /// `None` falls back to the configured default granularity.
        view: Option<ViewRequest>,
        group_by: Option<GroupBy>,
        json: bool,
    },
    Metrics {
        json: bool,
    },
    Running {
        granularity: Option<Granularity>,
    },
    Version,
    Help,
}

impl Command {
    /// Commands that run before the access gate and never touch the ledger.
    pub fn is_informational(&self) -> bool {
        matches!(self, Command::Version | Command::Help)
    }
}

#[derive(Debug, Default)]
struct SplitArgs {
    positionals: Vec<String>,
    flags: Vec<(String, Option<String>)>,
}

impl SplitArgs {
    fn value(&self, name: &str) -> Option<&str> {
        self.flags
            .iter()
            .rev()
            .find(|(flag, _)| flag == name)
            .and_then(|(_, value)| value.as_deref())
    }

    fn has(&self, name: &str) -> bool {
        self.flags.iter().any(|(flag, _)| flag == name)
    }
}

/// Separates `--flag value` / `--flag=value` pairs from positionals.
/// Only flags listed in `allowed` are accepted; those in `valued` consume a value.
fn split(args: &[String], allowed: &[&str], valued: &[&str]) -> Result<SplitArgs, CliError> {
    let mut out = SplitArgs::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let Some(flag) = arg.strip_prefix("--") else {
            out.positionals.push(arg.clone());
            continue;
        };
        let (name, inline) = match flag.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (flag, None),
        };
        if !allowed.contains(&name) {
            return Err(CliError::Usage(format!("unknown option `--{name}`")));
        }
        let value = if valued.contains(&name) {
            match inline {
                Some(value) => Some(value),
                None => Some(
                    iter.next()
                        .cloned()
                        .ok_or_else(|| CliError::Usage(format!("`--{name}` needs a value")))?,
                ),
            }
        } else {
            None
        };
        out.flags.push((name.to_string(), value));
    }
    Ok(out)
}

fn parse_date(raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| CliError::Usage(format!("expected a YYYY-MM-DD date, got `{raw}`")))
}

fn parse_granularity(raw: &str) -> Result<Granularity, CliError> {
    raw.parse::<Granularity>()
        .map_err(|err| CliError::Usage(err.to_string()))
}

/// Parses everything after the program name.
pub fn parse(args: &[String]) -> Result<Command, CliError> {
    let Some((command, rest)) = args.split_first() else {
        return Ok(Command::Help);
    };

    match command.as_str() {
        "add" => parse_add(rest),
        "summary" => parse_summary(rest),
        "metrics" => {
            let split = split(rest, &["json"], &[])?;
            expect_no_positionals(&split, "metrics")?;
            Ok(Command::Metrics {
                json: split.has("json"),
            })
        }
        "running" => {
            let split = split(rest, &[], &[])?;
            let granularity = match split.positionals.as_slice() {
                [] => None,
                [raw] => Some(parse_granularity(raw)?),
                _ => return Err(CliError::Usage("running takes at most one granularity".into())),
            };
            Ok(Command::Running { granularity })
        }
        "version" | "--version" | "-V" => Ok(Command::Version),
        "help" | "--help" | "-h" => Ok(Command::Help),
        other => Err(CliError::Usage(format!("unknown command `{other}`"))),
    }
}

fn expect_no_positionals(split: &SplitArgs, command: &str) -> Result<(), CliError> {
    match split.positionals.first() {
        Some(extra) => Err(CliError::Usage(format!(
            "unexpected argument `{extra}` for {command}"
        ))),
        None => Ok(()),
    }
}

fn parse_add(rest: &[String]) -> Result<Command, CliError> {
    let split = split(rest, &["notes"], &["notes"])?;
    let (date, kind, amount, category) = match split.positionals.as_slice() {
        [date, kind, amount] => (date, kind, amount, None),
        [date, kind, amount, category] => (date, kind, amount, Some(category)),
        _ => {
            return Err(CliError::Usage(
                "add expects <date> <expense|saving> <amount> [category]".into(),
            ))
        }
    };

    let timestamp = EntryTimestamp::parse(date)?;
    let kind: EntryKind = kind.parse()?;
    let amount = parse_amount(amount)?;

    let mut draft = EntryDraft::new(timestamp, kind, amount);
    if let Some(category) = category {
        draft = draft.with_category(category.as_str());
    }
    if let Some(notes) = split.value("notes") {
        draft = draft.with_notes(notes);
    }
    Ok(Command::Add(draft))
}

fn parse_summary(rest: &[String]) -> Result<Command, CliError> {
    let split = split(rest, &["by", "every", "json"], &["by", "every"])?;
    let every = split.value("every").map(parse_granularity).transpose()?;

    let view = match split.positionals.as_slice() {
        [] => every.map(ViewRequest::granular),
        [word] if word == "week" => Some(ViewRequest::CurrentWeek { granularity: every }),
        [word] => {
            if every.is_some() {
                return Err(CliError::Usage(
                    "`--every` only applies to `week` and `range` views".into(),
                ));
            }
            Some(ViewRequest::granular(parse_granularity(word)?))
        }
        [word, start, end] if word == "range" => Some(ViewRequest::range(
            parse_date(start)?,
            parse_date(end)?,
            every,
        )?),
        [word, ..] if word == "range" => {
            return Err(CliError::Usage("range expects START END".into()))
        }
        [_, extra, ..] => {
            return Err(CliError::Usage(format!(
                "unexpected argument `{extra}` for summary"
            )))
        }
    };

    let group_by = split
        .value("by")
        .map(|raw| raw.parse::<GroupBy>())
        .transpose()?;

    Ok(Command::Summary {
        view,
        group_by,
        json: split.has("json"),
    })
}
