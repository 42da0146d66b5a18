//! Line commands typed into the interactive dashboard

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::dashboard::Event;
use crate::models::TransactionType;
use crate::query::FilterState;

pub const HELP_TEXT: &str = "\
Commands:
  page <N>                 go to page N
  next | n                 next page
  prev | p                 previous page
  filter [key=value ...]   apply filters (type, start, end, min, max)
  reset                    restore the default date window
  search [text]            narrow the table; no text clears the search
  refresh                  reload transactions and summary now
  help                     show this help
  quit | q                 exit";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command '{0}', type 'help' for a list")]
    Unknown(String),

    #[error("Missing argument for '{0}'")]
    MissingArgument(&'static str),

    #[error("Invalid value '{value}' for '{key}'")]
    InvalidValue { key: String, value: String },

    #[error("Unknown filter '{0}'")]
    UnknownFilter(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Page(usize),
    Next,
    Previous,
    Filter(FilterState),
    Reset,
    Search(String),
    Refresh,
    Help,
    Quit,
}

impl Command {
    /// Dashboard events for this command; `Help` and `Quit` have none
    pub fn into_events(self, today: NaiveDate) -> Vec<Event> {
        match self {
            Command::Page(page) => vec![Event::ChangePage(page)],
            Command::Next => vec![Event::NextPage],
            Command::Previous => vec![Event::PreviousPage],
            Command::Filter(filters) => vec![Event::ApplyFilters(filters)],
            Command::Reset => vec![Event::ResetFilters { today }],
            Command::Search(query) => vec![Event::Search(query)],
            Command::Refresh => vec![Event::RefreshTick, Event::RequestSummary],
            Command::Help | Command::Quit => Vec::new(),
        }
    }
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some((&command, args)) = parts.split_first() else {
        return Ok(None);
    };

    let parsed = match command.to_lowercase().as_str() {
        "page" | "pg" => {
            let raw = args.first().ok_or(CommandError::MissingArgument("page"))?;
            let page = raw.parse().map_err(|_| invalid("page", raw))?;
            Command::Page(page)
        }
        "next" | "n" => Command::Next,
        "prev" | "previous" | "p" => Command::Previous,
        "filter" | "f" => Command::Filter(parse_filters(args)?),
        "reset" => Command::Reset,
        "search" | "s" => Command::Search(args.join(" ")),
        "refresh" | "r" => Command::Refresh,
        "help" | "h" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Some(parsed))
}

/// Builds a complete filter set from `key=value` pairs.
///
/// Keys not mentioned stay empty; an empty value also leaves the field empty.
pub fn parse_filters(args: &[&str]) -> Result<FilterState, CommandError> {
    let mut filters = FilterState::default();

    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| CommandError::UnknownFilter(arg.to_string()))?;
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        match key.to_lowercase().as_str() {
            "type" => filters.kind = Some(TransactionType::from(value.to_lowercase().as_str())),
            "start" | "start_date" | "from" => filters.start_date = Some(parse_date(key, value)?),
            "end" | "end_date" | "to" => filters.end_date = Some(parse_date(key, value)?),
            "min" | "min_amount" => filters.min_amount = Some(parse_amount(key, value)?),
            "max" | "max_amount" => filters.max_amount = Some(parse_amount(key, value)?),
            other => return Err(CommandError::UnknownFilter(other.to_string())),
        }
    }

    Ok(filters)
}

fn invalid(key: &str, value: &str) -> CommandError {
    CommandError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_date(key: &str, value: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid(key, value))
}

fn parse_amount(key: &str, value: &str) -> Result<Decimal, CommandError> {
    Decimal::from_str(value).map_err(|_| invalid(key, value))
}
