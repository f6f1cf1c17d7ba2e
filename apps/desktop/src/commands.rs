use chrono::{DateTime, NaiveDateTime, Utc};
use presenter::DraftChange;
use shared::{
    domain::{FilterType, OfferId, PointType, SortType},
    error::ParseEnumError,
};
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";

pub const HELP: &str = "\
commands:
  show                       redraw the board
  edit <n>                   open the form of row n
  close                      roll the open form up
  esc                        cancel key
  fav <n>                    toggle favorite on row n
  set type <type>            change the point type
  set dest <city>            change the destination
  set price <amount>         change the base price
  set from|to <YYYY-MM-DDTHH:MM>
  set offer <offer-id>       toggle an offer
  save                       submit the open form
  delete                     delete the point (cancels a new one)
  new                        start a new point
  filter <everything|future|present|past>
  sort <day|event|time|price|offers>
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    Show,
    Edit(usize),
    Close,
    Escape,
    Favorite(usize),
    Set(DraftChange),
    Save,
    Delete,
    New,
    Filter(FilterType),
    Sort(SortType),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command {0:?}; type `help`")]
    Unknown(String),
    #[error("`{command}` needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("{0:?} is not a valid number")]
    InvalidNumber(String),
    #[error("{0:?} is not a date in YYYY-MM-DDTHH:MM form")]
    InvalidDate(String),
    #[error(transparent)]
    Enum(#[from] ParseEnumError),
}

pub fn parse_command(line: &str) -> Result<HostCommand, CommandError> {
    let line = line.trim();
    let (name, rest) = line
        .split_once(char::is_whitespace)
        .map(|(name, rest)| (name, rest.trim()))
        .unwrap_or((line, ""));

    match name.to_ascii_lowercase().as_str() {
        "" => Err(CommandError::Empty),
        "show" | "ls" => Ok(HostCommand::Show),
        "edit" => Ok(HostCommand::Edit(row_number("edit", rest)?)),
        "close" | "up" => Ok(HostCommand::Close),
        "esc" | "cancel" => Ok(HostCommand::Escape),
        "fav" | "favorite" => Ok(HostCommand::Favorite(row_number("fav", rest)?)),
        "set" => parse_change(rest).map(HostCommand::Set),
        "save" => Ok(HostCommand::Save),
        "delete" => Ok(HostCommand::Delete),
        "new" => Ok(HostCommand::New),
        "filter" => Ok(HostCommand::Filter(
            required("filter", "a filter name", rest)?.parse()?,
        )),
        "sort" => Ok(HostCommand::Sort(
            required("sort", "a sort name", rest)?.parse()?,
        )),
        "help" | "?" => Ok(HostCommand::Help),
        "quit" | "exit" => Ok(HostCommand::Quit),
        _ => Err(CommandError::Unknown(name.to_string())),
    }
}

fn parse_change(rest: &str) -> Result<DraftChange, CommandError> {
    let (field, value) = rest
        .split_once(char::is_whitespace)
        .map(|(field, value)| (field, value.trim()))
        .unwrap_or((rest, ""));

    match field.to_ascii_lowercase().as_str() {
        "type" => Ok(DraftChange::Type(
            required("set type", "a point type", value)?.parse::<PointType>()?,
        )),
        "dest" | "destination" => Ok(DraftChange::Destination(
            required("set dest", "a city name", value)?.to_string(),
        )),
        "price" => {
            let value = required("set price", "an amount", value)?;
            value
                .parse()
                .map(DraftChange::BasePrice)
                .map_err(|_| CommandError::InvalidNumber(value.to_string()))
        }
        "from" => Ok(DraftChange::DateFrom(parse_date(required(
            "set from", "a date", value,
        )?)?)),
        "to" => Ok(DraftChange::DateTo(parse_date(required(
            "set to", "a date", value,
        )?)?)),
        "offer" => Ok(DraftChange::ToggleOffer(OfferId::new(required(
            "set offer",
            "an offer id",
            value,
        )?))),
        "" => Err(CommandError::MissingArgument {
            command: "set",
            argument: "a field",
        }),
        other => Err(CommandError::Unknown(format!("set {other}"))),
    }
}

/// Rows are numbered from 1 on screen.
fn row_number(command: &'static str, value: &str) -> Result<usize, CommandError> {
    let value = required(command, "a row number", value)?;
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(CommandError::InvalidNumber(value.to_string())),
    }
}

fn required<'a>(
    command: &'static str,
    argument: &'static str,
    value: &'a str,
) -> Result<&'a str, CommandError> {
    if value.is_empty() {
        Err(CommandError::MissingArgument { command, argument })
    } else {
        Ok(value)
    }
}

pub fn parse_date(value: &str) -> Result<DateTime<Utc>, CommandError> {
    NaiveDateTime::parse_from_str(value, DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| CommandError::InvalidDate(value.to_string()))
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
