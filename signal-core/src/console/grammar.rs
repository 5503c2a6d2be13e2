#![allow(clippy::module_name_repetitions)]

//! Line parser for the operator console.
//!
//! A line is a keyword followed by at most one argument. The keyword is
//! resolved through [`catalog`](super::catalog); the argument is checked
//! against what that command accepts. Rate values are passed through
//! untouched so they take the same path as a device write.

use core::fmt;

use winnow::ModalResult;
use winnow::ascii::{dec_uint, multispace0, multispace1};
use winnow::combinator::{opt, preceded};
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::{rest, take_till};

use super::catalog::{self, CommandTag};

/// Largest batch a single `tick` command may request.
pub const MAX_TICK_BATCH: u8 = 100;

/// Structured commands produced by the parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleCommand<'a> {
    Advance,
    Pedestrian,
    RateQuery,
    /// Raw rate payload, decoded later by the rate-write path.
    RateWrite(&'a str),
    Status,
    Tick(u8),
    Help(Option<&'a str>),
}

/// Grammar errors emitted by the parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleParseError<'a> {
    Empty,
    UnknownCommand(&'a str),
    UnexpectedArgument {
        command: &'static str,
        found: &'a str,
    },
    InvalidTickCount(&'a str),
}

impl fmt::Display for ConsoleParseError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleParseError::Empty => f.write_str("empty command"),
            ConsoleParseError::UnknownCommand(keyword) => {
                write!(f, "unknown command `{keyword}` (try `help`)")
            }
            ConsoleParseError::UnexpectedArgument { command, found } => {
                write!(f, "unexpected argument `{found}` for `{command}`")
            }
            ConsoleParseError::InvalidTickCount(value) => {
                write!(f, "tick count `{value}` must be 1-{MAX_TICK_BATCH}")
            }
        }
    }
}

/// Parse a console command from the provided line.
pub fn parse(line: &str) -> Result<ConsoleCommand<'_>, ConsoleParseError<'_>> {
    let trimmed = line.trim_ascii();
    let (keyword, argument, trailing) = words
        .parse(trimmed)
        .map_err(|_| ConsoleParseError::Empty)?;

    let spec = catalog::find(keyword).ok_or(ConsoleParseError::UnknownCommand(keyword))?;
    if !trailing.is_empty() {
        return Err(ConsoleParseError::UnexpectedArgument {
            command: spec.name,
            found: trailing,
        });
    }

    match (spec.tag, argument) {
        (CommandTag::Advance, None) => Ok(ConsoleCommand::Advance),
        (CommandTag::Pedestrian, None) => Ok(ConsoleCommand::Pedestrian),
        (CommandTag::Status, None) => Ok(ConsoleCommand::Status),
        (CommandTag::Rate, None) => Ok(ConsoleCommand::RateQuery),
        (CommandTag::Rate, Some(value)) => Ok(ConsoleCommand::RateWrite(value)),
        (CommandTag::Tick, None) => Ok(ConsoleCommand::Tick(1)),
        (CommandTag::Tick, Some(count)) => tick_count(count).map(ConsoleCommand::Tick),
        (CommandTag::Help, topic) => Ok(ConsoleCommand::Help(topic)),
        (CommandTag::Advance | CommandTag::Pedestrian | CommandTag::Status, Some(found)) => {
            Err(ConsoleParseError::UnexpectedArgument {
                command: spec.name,
                found,
            })
        }
    }
}

/// Splits a trimmed line into keyword, optional argument and leftover text.
fn words<'a>(input: &mut &'a str) -> ModalResult<(&'a str, Option<&'a str>, &'a str)> {
    (
        word,
        opt(preceded(multispace1, word)),
        preceded(multispace0, rest),
    )
        .parse_next(input)
}

fn word<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_till(1.., |c: char| c.is_ascii_whitespace()).parse_next(input)
}

fn tick_count(text: &str) -> Result<u8, ConsoleParseError<'_>> {
    dec_uint::<_, u32, ContextError>
        .parse(text)
        .ok()
        .and_then(|count| u8::try_from(count).ok())
        .filter(|count| (1..=MAX_TICK_BATCH).contains(count))
        .ok_or(ConsoleParseError::InvalidTickCount(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_keywords_and_aliases() {
        assert_eq!(parse("advance"), Ok(ConsoleCommand::Advance));
        assert_eq!(parse("MODE\r\n"), Ok(ConsoleCommand::Advance));
        assert_eq!(parse("  ped "), Ok(ConsoleCommand::Pedestrian));
        assert_eq!(parse("status"), Ok(ConsoleCommand::Status));
    }

    #[test]
    fn rate_argument_is_passed_through_raw() {
        assert_eq!(parse("rate"), Ok(ConsoleCommand::RateQuery));
        assert_eq!(parse("rate 4"), Ok(ConsoleCommand::RateWrite("4")));
        assert_eq!(parse("Rate\t-3"), Ok(ConsoleCommand::RateWrite("-3")));
        assert_eq!(parse("rate fast"), Ok(ConsoleCommand::RateWrite("fast")));
    }

    #[test]
    fn tick_count_defaults_and_is_bounded() {
        assert_eq!(parse("tick"), Ok(ConsoleCommand::Tick(1)));
        assert_eq!(parse("tick 100"), Ok(ConsoleCommand::Tick(100)));
        assert_eq!(parse("tick 0"), Err(ConsoleParseError::InvalidTickCount("0")));
        assert_eq!(
            parse("tick 101"),
            Err(ConsoleParseError::InvalidTickCount("101"))
        );
        assert_eq!(
            parse("tick many"),
            Err(ConsoleParseError::InvalidTickCount("many"))
        );
    }

    #[test]
    fn help_accepts_optional_topic() {
        assert_eq!(parse("help"), Ok(ConsoleCommand::Help(None)));
        assert_eq!(parse("help rate"), Ok(ConsoleCommand::Help(Some("rate"))));
    }

    #[test]
    fn rejects_unknown_and_surplus_input() {
        assert_eq!(parse(""), Err(ConsoleParseError::Empty));
        assert_eq!(parse("   \n"), Err(ConsoleParseError::Empty));
        assert_eq!(
            parse("reboot now"),
            Err(ConsoleParseError::UnknownCommand("reboot"))
        );
        assert_eq!(
            parse("status now"),
            Err(ConsoleParseError::UnexpectedArgument {
                command: "status",
                found: "now",
            })
        );
        assert_eq!(
            parse("rate 4 5"),
            Err(ConsoleParseError::UnexpectedArgument {
                command: "rate",
                found: "5",
            })
        );
    }
}
