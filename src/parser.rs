use winnow::ModalResult;
use winnow::ascii::{digit1, space0};
use winnow::combinator::{alt, cut_err, delimited, eof};
use winnow::error::{ContextError, ParseError, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{take_till, take_while};

use crate::direction::Direction;
use crate::error::{Error, Result};

/// The line that closes the most recently opened node.
pub const CLOSING_MARKER: &str = "</n>";

/// One line of markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// An opening tag carrying the node's value.
    Open(&'a str),
    /// The closing marker.
    Close,
}

/// Parse a decimal count (the document length or a batch size).
pub fn parse_count(input: &str) -> Result<usize> {
    count.parse(input).map_err(into_error)
}

/// Parse a single markup line.
pub fn parse_line(input: &str) -> Result<Line<'_>> {
    line.parse(input).map_err(into_error)
}

/// Parse one instruction keyword. The whole token must match.
pub fn parse_direction(token: &str) -> Result<Direction> {
    direction
        .parse(token)
        .map_err(|_| Error::input(format!("unknown instruction '{}'", token)))
}

/// Convert a winnow failure into an `Error` pointing at the offending column.
fn into_error(e: ParseError<&str, ContextError>) -> Error {
    let message = if let Some(ctx) = e.inner().context().next() {
        match ctx {
            StrContext::Label(label) => format!("parse error: expected {}", label),
            StrContext::Expected(StrContextValue::Description(desc)) => {
                format!("parse error: expected {}", desc)
            }
            _ => "parse error: unexpected character".to_string(),
        }
    } else {
        "parse error: unexpected character".to_string()
    };
    Error::input(message).with_column(e.offset())
}

fn expected(description: &'static str) -> StrContext {
    StrContext::Expected(StrContextValue::Description(description))
}

/// Parser for a count, optionally padded with blanks.
fn count(input: &mut &str) -> ModalResult<usize> {
    delimited(space0, digit1.parse_to(), space0)
        .context(expected("<count>"))
        .parse_next(input)
}

/// Parser for a markup line: the closing marker or a quoted value.
fn line<'i>(input: &mut &'i str) -> ModalResult<Line<'i>> {
    alt((close_line, open_line)).parse_next(input)
}

/// Parser for the closing marker, trailing blanks allowed.
fn close_line<'i>(input: &mut &'i str) -> ModalResult<Line<'i>> {
    (CLOSING_MARKER, space0, eof)
        .value(Line::Close)
        .parse_next(input)
}

/// Parser for an opening line: the value is everything between the first
/// and the last single quote.
fn open_line<'i>(input: &mut &'i str) -> ModalResult<Line<'i>> {
    take_till(0.., '\'').parse_next(input)?;
    cut_err('\'')
        .context(expected("quoted value"))
        .parse_next(input)?;
    let value = cut_err(
        take_while(0.., |_: char| true)
            .verify_map(|tail: &'i str| tail.rfind('\'').map(|end| &tail[..end])),
    )
    .context(expected("closing quote"))
    .parse_next(input)?;
    Ok(Line::Open(value))
}

/// Parser for an instruction keyword.
fn direction(input: &mut &str) -> ModalResult<Direction> {
    alt((
        "first_child".value(Direction::FirstChild),
        "next_sibling".value(Direction::NextSibling),
        "previous_sibling".value(Direction::PreviousSibling),
        "parent".value(Direction::Parent),
    ))
    .context(expected("instruction"))
    .parse_next(input)
}
