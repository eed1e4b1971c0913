//! Builds a `Document` from the line-oriented markup block.
//!
//! The block starts with a line count followed by that many lines, each an
//! opening tag carrying a quoted value or the closing marker. A stack holds the
//! nodes that are currently open. Only closing a node changes the previous
//! sibling reference: every node opened afterwards is linked back to the node
//! closed last, and the reverse link is only filled in where that node has no
//! next sibling yet.

use tracing::{debug, instrument, trace};

use crate::direction::Direction;
use crate::error::{Error, Result};
use crate::node::{Document, NodeId};
use crate::parser::{self, Line};
use crate::source::Source;

/// Consume the markup block from `source` and link up its nodes.
///
/// On success the source is positioned just after the last markup line.
#[instrument(level = "debug", skip(source))]
pub fn build(source: &mut Source<'_>) -> Result<Document> {
    let (number, header) = source
        .next_line()
        .ok_or_else(|| Error::input("unexpected end of input: expected line count"))?;
    let line_count = parser::parse_count(header).map_err(|e| e.with_input_line(number))?;
    debug!(line_count, "reading markup");

    let mut document = Document::new();
    let mut open: Vec<NodeId> = Vec::new();
    let mut previous_sibling: Option<NodeId> = None;

    for read in 0..line_count {
        let (number, text) = source.next_line().ok_or_else(|| {
            Error::at_input(
                format!(
                    "unexpected end of input: expected {} markup lines, found {}",
                    line_count, read
                ),
                source.line(),
            )
        })?;

        match parser::parse_line(text).map_err(|e| e.with_input_line(number))? {
            Line::Open(value) => {
                let node = document.insert(value);
                document.set_link(node, Direction::Parent, open.last().copied());
                document.set_link(node, Direction::PreviousSibling, previous_sibling);
                trace!(value, depth = open.len(), "opened");
                open.push(node);
            }
            Line::Close => {
                let closed = open
                    .pop()
                    .ok_or_else(|| Error::at_input("closing marker without an open node", number))?;
                trace!(value = document.value(closed), "closed");
                previous_sibling = Some(closed);
            }
        }
    }

    if let Some(&innermost) = open.last() {
        return Err(Error::at_input(
            format!(
                "end of markup with {} unclosed node(s), innermost '{}'",
                open.len(),
                document.value(innermost)
            ),
            source.line(),
        ));
    }

    debug!(nodes = document.len(), "document built");
    Ok(document)
}
