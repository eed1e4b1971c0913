//! Interpreter for navigation instructions.
//!
//! Instructions arrive in batches: a count followed by that many direction
//! keywords, repeated until a batch of size 0. A single cursor, starting at the
//! document root, moves once per instruction and its value is recorded after
//! every step. Each non-empty batch becomes one numbered `Case`.

use std::fmt;

use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::direction::Direction;
use crate::error::{Error, Result};
use crate::node::{Document, NodeId};
use crate::parser;
use crate::source::Source;

/// Execution context: the document and the cursor moving through it.
pub struct Context<'d> {
    document: &'d Document,
    cursor: NodeId,
}

impl<'d> Context<'d> {
    /// Create a context with the cursor on the document root.
    ///
    /// Returns `None` for an empty document, which has nowhere to put it.
    pub fn new(document: &'d Document) -> Option<Self> {
        let cursor = document.root()?;
        Some(Self { document, cursor })
    }

    pub fn cursor(&self) -> NodeId {
        self.cursor
    }

    /// Value of the node under the cursor.
    pub fn value(&self) -> &'d str {
        self.document.value(self.cursor)
    }

    /// Move the cursor one step and return the value it ends up on.
    ///
    /// Moving along a missing link leaves the cursor where it is.
    pub fn step(&mut self, direction: Direction) -> &'d str {
        match self.document.link(self.cursor, direction) {
            Some(next) => self.cursor = next,
            None => trace!(%direction, "no link, cursor stays"),
        }
        self.value()
    }
}

/// The output of one instruction batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Case {
    /// Batch number, counting from 1.
    pub number: usize,
    /// Cursor value after each instruction.
    pub values: Vec<String>,
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Case {}:", self.number)?;
        for value in &self.values {
            writeln!(f, "{}", value)?;
        }
        Ok(())
    }
}

/// Iterator over instruction batches read from a source.
///
/// Ends after the terminating `0` batch, or after the first error.
pub struct Batches<'s, 'a> {
    source: &'s mut Source<'a>,
    done: bool,
}

impl<'s, 'a> Batches<'s, 'a> {
    pub fn new(source: &'s mut Source<'a>) -> Self {
        Self {
            source,
            done: false,
        }
    }

    fn read_batch(&mut self) -> Result<Option<Vec<Direction>>> {
        let (line, token) = self.source.next_token().ok_or_else(|| {
            Error::at_input(
                "unexpected end of input: expected instruction count",
                self.source.line(),
            )
        })?;
        let count = parser::parse_count(token).map_err(|e| e.with_input_line(line))?;
        if count == 0 {
            return Ok(None);
        }

        let mut batch = Vec::with_capacity(count);
        for read in 0..count {
            let (line, token) = self.source.next_token().ok_or_else(|| {
                Error::at_input(
                    format!(
                        "unexpected end of input: expected {} instructions, found {}",
                        count, read
                    ),
                    self.source.line(),
                )
            })?;
            batch.push(parser::parse_direction(token).map_err(|e| e.with_input_line(line))?);
        }
        Ok(Some(batch))
    }
}

impl Iterator for Batches<'_, '_> {
    type Item = Result<Vec<Direction>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_batch() {
            Ok(Some(batch)) => Some(Ok(batch)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Run every instruction batch in `source` against `document`.
///
/// The cursor is shared by all batches: each one continues where the previous
/// one left off.
#[instrument(level = "debug", skip_all)]
pub fn run(document: &Document, source: &mut Source<'_>) -> Result<Vec<Case>> {
    let mut ctx = Context::new(document);
    let mut cases = Vec::new();

    for (index, batch) in Batches::new(source).enumerate() {
        let batch = batch?;
        let ctx = ctx
            .as_mut()
            .ok_or_else(|| Error::input("cannot navigate an empty document"))?;

        let number = index + 1;
        debug!(number, instructions = batch.len(), "running case");
        let values = batch
            .into_iter()
            .map(|direction| ctx.step(direction).to_string())
            .collect();
        cases.push(Case { number, values });
    }

    if !source.is_exhausted() {
        debug!(line = source.line(), "ignoring input after terminating batch");
    }

    Ok(cases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder;

    const SAMPLE: &str = "4\n<n value = 'parent'>\n<n value = 'child'>\n</n>\n</n>\n";

    fn run_str(text: &str) -> Result<Vec<Case>> {
        let mut source = Source::new(text);
        let document = builder::build(&mut source)?;
        run(&document, &mut source)
    }

    fn render(cases: &[Case]) -> String {
        cases.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn sample_case() {
        let cases = run_str(&format!("{}2\nnext_sibling\nfirst_child\n0\n", SAMPLE)).unwrap();
        assert_eq!(render(&cases), "Case 1:\nparent\nchild\n");
    }

    #[test]
    fn zero_batch_stops_immediately() {
        let cases = run_str(&format!("{}0\n2 parent parent\n", SAMPLE)).unwrap();
        assert!(cases.is_empty());
    }

    #[test]
    fn cursor_carries_across_cases() {
        let cases = run_str(&format!("{}1 first_child\n2 parent first_child\n0\n", SAMPLE)).unwrap();
        assert_eq!(
            cases,
            vec![
                Case {
                    number: 1,
                    values: vec!["child".to_string()],
                },
                Case {
                    number: 2,
                    values: vec!["parent".to_string(), "child".to_string()],
                },
            ]
        );
    }

    #[test]
    fn missing_links_are_no_ops() {
        let cases = run_str(&format!(
            "{}4 parent previous_sibling next_sibling parent\n0\n",
            SAMPLE
        ))
        .unwrap();
        assert_eq!(cases[0].values, vec!["parent"; 4]);
    }

    #[test]
    fn walk_sibling_chain() {
        let text = "8\n<n value = 'p'>\n<n value = 'a'>\n</n>\n<n value = 'b'>\n</n>\n<n value = 'c'>\n</n>\n</n>\n\
                    6 first_child next_sibling next_sibling next_sibling previous_sibling parent\n0\n";
        let cases = run_str(text).unwrap();
        assert_eq!(cases[0].values, vec!["a", "b", "c", "c", "b", "p"]);
    }

    #[test]
    fn previous_sibling_from_nested_first_child() {
        let text = "8\n<n value = 'p'>\n<n value = 'a'>\n</n>\n<n value = 'b'>\n<n value = 'b1'>\n</n>\n</n>\n</n>\n\
                    4 first_child next_sibling first_child previous_sibling\n0\n";
        let cases = run_str(text).unwrap();
        assert_eq!(render(&cases), "Case 1:\na\nb\nb1\na\n");
    }

    #[test]
    fn step_reports_value() {
        let mut source = Source::new(SAMPLE);
        let document = builder::build(&mut source).unwrap();
        let mut ctx = Context::new(&document).unwrap();
        let root = ctx.cursor();

        assert_eq!(ctx.step(Direction::NextSibling), "parent");
        assert_eq!(ctx.cursor(), root);
        assert_eq!(ctx.step(Direction::FirstChild), "child");
        assert_ne!(ctx.cursor(), root);
    }

    #[test]
    fn empty_document_without_instructions() {
        assert!(run_str("0\n0\n").unwrap().is_empty());
    }

    #[test]
    fn empty_document_with_instructions() {
        let err = run_str("0\n1 parent\n0\n").unwrap_err();
        assert_eq!(err.message, "cannot navigate an empty document");
    }

    #[test]
    fn unknown_instruction() {
        let err = run_str(&format!("{}2 first_child sideways\n0\n", SAMPLE)).unwrap_err();
        assert_eq!(err.to_string(), "unknown instruction 'sideways' (at input line 6)");
    }

    #[test]
    fn missing_terminator() {
        let err = run_str(&format!("{}1 first_child\n", SAMPLE)).unwrap_err();
        assert_eq!(err.message, "unexpected end of input: expected instruction count");
    }

    #[test]
    fn truncated_batch() {
        let err = run_str(&format!("{}3 first_child parent", SAMPLE)).unwrap_err();
        assert_eq!(
            err.message,
            "unexpected end of input: expected 3 instructions, found 2"
        );
    }

    #[test]
    fn batches_stop_after_error() {
        let mut source = Source::new("x 1 parent 0");
        let mut batches = Batches::new(&mut source);
        assert!(batches.next().unwrap().is_err());
        assert!(batches.next().is_none());
    }

    #[test]
    fn case_serializes_to_json() {
        let case = Case {
            number: 1,
            values: vec!["parent".to_string()],
        };
        assert_eq!(
            serde_json::to_string(&case).unwrap(),
            r#"{"number":1,"values":["parent"]}"#
        );
    }
}
