//! Navigate a tree of tagged nodes read from a miniature markup notation.
//!
//! The input holds a markup block (a line count, then opening tags carrying a
//! quoted value and `</n>` closing markers) followed by batches of navigation
//! instructions. [`process`] builds the tree and runs every batch, returning
//! the value under the cursor after each instruction.

pub mod builder;
pub mod direction;
pub mod error;
pub mod interpreter;
pub mod node;
pub mod parser;
pub mod source;

use crate::error::Result;
use crate::interpreter::Case;
use crate::node::Document;
use crate::source::Source;

/// Build the document from `input` and run the instructions that follow it.
pub fn process(input: &str) -> Result<(Document, Vec<Case>)> {
    let mut source = Source::new(input);
    let document = builder::build(&mut source)?;
    let cases = interpreter::run(&document, &mut source)?;
    Ok((document, cases))
}
