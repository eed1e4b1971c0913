//! Line and token reader over the raw input text.
//!
//! The markup block is read line by line, the instruction stream token by
//! token. Both share one `Source` so that the instructions start exactly where
//! the markup ended and every error can name its input line.

use winnow::ModalResult;
use winnow::ascii::multispace0;
use winnow::prelude::*;
use winnow::token::take_till;

/// A cursor over input text that keeps track of the current line number.
#[derive(Debug, Clone)]
pub struct Source<'a> {
    rest: &'a str,
    line: usize,
}

impl<'a> Source<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            rest: text,
            line: 1,
        }
    }

    /// Line number (1-based) of the next unread character.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Whether only whitespace remains.
    pub fn is_exhausted(&self) -> bool {
        self.rest.trim().is_empty()
    }

    /// Read the next line, without its line terminator, with its line number.
    pub fn next_line(&mut self) -> Option<(usize, &'a str)> {
        if self.rest.is_empty() {
            return None;
        }
        let number = self.line;
        let (line, rest) = match self.rest.split_once('\n') {
            Some((line, rest)) => {
                self.line += 1;
                (line, rest)
            }
            None => (self.rest, ""),
        };
        self.rest = rest;
        Some((number, line.strip_suffix('\r').unwrap_or(line)))
    }

    /// Read the next whitespace-delimited token, with its line number.
    pub fn next_token(&mut self) -> Option<(usize, &'a str)> {
        let mut rest = self.rest;
        let (skipped, token) = match spaced_token.parse_next(&mut rest) {
            Ok(parsed) => parsed,
            Err(_) => {
                self.line += self.rest.matches('\n').count();
                self.rest = "";
                return None;
            }
        };
        self.line += skipped.matches('\n').count();
        self.rest = rest;
        Some((self.line, token))
    }
}

/// Parser for leading whitespace followed by one non-blank token.
fn spaced_token<'i>(input: &mut &'i str) -> ModalResult<(&'i str, &'i str)> {
    (multispace0, take_till(1.., (' ', '\t', '\r', '\n'))).parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_numbered() {
        let mut source = Source::new("one\ntwo\r\nthree");
        assert_eq!(source.next_line(), Some((1, "one")));
        assert_eq!(source.next_line(), Some((2, "two")));
        assert_eq!(source.next_line(), Some((3, "three")));
        assert_eq!(source.next_line(), None);
    }

    #[test]
    fn trailing_newline_ends_input() {
        let mut source = Source::new("one\n");
        assert_eq!(source.next_line(), Some((1, "one")));
        assert_eq!(source.next_line(), None);
        assert_eq!(source.line(), 2);
    }

    #[test]
    fn empty_lines_are_returned() {
        let mut source = Source::new("\nx\n");
        assert_eq!(source.next_line(), Some((1, "")));
        assert_eq!(source.next_line(), Some((2, "x")));
    }

    #[test]
    fn tokens_span_lines() {
        let mut source = Source::new("2 parent\n\n  first_child\n0\n");
        assert_eq!(source.next_token(), Some((1, "2")));
        assert_eq!(source.next_token(), Some((1, "parent")));
        assert_eq!(source.next_token(), Some((3, "first_child")));
        assert_eq!(source.next_token(), Some((4, "0")));
        assert_eq!(source.next_token(), None);
        assert!(source.is_exhausted());
        assert_eq!(source.line(), 5);
    }

    #[test]
    fn tokens_follow_lines() {
        let mut source = Source::new("1\n</n>\n3 parent");
        source.next_line();
        source.next_line();
        assert_eq!(source.next_token(), Some((3, "3")));
        assert_eq!(source.next_token(), Some((3, "parent")));
    }
}
