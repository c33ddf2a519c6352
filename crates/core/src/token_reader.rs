//! A minimal positioned cursor over UTF-8 source text.
//!
//! This is not a lexer: it does not classify tokens or understand escapes or
//! numeric base prefixes. It only tracks byte offset and 1-based line/column
//! while walking a source buffer one Unicode scalar value at a time, which is
//! what the well-formedness pass needs to validate symbol codepoints and what
//! a lexer collaborator would build on top of.

use crate::position::Location;
use std::rc::Rc;

pub struct TokenReader<'a> {
    path: Option<Rc<str>>,
    chars: std::str::CharIndices<'a>,
    peeked: Option<(usize, char)>,
    line: u32,
    column: u32,
}

impl<'a> TokenReader<'a> {
    pub fn new(source: &'a str, path: Option<Rc<str>>) -> Self {
        TokenReader {
            path,
            chars: source.char_indices(),
            peeked: None,
            line: 1,
            column: 1,
        }
    }

    pub fn location(&self) -> Location {
        Location::new(self.path.clone(), self.line, self.column, self.current_offset())
    }

    fn current_offset(&self) -> u32 {
        self.peeked
            .map(|(offset, _)| offset as u32)
            .unwrap_or_else(|| self.chars.clone().next().map(|(o, _)| o as u32).unwrap_or(0))
    }

    pub fn peek(&mut self) -> Option<char> {
        if self.peeked.is_none() {
            self.peeked = self.chars.next();
        }
        self.peeked.map(|(_, c)| c)
    }

    pub fn advance(&mut self) -> Option<char> {
        let next = self.peeked.take().or_else(|| self.chars.next());
        if let Some((_, c)) = next {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        next.map(|(_, c)| c)
    }

    pub fn is_at_end(&mut self) -> bool {
        self.peek().is_none()
    }
}

/// Whether `c` may begin a symbol identifier: `_` or a Unicode XID_Start
/// code point. Used by the well-formedness pass and the bundled parser's
/// identifier scanning; excludes digits, matching the "first code point is
/// letter or `_`" rule.
pub fn is_identifier_start(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_start(c)
}

/// Whether `c` may continue a symbol identifier after its first code point:
/// `_`, a digit, or a Unicode XID_Continue code point.
pub fn is_identifier_continue(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_continue(c)
}

/// Whether `name` is a well-formed symbol identifier: non-empty, starting
/// with [`is_identifier_start`], with every subsequent code point satisfying
/// [`is_identifier_continue`].
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if is_identifier_start(c) => chars.all(is_identifier_continue),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_line_and_column_across_newlines() {
        let mut reader = TokenReader::new("ab\ncd", None);
        assert_eq!(reader.advance(), Some('a'));
        assert_eq!(reader.advance(), Some('b'));
        assert_eq!(reader.location().line, 1);
        assert_eq!(reader.advance(), Some('\n'));
        assert_eq!(reader.location().line, 2);
        assert_eq!(reader.location().column, 1);
        assert_eq!(reader.advance(), Some('c'));
        assert_eq!(reader.location().column, 2);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut reader = TokenReader::new("xy", None);
        assert_eq!(reader.peek(), Some('x'));
        assert_eq!(reader.peek(), Some('x'));
        assert_eq!(reader.advance(), Some('x'));
        assert_eq!(reader.advance(), Some('y'));
        assert!(reader.is_at_end());
    }

    #[test]
    fn identifier_validation_accepts_underscore_prefixed_names() {
        assert!(is_valid_identifier("_private1"));
        assert!(is_valid_identifier("x"));
        assert!(!is_valid_identifier("1abc"));
        assert!(!is_valid_identifier(""));
    }
}
