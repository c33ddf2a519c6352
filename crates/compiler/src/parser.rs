//! A minimal recursive-descent parser (§4.6, §6 "Parser → core").
//!
//! This is not a conformant implementation of the source language's full
//! grammar; it covers the subset needed to drive the front end from tests
//! and the `forgec compile` command: function declarations with typed
//! parameters, primitive types, and the statement/expression forms already
//! modeled by [`crate::ast::Node`] (`return`, `if`/`else`, `while`, and a
//! typed local declaration with an initializer). Anything outside that
//! subset is reported as a [`ParseError`], never a panic.
//!
//! Tokenization and parsing are both hand-rolled over
//! [`forge_core::TokenReader`], in the teacher crate's style of a small
//! upfront tokenizer feeding a `pos`-indexed token list, rather than a
//! pulled-in lexer/parser-combinator crate.

use crate::ast::{FunctionArgumentFlags, FunctionFlags, Node, PointerFlags, PropertyFlags};
use forge_core::{Location, Range, TokenReader};
use std::fmt;
use std::rc::Rc;

/// A recoverable parse failure, in the style of the teacher's
/// `codegen::error::CodeGenError`: a small enum with a manual `Display` and
/// no dependency on an error-derive crate.
#[derive(Debug, Clone)]
pub enum ParseError {
    UnexpectedCharacter { found: char, range: Range },
    UnterminatedToken { what: &'static str, range: Range },
    InvalidIntegerLiteral { text: String, range: Range },
    UnexpectedToken { expected: &'static str, found: String, range: Range },
    UnexpectedEof { expected: &'static str },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedCharacter { found, range } => {
                write!(f, "{range}: unexpected character '{found}'")
            }
            ParseError::UnterminatedToken { what, range } => {
                write!(f, "{range}: unterminated {what}")
            }
            ParseError::InvalidIntegerLiteral { text, range } => {
                write!(f, "{range}: invalid integer literal '{text}'")
            }
            ParseError::UnexpectedToken { expected, found, range } => {
                write!(f, "{range}: expected {expected}, found '{found}'")
            }
            ParseError::UnexpectedEof { expected } => {
                write!(f, "unexpected end of input, expected {expected}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    /// The range to attach to a diagnostic, when one is available; `main`
    /// maps this (or its absence) to an emitted `Message`.
    pub fn range(&self) -> Option<&Range> {
        match self {
            ParseError::UnexpectedCharacter { range, .. }
            | ParseError::UnterminatedToken { range, .. }
            | ParseError::InvalidIntegerLiteral { range, .. }
            | ParseError::UnexpectedToken { range, .. } => Some(range),
            ParseError::UnexpectedEof { .. } => None,
        }
    }
}

/// Encodes an unsigned integer in the given base (2, 8, 10, or 16), using
/// the same `0b`/`0o`/`0x` prefixes [`parse_uint`] recognizes. Pairs with
/// `parse_uint` to satisfy the round-trip law of §8.
pub fn format_uint(value: u64, base: u32) -> String {
    match base {
        2 => format!("0b{value:b}"),
        8 => format!("0o{value:o}"),
        10 => format!("{value}"),
        16 => format!("0x{value:x}"),
        other => panic!("unsupported base {other}"),
    }
}

/// Decodes an unsigned integer written in decimal or with a `0b`/`0o`/`0x`
/// prefix. Inverse of [`format_uint`].
pub fn parse_uint(text: &str) -> Result<u64, std::num::ParseIntError> {
    if let Some(rest) = text.strip_prefix("0b") {
        u64::from_str_radix(rest, 2)
    } else if let Some(rest) = text.strip_prefix("0o") {
        u64::from_str_radix(rest, 8)
    } else if let Some(rest) = text.strip_prefix("0x") {
        u64::from_str_radix(rest, 16)
    } else {
        text.parse::<u64>()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Ident(String),
    Int { unsigned: bool, bit_width: u8, value: i128 },
    Float { bit_width: u8, value: f64 },
    True,
    False,
    Fn,
    Return,
    If,
    Else,
    While,
    Void,
    Arrow,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Semicolon,
    Dot,
    Eq,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    Minus,
    Star,
    Slash,
    SlashSlash,
    Percent,
    StarStar,
    Amp,
    AmpAmp,
    Pipe,
    PipePipe,
    Caret,
    Shl,
    Shr,
    Tilde,
    Bang,
    Eof,
}

struct Lexer<'a> {
    reader: TokenReader<'a>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str, path: Option<Rc<str>>) -> Self {
        Lexer { reader: TokenReader::new(source, path) }
    }

    fn tokenize(mut self) -> Result<Vec<(Tok, Range)>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            let start = self.reader.location();
            let Some(c) = self.reader.peek() else {
                tokens.push((Tok::Eof, Range::new(start, 1)));
                break;
            };
            let tok = if forge_core::is_identifier_start(c) {
                self.lex_identifier()
            } else if c.is_ascii_digit() {
                self.lex_number(&start)?
            } else {
                self.lex_punctuation(&start)?
            };
            let end = self.reader.location();
            let length = end.offset.saturating_sub(start.offset).max(1);
            tokens.push((tok, Range::new(start, length)));
        }
        Ok(tokens)
    }

    /// Skips whitespace and `#`-prefixed line comments. Comments use `#`
    /// rather than `//` because `//` is already the integer-divide operator
    /// (§9 operator table); `TokenReader` exposes only a one-character
    /// lookahead, so picking a comment marker that does not share a prefix
    /// with any operator avoids needing a second lookahead character.
    fn skip_trivia(&mut self) {
        loop {
            match self.reader.peek() {
                Some(c) if c.is_whitespace() => {
                    self.reader.advance();
                }
                Some('#') => {
                    while let Some(c) = self.reader.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.reader.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn lex_identifier(&mut self) -> Tok {
        let mut name = String::new();
        while let Some(c) = self.reader.peek() {
            if forge_core::is_identifier_continue(c) {
                name.push(c);
                self.reader.advance();
            } else {
                break;
            }
        }
        match name.as_str() {
            "true" => Tok::True,
            "false" => Tok::False,
            "fn" => Tok::Fn,
            "return" => Tok::Return,
            "if" => Tok::If,
            "else" => Tok::Else,
            "while" => Tok::While,
            "void" => Tok::Void,
            _ => Tok::Ident(name),
        }
    }

    fn lex_number(&mut self, start: &Location) -> Result<Tok, ParseError> {
        let mut text = String::new();
        if self.reader.peek() == Some('0') {
            text.push(self.reader.advance().unwrap());
            if matches!(self.reader.peek(), Some('b') | Some('o') | Some('x')) {
                text.push(self.reader.advance().unwrap());
            }
        }
        while let Some(c) = self.reader.peek() {
            if c.is_ascii_alphanumeric() {
                text.push(c);
                self.reader.advance();
            } else {
                break;
            }
        }
        let mut is_float = false;
        let mut frac = String::new();
        if self.reader.peek() == Some('.') {
            is_float = true;
            frac.push(self.reader.advance().unwrap());
            while let Some(c) = self.reader.peek() {
                if c.is_ascii_digit() {
                    frac.push(c);
                    self.reader.advance();
                } else {
                    break;
                }
            }
        }

        if is_float {
            let mut width = 64u8;
            if self.reader.peek() == Some('f') {
                self.reader.advance();
                let mut digits = String::new();
                while let Some(c) = self.reader.peek() {
                    if c.is_ascii_digit() {
                        digits.push(c);
                        self.reader.advance();
                    } else {
                        break;
                    }
                }
                width = digits.parse().unwrap_or(64);
            }
            let full = format!("{text}{frac}");
            let value: f64 = full.parse().map_err(|_| ParseError::InvalidIntegerLiteral {
                text: full.clone(),
                range: Range::new(start.clone(), 1),
            })?;
            return Ok(Tok::Float { bit_width: width, value });
        }

        let (digits, explicit_radix) = if let Some(rest) = text.strip_prefix("0b") {
            (rest.to_string(), Some(2))
        } else if let Some(rest) = text.strip_prefix("0o") {
            (rest.to_string(), Some(8))
        } else if let Some(rest) = text.strip_prefix("0x") {
            (rest.to_string(), Some(16))
        } else {
            (text.clone(), None)
        };

        let (numeral, suffix) = split_integer_suffix(&digits, explicit_radix == Some(16));
        let radix = explicit_radix.unwrap_or(10);
        let value = i128::from_str_radix(numeral, radix).map_err(|_| ParseError::InvalidIntegerLiteral {
            text: text.clone(),
            range: Range::new(start.clone(), 1),
        })?;
        let (unsigned, bit_width) = match suffix {
            Some(s) => parse_int_suffix(s).ok_or_else(|| ParseError::InvalidIntegerLiteral {
                text: text.clone(),
                range: Range::new(start.clone(), 1),
            })?,
            None => (false, 32),
        };
        Ok(Tok::Int { unsigned, bit_width, value })
    }

    fn lex_punctuation(&mut self, start: &Location) -> Result<Tok, ParseError> {
        let c = self.reader.advance().unwrap();
        let tok = match c {
            '(' => Tok::LParen,
            ')' => Tok::RParen,
            '{' => Tok::LBrace,
            '}' => Tok::RBrace,
            ',' => Tok::Comma,
            ':' => Tok::Colon,
            ';' => Tok::Semicolon,
            '.' => Tok::Dot,
            '~' => Tok::Tilde,
            '%' => Tok::Percent,
            '^' => Tok::Caret,
            '-' => {
                if self.reader.peek() == Some('>') {
                    self.reader.advance();
                    Tok::Arrow
                } else {
                    Tok::Minus
                }
            }
            '=' => {
                if self.reader.peek() == Some('=') {
                    self.reader.advance();
                    Tok::EqEq
                } else {
                    Tok::Eq
                }
            }
            '!' => {
                if self.reader.peek() == Some('=') {
                    self.reader.advance();
                    Tok::NotEq
                } else {
                    Tok::Bang
                }
            }
            '<' => {
                if self.reader.peek() == Some('=') {
                    self.reader.advance();
                    Tok::LtEq
                } else if self.reader.peek() == Some('<') {
                    self.reader.advance();
                    Tok::Shl
                } else {
                    Tok::Lt
                }
            }
            '>' => {
                if self.reader.peek() == Some('=') {
                    self.reader.advance();
                    Tok::GtEq
                } else if self.reader.peek() == Some('>') {
                    self.reader.advance();
                    Tok::Shr
                } else {
                    Tok::Gt
                }
            }
            '+' => Tok::Plus,
            '*' => {
                if self.reader.peek() == Some('*') {
                    self.reader.advance();
                    Tok::StarStar
                } else {
                    Tok::Star
                }
            }
            '/' => {
                if self.reader.peek() == Some('/') {
                    self.reader.advance();
                    Tok::SlashSlash
                } else {
                    Tok::Slash
                }
            }
            '&' => {
                if self.reader.peek() == Some('&') {
                    self.reader.advance();
                    Tok::AmpAmp
                } else {
                    Tok::Amp
                }
            }
            '|' => {
                if self.reader.peek() == Some('|') {
                    self.reader.advance();
                    Tok::PipePipe
                } else {
                    Tok::Pipe
                }
            }
            other => {
                return Err(ParseError::UnexpectedCharacter { found: other, range: Range::new(start.clone(), 1) });
            }
        };
        Ok(tok)
    }
}

/// Splits a literal's digit run into `(numeral, Some(suffix))` at the first
/// letter that cannot belong to the numeral itself (hex digits `a`-`f` are
/// only ambiguous when the literal is already known to be hex, hence
/// `is_hex`).
fn split_integer_suffix(digits: &str, is_hex: bool) -> (&str, Option<&str>) {
    for (i, c) in digits.char_indices() {
        let belongs_to_numeral = c.is_ascii_digit() || (is_hex && c.is_ascii_hexdigit());
        if !belongs_to_numeral {
            return (&digits[..i], Some(&digits[i..]));
        }
    }
    (digits, None)
}

fn parse_int_suffix(suffix: &str) -> Option<(bool, u8)> {
    match suffix {
        "i8" => Some((false, 8)),
        "i16" => Some((false, 16)),
        "i32" => Some((false, 32)),
        "i64" => Some((false, 64)),
        "u8" => Some((true, 8)),
        "u16" => Some((true, 16)),
        "u32" => Some((true, 32)),
        "u64" => Some((true, 64)),
        _ => None,
    }
}

/// Parses `source` into a `declaration-block` root of top-level function
/// declarations.
pub fn parse(source: &str, path: Option<Rc<str>>) -> Result<Node, ParseError> {
    let tokens = Lexer::new(source, path).tokenize()?;
    let mut parser = Parser { tokens, pos: 0 };
    parser.parse_block()
}

struct Parser {
    tokens: Vec<(Tok, Range)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Tok {
        &self.tokens[self.pos].0
    }

    fn peek_range(&self) -> &Range {
        &self.tokens[self.pos].1
    }

    fn advance(&mut self) -> (Tok, Range) {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, expected: &'static str, matches: impl Fn(&Tok) -> bool) -> Result<(Tok, Range), ParseError> {
        if matches(self.peek()) {
            Ok(self.advance())
        } else if *self.peek() == Tok::Eof {
            Err(ParseError::UnexpectedEof { expected })
        } else {
            Err(ParseError::UnexpectedToken {
                expected,
                found: format!("{:?}", self.peek()),
                range: self.peek_range().clone(),
            })
        }
    }

    fn parse_block(&mut self) -> Result<Node, ParseError> {
        let start = self.peek_range().clone();
        let mut decls = Vec::new();
        while *self.peek() != Tok::Eof {
            decls.push(self.parse_function()?);
        }
        Ok(Node::DeclarationBlock { range: start, decls })
    }

    fn parse_function(&mut self) -> Result<Node, ParseError> {
        let start = self.peek_range().clone();
        self.expect("'fn'", |t| *t == Tok::Fn)?;
        let (name_tok, _) = self.expect("a function name", |t| matches!(t, Tok::Ident(_)))?;
        let Tok::Ident(name) = name_tok else { unreachable!() };

        self.expect("'('", |t| *t == Tok::LParen)?;
        let mut args = Vec::new();
        while *self.peek() != Tok::RParen {
            args.push(self.parse_function_argument()?);
            if *self.peek() == Tok::Comma {
                self.advance();
            } else {
                break;
            }
        }
        self.expect("')'", |t| *t == Tok::RParen)?;

        let return_type = if *self.peek() == Tok::Arrow {
            self.advance();
            Some(Box::new(self.parse_type()?))
        } else {
            None
        };

        let fn_type_range = start.clone();
        let fn_type = Node::TypeFunction {
            range: fn_type_range,
            args,
            variadic_positional: None,
            variadic_keyword: None,
            return_type,
        };

        let body = self.parse_statement_block()?;

        Ok(Node::DeclarationFunction {
            range: start,
            flags: FunctionFlags::default(),
            name,
            fn_type: Box::new(fn_type),
            body: Some(body),
        })
    }

    fn parse_function_argument(&mut self) -> Result<Node, ParseError> {
        let start = self.peek_range().clone();
        let (name_tok, _) = self.expect("a parameter name", |t| matches!(t, Tok::Ident(_)))?;
        let Tok::Ident(name) = name_tok else { unreachable!() };
        self.expect("':'", |t| *t == Tok::Colon)?;
        let ty = self.parse_type()?;
        let property = Node::DeclarationProperty {
            range: start.clone(),
            flags: PropertyFlags(PropertyFlags::NON_OPTIONAL),
            name,
            property_type: Some(Box::new(ty)),
        };
        Ok(Node::DeclarationFunctionArgument {
            range: start,
            flags: FunctionArgumentFlags::default(),
            property: Box::new(property),
            default: None,
        })
    }

    fn parse_type(&mut self) -> Result<Node, ParseError> {
        let (tok, range) = self.advance();
        match tok {
            Tok::Void => Ok(Node::TypeVoid { range }),
            Tok::Ident(name) => match name.as_str() {
                "bool" => Ok(Node::TypeBool { range }),
                _ => {
                    if let Some((unsigned, bit_width)) = parse_int_suffix(&name) {
                        Ok(Node::new_type_int(range, unsigned, bit_width))
                    } else if let Some(rest) = name.strip_prefix('f') {
                        if let Ok(bit_width) = rest.parse::<u8>() {
                            Ok(Node::new_type_float(range, bit_width))
                        } else {
                            Ok(Node::TypeSymbol { range, name: Some(name) })
                        }
                    } else {
                        Ok(Node::TypeSymbol { range, name: Some(name) })
                    }
                }
            },
            Tok::Star => {
                let pointee = self.parse_type()?;
                Ok(Node::TypePointer { range, flags: PointerFlags(PointerFlags::NONE), pointee: Some(Box::new(pointee)) })
            }
            other => Err(ParseError::UnexpectedToken { expected: "a type", found: format!("{other:?}"), range }),
        }
    }

    fn parse_statement_block(&mut self) -> Result<Vec<Node>, ParseError> {
        self.expect("'{'", |t| *t == Tok::LBrace)?;
        let mut stmts = Vec::new();
        while *self.peek() != Tok::RBrace {
            stmts.push(self.parse_statement()?);
        }
        self.expect("'}'", |t| *t == Tok::RBrace)?;
        Ok(stmts)
    }

    fn parse_statement(&mut self) -> Result<Node, ParseError> {
        match self.peek() {
            Tok::Return => self.parse_return(),
            Tok::If => self.parse_if(),
            Tok::While => self.parse_while(),
            _ => self.parse_local_declaration(),
        }
    }

    fn parse_return(&mut self) -> Result<Node, ParseError> {
        let start = self.peek_range().clone();
        self.advance();
        let value = if *self.peek() == Tok::Semicolon { None } else { Some(Box::new(self.parse_expr()?)) };
        self.expect("';'", |t| *t == Tok::Semicolon)?;
        Ok(Node::StatementReturn { range: start, value })
    }

    fn parse_if(&mut self) -> Result<Node, ParseError> {
        let start = self.peek_range().clone();
        let mut clauses = vec![self.parse_if_clause()?];
        let mut else_body = None;
        while *self.peek() == Tok::Else {
            self.advance();
            if *self.peek() == Tok::If {
                clauses.push(self.parse_if_clause()?);
            } else {
                else_body = Some(self.parse_statement_block()?);
                break;
            }
        }
        Ok(Node::StatementIf { range: start, clauses, else_body })
    }

    fn parse_if_clause(&mut self) -> Result<Node, ParseError> {
        let start = self.peek_range().clone();
        self.expect("'if'", |t| *t == Tok::If)?;
        self.expect("'('", |t| *t == Tok::LParen)?;
        let condition = self.parse_expr()?;
        self.expect("')'", |t| *t == Tok::RParen)?;
        let body = self.parse_statement_block()?;
        Ok(Node::StatementIfConditionalClause { range: start, condition: Box::new(condition), body })
    }

    fn parse_while(&mut self) -> Result<Node, ParseError> {
        let start = self.peek_range().clone();
        self.advance();
        self.expect("'('", |t| *t == Tok::LParen)?;
        let condition = self.parse_expr()?;
        self.expect("')'", |t| *t == Tok::RParen)?;
        let body = self.parse_statement_block()?;
        Ok(Node::StatementWhile { range: start, condition: Box::new(condition), body })
    }

    /// `<type> <name> = <expr> ;` — the only statement-level declaration
    /// form this grammar supports; reassigning an existing binding is an
    /// expression (`value-assign`), not a statement, and has no surface
    /// syntax in this minimal grammar.
    fn parse_local_declaration(&mut self) -> Result<Node, ParseError> {
        let start = self.peek_range().clone();
        let ty = self.parse_type()?;
        let (name_tok, name_range) = self.expect("a variable name", |t| matches!(t, Tok::Ident(_)))?;
        let Tok::Ident(name) = name_tok else { unreachable!() };
        self.expect("'='", |t| *t == Tok::Eq)?;
        let value = self.parse_expr()?;
        self.expect("';'", |t| *t == Tok::Semicolon)?;
        let property = Node::DeclarationProperty {
            range: name_range,
            flags: PropertyFlags(PropertyFlags::NON_OPTIONAL),
            name,
            property_type: Some(Box::new(ty)),
        };
        Ok(Node::DeclarationAssignment { range: start, property: Box::new(property), value: Box::new(value) })
    }

    fn parse_expr(&mut self) -> Result<Node, ParseError> {
        self.parse_binary(0)
    }

    fn parse_binary(&mut self, min_precedence: u8) -> Result<Node, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let Some((kind, precedence)) = binary_operator(self.peek()) else { break };
            if precedence < min_precedence {
                break;
            }
            let (_, range) = self.advance();
            let right = self.parse_binary(precedence + 1)?;
            left = Node::new_value_binary(range, kind, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Node, ParseError> {
        let kind = match self.peek() {
            Tok::Minus => Some(crate::kind::NodeKind::ValueNegate),
            Tok::Bang => Some(crate::kind::NodeKind::ValueLogicalNot),
            Tok::Tilde => Some(crate::kind::NodeKind::ValueBitNot),
            Tok::Amp => Some(crate::kind::NodeKind::ValueGetAddress),
            Tok::Star => Some(crate::kind::NodeKind::ValueDereference),
            _ => None,
        };
        if let Some(kind) = kind {
            let (_, range) = self.advance();
            let operand = self.parse_unary()?;
            return Ok(Node::new_value_unary(range, kind, operand));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Node, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek() {
                Tok::LParen => {
                    let (_, range) = self.advance();
                    let mut args = Vec::new();
                    while *self.peek() != Tok::RParen {
                        args.push(self.parse_expr()?);
                        if *self.peek() == Tok::Comma {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                    self.expect("')'", |t| *t == Tok::RParen)?;
                    expr = Node::ValueCall { range, callee: Box::new(expr), args, kw_args: Vec::new() };
                }
                Tok::Dot => {
                    let (_, range) = self.advance();
                    let (name_tok, name_range) = self.expect("a field name", |t| matches!(t, Tok::Ident(_)))?;
                    let Tok::Ident(name) = name_tok else { unreachable!() };
                    let field = Node::ValueSymbol { range: name_range, name };
                    expr = Node::new_value_binary(range, crate::kind::NodeKind::ValueAccess, expr, field);
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let (tok, range) = self.advance();
        match tok {
            Tok::True => Ok(Node::ValueBool { range, value: true }),
            Tok::False => Ok(Node::ValueBool { range, value: false }),
            Tok::Int { unsigned, bit_width, value } => {
                Ok(Node::ValueInt { range: range.clone(), value_type: Box::new(Node::new_type_int(range, unsigned, bit_width)), value })
            }
            Tok::Float { bit_width, value } => Ok(Node::ValueFloat { range, bit_width, value }),
            Tok::Ident(name) => Ok(Node::ValueSymbol { range, name }),
            Tok::LParen => {
                let expr = self.parse_expr()?;
                self.expect("')'", |t| *t == Tok::RParen)?;
                Ok(expr)
            }
            other => Err(ParseError::UnexpectedToken { expected: "an expression", found: format!("{other:?}"), range }),
        }
    }
}

fn binary_operator(tok: &Tok) -> Option<(crate::kind::NodeKind, u8)> {
    use crate::kind::NodeKind;
    Some(match tok {
        Tok::PipePipe => (NodeKind::ValueLogicalOr, 1),
        Tok::AmpAmp => (NodeKind::ValueLogicalAnd, 2),
        Tok::Pipe => (NodeKind::ValueBitOr, 3),
        Tok::Caret => (NodeKind::ValueBitXor, 4),
        Tok::Amp => (NodeKind::ValueBitAnd, 5),
        Tok::EqEq => (NodeKind::ValueEquals, 6),
        Tok::NotEq => (NodeKind::ValueNotEquals, 6),
        Tok::Lt => (NodeKind::ValueLessThan, 7),
        Tok::LtEq => (NodeKind::ValueLessThanOrEqualTo, 7),
        Tok::Gt => (NodeKind::ValueGreaterThan, 7),
        Tok::GtEq => (NodeKind::ValueGreaterThanOrEqualTo, 7),
        Tok::Shl => (NodeKind::ValueBitShiftLeft, 8),
        Tok::Shr => (NodeKind::ValueBitShiftRight, 8),
        Tok::Plus => (NodeKind::ValueAdd, 9),
        Tok::Minus => (NodeKind::ValueSubtract, 9),
        Tok::Star => (NodeKind::ValueMultiply, 10),
        Tok::Slash => (NodeKind::ValueDivide, 10),
        Tok::SlashSlash => (NodeKind::ValueDivideInt, 10),
        Tok::Percent => (NodeKind::ValueModulo, 10),
        Tok::StarStar => (NodeKind::ValueExponentiate, 11),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_uint_round_trips_through_parse_uint_in_every_base() {
        for base in [2, 8, 10, 16] {
            for n in [0u64, 1, 42, 255, 65535] {
                let text = format_uint(n, base);
                assert_eq!(parse_uint(&text).unwrap(), n, "base {base} value {n}");
            }
        }
    }

    #[test]
    fn parses_the_spec_success_scenario() {
        let root = parse("fn f() -> bool { return true; }", None).unwrap();
        let Node::DeclarationBlock { decls, .. } = root else { panic!("expected a block") };
        assert_eq!(decls.len(), 1);
        let Node::DeclarationFunction { name, body, fn_type, .. } = &decls[0] else { panic!("expected a function") };
        assert_eq!(name, "f");
        assert!(matches!(body.as_deref(), Some([Node::StatementReturn { .. }])));
        let Node::TypeFunction { return_type, .. } = fn_type.as_ref() else { panic!("expected a function type") };
        assert!(matches!(return_type.as_deref(), Some(Node::TypeBool { .. })));
    }

    #[test]
    fn parses_integer_literal_with_width_suffix() {
        let root = parse("fn f() -> bool { return 0u8 == 0u8; }", None).unwrap();
        let Node::DeclarationBlock { decls, .. } = root else { panic!() };
        let Node::DeclarationFunction { body, .. } = &decls[0] else { panic!() };
        let Some(stmts) = body else { panic!() };
        let Node::StatementReturn { value, .. } = &stmts[0] else { panic!() };
        let Node::ValueBinary { kind, left, .. } = value.as_deref().unwrap() else { panic!() };
        assert_eq!(*kind, crate::kind::NodeKind::ValueEquals);
        let Node::ValueInt { value_type, .. } = left.as_ref() else { panic!() };
        assert!(matches!(value_type.as_ref(), Node::TypeInt { unsigned: true, bit_width: 8, .. }));
    }

    #[test]
    fn while_loop_and_local_declaration_parse() {
        let src = "fn f() -> void { i32 x = 0i32; while (x < 10i32) { i32 y = x; } }";
        let root = parse(src, None).unwrap();
        let Node::DeclarationBlock { decls, .. } = root else { panic!() };
        let Node::DeclarationFunction { body, .. } = &decls[0] else { panic!() };
        let stmts = body.as_ref().unwrap();
        assert!(matches!(stmts[0], Node::DeclarationAssignment { .. }));
        assert!(matches!(stmts[1], Node::StatementWhile { .. }));
    }

    #[test]
    fn unexpected_token_is_a_parse_error_not_a_panic() {
        let err = parse("fn f(", None).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. } | ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn unterminated_call_reports_expected_close_paren() {
        let err = parse("fn f() -> bool { return g(true; }", None).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { expected: "')'", .. }));
    }
}
