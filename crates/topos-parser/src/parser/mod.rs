//! Recursive-descent parser for TOPOS-Xi.
//!
//! The parser consumes the lexer's token stream and builds the typed AST
//! directly. Parsing stops at the first error; the error carries the
//! offending token's span.

pub(crate) mod items;
pub(crate) mod paths;

use topos_common::span::Span;
use topos_common::token::{Token, TokenKind};

use crate::ast::SpaceDef;
use crate::error::ParseError;

/// Parser over a token stream plus the source text the tokens index into.
pub(crate) struct Parser<'src> {
    tokens: Vec<Token>,
    pos: usize,
    source: &'src str,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(tokens: Vec<Token>, source: &'src str) -> Self {
        debug_assert!(
            tokens.last().is_some_and(|t| t.kind == TokenKind::Eof),
            "token stream must end with Eof"
        );
        Self {
            tokens,
            pos: 0,
            source,
        }
    }

    /// Parse a complete program: a sequence of spaces until end of file.
    pub(crate) fn parse_program(mut self) -> Result<Vec<SpaceDef>, ParseError> {
        let mut spaces = Vec::new();
        while !self.at(TokenKind::Eof) {
            spaces.push(items::parse_space(&mut self)?);
        }
        Ok(spaces)
    }

    // ── Lookahead ──────────────────────────────────────────────────────

    /// The current token. Clamped to the trailing `Eof` token.
    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    /// Text of the current token (string literals without quotes).
    pub(crate) fn current_text(&self) -> &'src str {
        self.current().text(self.source)
    }

    pub(crate) fn current_span(&self) -> Span {
        self.current().span
    }

    /// Text of an already-consumed token.
    pub(crate) fn text_of(&self, token: &Token) -> &'src str {
        token.text(self.source)
    }

    // ── Consumption ────────────────────────────────────────────────────

    /// Consume and return the current token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it matches `kind`.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a token of the given kind, or fail with a syntax error
    /// naming what was expected and what was found.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_here(format!(
                "expected {}, found {}",
                kind_label(kind),
                self.found_label()
            )))
        }
    }

    // ── Errors ─────────────────────────────────────────────────────────

    /// A syntax error at the current token.
    pub(crate) fn error_here(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.current_span())
    }

    /// Human label for the current token, for error messages.
    pub(crate) fn found_label(&self) -> String {
        if self.at(TokenKind::Eof) {
            "end of file".to_string()
        } else {
            format!("`{}`", self.current_text())
        }
    }
}

/// Human label for a token kind, for error messages.
pub(crate) fn kind_label(kind: TokenKind) -> &'static str {
    use TokenKind::*;
    match kind {
        Space => "`space`",
        Shape => "`shape`",
        Mapping => "`mapping`",
        Path => "`path`",
        Properties => "`properties`",
        Quantum => "`quantum`",
        Topology => "`topology`",
        Transform => "`transform`",
        Verify => "`verify`",
        BooleanKw => "`Boolean`",
        NumberKw => "`Number`",
        StringKw => "`String`",
        Match => "`match`",
        Arrow => "`->`",
        Eq => "`=`",
        Lt => "`<`",
        Gt => "`>`",
        Plus => "`+`",
        Minus => "`-`",
        Star => "`*`",
        Slash => "`/`",
        LBrace => "`{`",
        RBrace => "`}`",
        LParen => "`(`",
        RParen => "`)`",
        LBracket => "`[`",
        RBracket => "`]`",
        Comma => "`,`",
        Semicolon => "`;`",
        Colon => "`:`",
        NumberLiteral => "a number",
        StringLiteral => "a string",
        Ident => "an identifier",
        Eof => "end of file",
    }
}
