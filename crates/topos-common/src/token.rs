use serde::Serialize;

use crate::span::Span;

/// A token produced by the TOPOS-Xi lexer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Create a new token from a kind and byte offsets.
    pub fn new(kind: TokenKind, start: u32, end: u32) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }

    /// The token's text as a slice of the source it was lexed from.
    ///
    /// For string literals the slice excludes the surrounding quotes.
    pub fn text<'src>(&self, source: &'src str) -> &'src str {
        let (mut start, mut end) = (self.span.start as usize, self.span.end as usize);
        if self.kind == TokenKind::StringLiteral {
            start += 1;
            end -= 1;
        }
        &source[start..end]
    }
}

/// Every kind of token in the TOPOS-Xi language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    // ── Keywords (13) ──────────────────────────────────────────────────
    Space,
    Shape,
    Mapping,
    Path,
    Properties,
    Quantum,
    Topology,
    Transform,
    Verify,
    BooleanKw,
    NumberKw,
    StringKw,
    Match,

    // ── Operators (8) ──────────────────────────────────────────────────
    /// `->`
    Arrow,
    /// `=`
    Eq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,

    // ── Delimiters (9) ─────────────────────────────────────────────────
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Colon,

    // ── Literals and identifiers (3) ───────────────────────────────────
    /// Number literal, e.g. `42`, `3.14`, `7.`.
    NumberLiteral,
    /// String literal. The span covers the quotes; `Token::text` strips them.
    StringLiteral,
    Ident,

    // ── Special (1) ────────────────────────────────────────────────────
    Eof,
}

/// Coarse token category, the taxonomy the language grammar is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenCategory {
    Keyword,
    Identifier,
    Number,
    String,
    Operator,
    Delimiter,
    Eof,
}

impl TokenKind {
    /// The coarse category this kind belongs to.
    pub fn category(self) -> TokenCategory {
        use TokenKind::*;
        match self {
            Space | Shape | Mapping | Path | Properties | Quantum | Topology | Transform
            | Verify | BooleanKw | NumberKw | StringKw | Match => TokenCategory::Keyword,
            Arrow | Eq | Lt | Gt | Plus | Minus | Star | Slash => TokenCategory::Operator,
            LBrace | RBrace | LParen | RParen | LBracket | RBracket | Comma | Semicolon
            | Colon => TokenCategory::Delimiter,
            NumberLiteral => TokenCategory::Number,
            StringLiteral => TokenCategory::String,
            Ident => TokenCategory::Identifier,
            Eof => TokenCategory::Eof,
        }
    }
}

/// Look up a keyword from its string representation.
///
/// Returns `Some(TokenKind)` if the string is a TOPOS-Xi keyword, `None`
/// otherwise. The lexer calls this after scanning an identifier-shaped
/// token to promote keywords.
pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
    match s {
        "space" => Some(TokenKind::Space),
        "shape" => Some(TokenKind::Shape),
        "mapping" => Some(TokenKind::Mapping),
        "path" => Some(TokenKind::Path),
        "properties" => Some(TokenKind::Properties),
        "quantum" => Some(TokenKind::Quantum),
        "topology" => Some(TokenKind::Topology),
        "transform" => Some(TokenKind::Transform),
        "verify" => Some(TokenKind::Verify),
        "Boolean" => Some(TokenKind::BooleanKw),
        "Number" => Some(TokenKind::NumberKw),
        "String" => Some(TokenKind::StringKw),
        "match" => Some(TokenKind::Match),
        _ => None,
    }
}
