use std::fmt;

use serde::Serialize;

use topos_common::span::Span;

/// A syntax error with the span of the offending token.
///
/// Parsing aborts on the first error; the driver renders the span as a
/// 1-based line:column via `LineIndex`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}
