//! TOPOS-Xi parser: recursive descent over the lexer's token stream,
//! producing the typed AST in [`ast`].
//!
//! Parsing is all-or-nothing: the first syntax error aborts and is
//! returned with the offending token's span.

pub mod ast;
pub mod error;
mod parser;

pub use error::ParseError;

use topos_common::token::Token;

/// Parse a token stream into a program (a sequence of space definitions).
///
/// `source` must be the text the tokens were lexed from; token and AST
/// spans index into it.
pub fn parse(tokens: Vec<Token>, source: &str) -> Result<Vec<ast::SpaceDef>, ParseError> {
    parser::Parser::new(tokens, source).parse_program()
}

/// Lex and parse in one step.
///
/// Lexical errors surface as parse errors with the lexer's message; the
/// driver lexes and parses separately when it needs to attribute the
/// phase.
pub fn parse_source(source: &str) -> Result<Vec<ast::SpaceDef>, ParseError> {
    let tokens = topos_lexer::Lexer::tokenize(source)
        .map_err(|e| ParseError::new(e.to_string(), e.span))?;
    parse(tokens, source)
}
