//! Path-level parsing: path blocks, lambda sub-paths, match dispatch,
//! and value/call arguments.

use topos_common::span::Span;
use topos_common::token::TokenKind;

use crate::ast::{LambdaMapping, MappingCall, MatchCase, MatchExpr, PathStep, Value};
use crate::error::ParseError;
use crate::parser::items::parse_params;
use crate::parser::Parser;

/// `path '{' element ('->' element)* '}'`
pub(crate) fn parse_path(p: &mut Parser) -> Result<Vec<PathStep>, ParseError> {
    p.expect(TokenKind::Path)?;
    p.expect(TokenKind::LBrace)?;

    let mut steps = Vec::new();
    while !p.at(TokenKind::RBrace) {
        steps.push(parse_element(p)?);
        if !p.eat(TokenKind::Arrow) {
            break;
        }
    }
    p.expect(TokenKind::RBrace)?;
    Ok(steps)
}

/// One path element: a lambda sub-path, a match expression, or a value.
fn parse_element(p: &mut Parser) -> Result<PathStep, ParseError> {
    if p.at(TokenKind::LParen) {
        return parse_lambda(p).map(PathStep::Lambda);
    }
    if p.at(TokenKind::Match) {
        return parse_match(p).map(PathStep::Match);
    }

    let (value, span) = parse_value(p)?;
    Ok(match value {
        Value::Call(call) => PathStep::Call(call),
        Value::Ident(name) => PathStep::Ident(name, span),
        // A literal in step position degrades to its text, like any
        // other name the analyzer does not know.
        Value::Number(n) => PathStep::Ident(n.to_string(), span),
        Value::Str(s) => PathStep::Ident(s, span),
    })
}

/// `'(' params ')' '{' path '}'`
fn parse_lambda(p: &mut Parser) -> Result<LambdaMapping, ParseError> {
    let start = p.current_span();
    let params = parse_params(p)?;
    p.expect(TokenKind::LBrace)?;
    let path = parse_path(p)?;
    let end = p.expect(TokenKind::RBrace)?.span;
    Ok(LambdaMapping {
        params,
        path,
        span: start.cover(end),
    })
}

/// `'match' '(' IDENT ')' '{' (TOKEN '->' '{' path '}')* '}'`
///
/// A case value may be any token kind; its text is preserved (string
/// literals without quotes), and `_` is the catch-all.
fn parse_match(p: &mut Parser) -> Result<MatchExpr, ParseError> {
    let start = p.expect(TokenKind::Match)?.span;
    p.expect(TokenKind::LParen)?;
    let target_tok = p.expect(TokenKind::Ident)?;
    let target = p.text_of(&target_tok).to_string();
    p.expect(TokenKind::RParen)?;
    p.expect(TokenKind::LBrace)?;

    let mut cases = Vec::new();
    while !p.at(TokenKind::RBrace) {
        if p.at(TokenKind::Eof) {
            return Err(p.error_here(format!(
                "unexpected end of file in match on `{target}`"
            )));
        }
        let value_tok = p.advance();
        let value = p.text_of(&value_tok).to_string();
        p.expect(TokenKind::Arrow)?;
        p.expect(TokenKind::LBrace)?;
        let path = parse_path(p)?;
        let end = p.expect(TokenKind::RBrace)?.span;
        cases.push(MatchCase {
            value,
            path,
            span: value_tok.span.cover(end),
        });
    }
    let end = p.expect(TokenKind::RBrace)?.span;

    Ok(MatchExpr {
        target,
        cases,
        span: start.cover(end),
    })
}

/// `value := NUMBER | STRING | IDENT ('(' value_list? ')')?`
///
/// Returns the value together with the span it was parsed from.
pub(crate) fn parse_value(p: &mut Parser) -> Result<(Value, Span), ParseError> {
    match p.current().kind {
        TokenKind::Ident => {
            let name_tok = p.advance();
            let name = p.text_of(&name_tok).to_string();
            if !p.at(TokenKind::LParen) {
                return Ok((Value::Ident(name), name_tok.span));
            }
            p.advance(); // consume '('
            let mut args = Vec::new();
            while !p.at(TokenKind::RParen) {
                args.push(parse_value(p)?.0);
                if !p.eat(TokenKind::Comma) {
                    break;
                }
            }
            let end = p.expect(TokenKind::RParen)?.span;
            let span = name_tok.span.cover(end);
            Ok((Value::Call(MappingCall { name, args, span }), span))
        }
        TokenKind::NumberLiteral => {
            let tok = p.advance();
            let text = p.text_of(&tok);
            let number = text
                .parse::<f64>()
                .map_err(|_| ParseError::new(format!("invalid number `{text}`"), tok.span))?;
            Ok((Value::Number(number), tok.span))
        }
        TokenKind::StringLiteral => {
            let tok = p.advance();
            Ok((Value::Str(p.text_of(&tok).to_string()), tok.span))
        }
        _ => Err(p.error_here(format!("unexpected token {}", p.found_label()))),
    }
}
