//! Item-level parsing: spaces, properties, mappings, parameters, types.

use topos_common::token::{TokenCategory, TokenKind};

use crate::ast::{MappingDef, Parameter, PropertyDef, SpaceDef, TypeExpr};
use crate::error::ParseError;
use crate::parser::paths::{parse_path, parse_value};
use crate::parser::Parser;

/// `space NAME { properties? mapping* }`
///
/// Tokens inside the space body that start neither a `properties` block
/// nor a `mapping` are skipped, so annotations the checker does not model
/// do not break parsing.
pub(crate) fn parse_space(p: &mut Parser) -> Result<SpaceDef, ParseError> {
    let start = p.expect(TokenKind::Space)?.span;
    let name_tok = p.expect(TokenKind::Ident)?;
    let name = p.text_of(&name_tok).to_string();
    p.expect(TokenKind::LBrace)?;

    let mut properties = Vec::new();
    if p.at(TokenKind::Properties) {
        properties = parse_properties(p)?;
    }

    let mut members = Vec::new();
    while !p.at(TokenKind::RBrace) {
        if p.at(TokenKind::Mapping) {
            members.push(parse_mapping(p)?);
        } else if p.at(TokenKind::Eof) {
            return Err(p.error_here(format!(
                "unexpected end of file inside space `{name}`"
            )));
        } else {
            p.advance();
        }
    }
    let end = p.expect(TokenKind::RBrace)?.span;

    Ok(SpaceDef {
        name,
        properties,
        members,
        span: start.cover(end),
    })
}

/// `properties { (IDENT ':' type ('=' value)?)* }`
pub(crate) fn parse_properties(p: &mut Parser) -> Result<Vec<PropertyDef>, ParseError> {
    p.expect(TokenKind::Properties)?;
    p.expect(TokenKind::LBrace)?;

    let mut props = Vec::new();
    while !p.at(TokenKind::RBrace) {
        let name_tok = p.expect(TokenKind::Ident)?;
        p.expect(TokenKind::Colon)?;
        let ty = parse_type(p)?;
        let mut default = None;
        if p.eat(TokenKind::Eq) {
            default = Some(parse_value(p)?.0);
        }
        props.push(PropertyDef {
            name: p.text_of(&name_tok).to_string(),
            ty,
            default,
            span: name_tok.span,
        });
    }
    p.expect(TokenKind::RBrace)?;
    Ok(props)
}

/// `type := atom ('*' type)?` -- products associate right.
pub(crate) fn parse_type(p: &mut Parser) -> Result<TypeExpr, ParseError> {
    let left = parse_type_atom(p)?;
    if p.eat(TokenKind::Star) {
        Ok(TypeExpr::product(left, parse_type(p)?))
    } else {
        Ok(left)
    }
}

/// `atom := '(' type ')' | NAME ('<' type (',' type)* '>')?`
///
/// A type name may be an identifier or a keyword token (the builtin type
/// names `Boolean`, `Number`, `String` lex as keywords).
fn parse_type_atom(p: &mut Parser) -> Result<TypeExpr, ParseError> {
    if p.eat(TokenKind::LParen) {
        let ty = parse_type(p)?;
        p.expect(TokenKind::RParen)?;
        return Ok(ty);
    }

    let category = p.current().kind.category();
    if !matches!(category, TokenCategory::Identifier | TokenCategory::Keyword) {
        return Err(p.error_here(format!(
            "expected a type name, found {}",
            p.found_label()
        )));
    }
    let name_tok = p.advance();
    let name = p.text_of(&name_tok).to_string();

    let mut params = Vec::new();
    if p.eat(TokenKind::Lt) {
        loop {
            params.push(parse_type(p)?);
            if p.at(TokenKind::Gt) {
                break;
            }
            p.expect(TokenKind::Comma)?;
        }
        p.expect(TokenKind::Gt)?;
    }

    Ok(TypeExpr::Name { name, params })
}

/// `'(' (IDENT ':' type (',' IDENT ':' type)*)? ')'`
pub(crate) fn parse_params(p: &mut Parser) -> Result<Vec<Parameter>, ParseError> {
    p.expect(TokenKind::LParen)?;
    let mut params = Vec::new();
    while !p.at(TokenKind::RParen) {
        let name_tok = p.expect(TokenKind::Ident)?;
        p.expect(TokenKind::Colon)?;
        let ty = parse_type(p)?;
        params.push(Parameter {
            name: p.text_of(&name_tok).to_string(),
            ty,
            span: name_tok.span,
        });
        if !p.eat(TokenKind::Comma) {
            break;
        }
    }
    p.expect(TokenKind::RParen)?;
    Ok(params)
}

/// `mapping NAME '(' params ')' (':' type '->' type | '->' type)?
///  '{' properties? path '}'`
pub(crate) fn parse_mapping(p: &mut Parser) -> Result<MappingDef, ParseError> {
    let start = p.expect(TokenKind::Mapping)?.span;
    let name_tok = p.expect(TokenKind::Ident)?;
    let name = p.text_of(&name_tok).to_string();
    let params = parse_params(p)?;

    let mut source = None;
    let mut target = None;
    if p.eat(TokenKind::Colon) {
        source = Some(parse_type(p)?);
        p.expect(TokenKind::Arrow)?;
        target = Some(parse_type(p)?);
    } else if p.eat(TokenKind::Arrow) {
        target = Some(parse_type(p)?);
    }

    p.expect(TokenKind::LBrace)?;
    let properties = if p.at(TokenKind::Properties) {
        parse_properties(p)?
    } else {
        Vec::new()
    };
    let path = parse_path(p)?;
    let end = p.expect(TokenKind::RBrace)?.span;

    Ok(MappingDef {
        name,
        params,
        source,
        target,
        properties,
        path,
        span: start.cover(end),
    })
}
