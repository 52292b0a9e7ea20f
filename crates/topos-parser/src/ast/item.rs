use serde::Serialize;

use topos_common::span::Span;

use crate::ast::path::{PathStep, Value};
use crate::ast::ty::TypeExpr;

/// A property declaration: `name: Type` with an optional `= default`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDef {
    pub name: String,
    pub ty: TypeExpr,
    pub default: Option<Value>,
    pub span: Span,
}

/// A formal argument of a mapping: `name: Type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeExpr,
    pub span: Span,
}

/// A named, optionally signed mapping.
///
/// `source` and `target` come from the `: Source -> Target` signature.
/// A mapping may also be written with only `-> Target`, or with no
/// signature at all, in which case the path carries no outer composition
/// constraint but still type-checks internally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingDef {
    pub name: String,
    pub params: Vec<Parameter>,
    pub source: Option<TypeExpr>,
    pub target: Option<TypeExpr>,
    pub properties: Vec<PropertyDef>,
    pub path: Vec<PathStep>,
    pub span: Span,
}

/// A space: a named collection of properties and mappings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpaceDef {
    pub name: String,
    pub properties: Vec<PropertyDef>,
    pub members: Vec<MappingDef>,
    pub span: Span,
}
