use serde::Serialize;

use topos_common::span::Span;

use crate::ast::item::Parameter;

/// A value in argument or property-default position: a literal, an
/// identifier, or a nested call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Number(f64),
    Str(String),
    Ident(String),
    Call(MappingCall),
}

impl Value {
    /// The textual form used when a value appears as a path step or a
    /// match scrutinee.
    pub fn as_step_text(&self) -> String {
        match self {
            Value::Number(n) => n.to_string(),
            Value::Str(s) | Value::Ident(s) => s.clone(),
            Value::Call(call) => call.name.clone(),
        }
    }
}

/// An invocation with zero or more value arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingCall {
    pub name: String,
    pub args: Vec<Value>,
    pub span: Span,
}

/// An anonymous mapping literal inside a path: `(params) { path { ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LambdaMapping {
    pub params: Vec<Parameter>,
    pub path: Vec<PathStep>,
    pub span: Span,
}

/// One arm of a match expression. The case value is the raw token text
/// (string literals without their quotes); `_` is the catch-all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCase {
    pub value: String,
    pub path: Vec<PathStep>,
    pub span: Span,
}

/// Pattern dispatch on a named target: `match (x) { ... }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchExpr {
    pub target: String,
    pub cases: Vec<MatchCase>,
    pub span: Span,
}

/// One step of a path. Steps compose left to right, written `a -> b -> c`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PathStep {
    /// A bare name (or literal text) step.
    Ident(String, Span),
    Call(MappingCall),
    Lambda(LambdaMapping),
    Match(MatchExpr),
}

impl PathStep {
    /// The step's name as the analyzer and interpreter see it.
    /// Lambda and match steps have no name.
    pub fn name(&self) -> Option<&str> {
        match self {
            PathStep::Ident(name, _) => Some(name),
            PathStep::Call(call) => Some(&call.name),
            PathStep::Lambda(_) | PathStep::Match(_) => None,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            PathStep::Ident(_, span) => *span,
            PathStep::Call(call) => call.span,
            PathStep::Lambda(lambda) => lambda.span,
            PathStep::Match(m) => m.span,
        }
    }

    /// Whether this step is the bare `init` marker.
    pub fn is_bare_init(&self) -> bool {
        matches!(self, PathStep::Ident(name, _) if name == "init")
    }
}
