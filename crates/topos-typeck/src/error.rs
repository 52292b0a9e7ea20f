//! Semantic error and warning types.
//!
//! Every error carries the byte span of the construct that produced it,
//! so the driver can render both the pipeline's `[FAILURE] <Kind>:
//! <message>` line and a labeled ariadne report.

use std::fmt;

use topos_common::span::Span;

/// A semantic error. Analysis aborts on the first one.
#[derive(Debug, Clone, PartialEq)]
pub enum SemanticError {
    /// A literal property default is incompatible with its declared type.
    TypeMismatch {
        expected: String,
        found: String,
        span: Span,
    },
    /// A declared type name exists nowhere in the symbol table.
    UnknownType { name: String, span: Span },
    /// A path with no steps.
    EmptyPath { context: String, span: Span },
    /// A step's declared source disagrees with the incoming cursor type.
    CompositionError {
        context: String,
        step: String,
        expected: String,
        found: String,
        span: Span,
    },
    /// `fst`/`snd` applied to a non-product cursor.
    ProjectionError {
        context: String,
        step: String,
        found: Option<String>,
        span: Span,
    },
    /// `pair` with arity other than 2.
    PairError { context: String, span: Span },
    /// The declared mapping target disagrees with the final cursor type.
    MorphismError {
        context: String,
        expected: String,
        found: String,
        span: Span,
    },
    /// Euler characteristics differ across an `init`.
    TopologicalViolation {
        context: String,
        source: String,
        target: String,
        source_euler: i64,
        target_euler: i64,
        span: Span,
    },
    /// Orientability differs across an `init`.
    OrientationViolation {
        context: String,
        source: String,
        target: String,
        source_orientable: bool,
        target_orientable: bool,
        span: Span,
    },
    /// Fundamental groups differ across an `init`.
    HomotopyViolation {
        context: String,
        source: String,
        target: String,
        source_group: String,
        target_group: String,
        span: Span,
    },
}

impl SemanticError {
    /// The taxonomy label used in `[FAILURE] <Kind>: <message>` lines.
    pub fn kind_label(&self) -> &'static str {
        match self {
            SemanticError::TypeMismatch { .. } => "Type Mismatch",
            SemanticError::UnknownType { .. } => "Unknown Type",
            SemanticError::EmptyPath { .. } => "Path Error",
            SemanticError::CompositionError { .. } => "Composition Error",
            SemanticError::ProjectionError { .. } => "Projection Error",
            SemanticError::PairError { .. } => "Pair Error",
            SemanticError::MorphismError { .. } => "Morphism Error",
            SemanticError::TopologicalViolation { .. } => "Topological Violation",
            SemanticError::OrientationViolation { .. } => "Orientation Violation",
            SemanticError::HomotopyViolation { .. } => "Homotopy Violation",
        }
    }

    pub fn span(&self) -> Span {
        match self {
            SemanticError::TypeMismatch { span, .. }
            | SemanticError::UnknownType { span, .. }
            | SemanticError::EmptyPath { span, .. }
            | SemanticError::CompositionError { span, .. }
            | SemanticError::ProjectionError { span, .. }
            | SemanticError::PairError { span, .. }
            | SemanticError::MorphismError { span, .. }
            | SemanticError::TopologicalViolation { span, .. }
            | SemanticError::OrientationViolation { span, .. }
            | SemanticError::HomotopyViolation { span, .. } => *span,
        }
    }
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticError::TypeMismatch {
                expected, found, ..
            } => {
                write!(f, "expected {expected}, got '{found}'")
            }
            SemanticError::UnknownType { name, .. } => {
                write!(f, "type '{name}' is not defined")
            }
            SemanticError::EmptyPath { context, .. } => {
                write!(f, "path in '{context}' must have at least one step")
            }
            SemanticError::CompositionError {
                context,
                step,
                expected,
                found,
                ..
            } => write!(
                f,
                "step '{step}' in '{context}' expects source {expected}, but previous output was {found}"
            ),
            SemanticError::ProjectionError {
                context,
                step,
                found,
                ..
            } => match found {
                Some(found) => write!(
                    f,
                    "'{step}' in '{context}' requires a product-type source, got {found}"
                ),
                None => write!(
                    f,
                    "'{step}' in '{context}' requires a product-type source, but none is known"
                ),
            },
            SemanticError::PairError { context, .. } => {
                write!(f, "'pair' in '{context}' requires exactly 2 arguments")
            }
            SemanticError::MorphismError {
                context,
                expected,
                found,
                ..
            } => write!(
                f,
                "'{context}' expects final target {expected}, but path ends with {found}"
            ),
            SemanticError::TopologicalViolation {
                context,
                source,
                target,
                source_euler,
                target_euler,
                ..
            } => write!(
                f,
                "in '{context}': {source}(X={source_euler}) -> {target}(X={target_euler})"
            ),
            SemanticError::OrientationViolation {
                context,
                source,
                target,
                source_orientable,
                target_orientable,
                ..
            } => write!(
                f,
                "in '{context}': {source}(orientable={source_orientable}) -> {target}(orientable={target_orientable})"
            ),
            SemanticError::HomotopyViolation {
                context,
                source,
                target,
                source_group,
                target_group,
                ..
            } => write!(
                f,
                "in '{context}': {source}(pi1={source_group}) -> {target}(pi1={target_group})"
            ),
        }
    }
}

impl std::error::Error for SemanticError {}

/// A non-fatal observation surfaced with the `[WARNING]` prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub message: String,
    pub span: Span,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
