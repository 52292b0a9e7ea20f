//! Ariadne-based diagnostic rendering for semantic errors.
//!
//! Renders a [`SemanticError`] into a formatted, labeled report against
//! the source text. Output is colorless so test assertions and logs stay
//! stable.

use std::ops::Range;

use ariadne::{Config, Label, Report, ReportKind, Source};

use crate::error::SemanticError;

/// Assign a stable error code to each semantic error kind.
pub fn error_code(error: &SemanticError) -> &'static str {
    match error {
        SemanticError::TypeMismatch { .. } => "E0001",
        SemanticError::UnknownType { .. } => "E0002",
        SemanticError::EmptyPath { .. } => "E0003",
        SemanticError::CompositionError { .. } => "E0004",
        SemanticError::ProjectionError { .. } => "E0005",
        SemanticError::PairError { .. } => "E0006",
        SemanticError::MorphismError { .. } => "E0007",
        SemanticError::TopologicalViolation { .. } => "E0008",
        SemanticError::OrientationViolation { .. } => "E0009",
        SemanticError::HomotopyViolation { .. } => "E0010",
    }
}

/// Render a semantic error as a labeled report string.
pub fn render_diagnostic(error: &SemanticError, source: &str) -> String {
    let config = Config::default().with_color(false);
    let range = clamp_span(error, source.len());

    let report = Report::<Range<usize>>::build(ReportKind::Error, range.clone())
        .with_config(config)
        .with_code(error_code(error))
        .with_message(error.kind_label())
        .with_label(Label::new(range).with_message(error.to_string()))
        .finish();

    let mut buf = Vec::new();
    let _ = report.write(Source::from(source), &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Clamp the error span into the source bounds, widening zero-length
/// spans so ariadne always has something to underline.
fn clamp_span(error: &SemanticError, source_len: usize) -> Range<usize> {
    let span = error.span();
    let start = (span.start as usize).min(source_len);
    let end = (span.end as usize).min(source_len).max(start);
    if start == end {
        start..end.saturating_add(1).min(source_len).max(start)
    } else {
        start..end
    }
}
