use std::fmt;

/// A fatal runtime error. Malformed projections, missing variables, and
/// arity mismatches are reported and skipped; only the recursion guard
/// aborts execution.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// A mapping call chain exceeded the configured depth limit.
    RecursionDepth { mapping: String, depth: usize },
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::RecursionDepth { mapping, depth } => {
                write!(f, "recursion depth exceeded in mapping '{mapping}' (depth {depth})")
            }
        }
    }
}

impl std::error::Error for RuntimeError {}
