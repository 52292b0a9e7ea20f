//! Shared types for the TOPOS-Xi toolchain.
//!
//! Every pipeline stage depends on this crate: the lexer produces
//! [`token::Token`]s, diagnostics convert [`span::Span`]s to line/column
//! pairs via [`span::LineIndex`], and the semantic analyzer combines
//! [`topology::TopologyBag`]s when it resolves product types.

pub mod error;
pub mod span;
pub mod token;
pub mod topology;
