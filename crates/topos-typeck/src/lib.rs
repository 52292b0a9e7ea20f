//! TOPOS-Xi semantic analyzer: the type and topology checker.
//!
//! The analyzer walks the parsed program, builds the full symbol table
//! on top of the standard-library seed, and validates:
//!
//! - property defaults against their declared types
//! - path composition under an optional parametric scope
//! - product-type projections and `pair` construction
//! - topological invariant preservation at `init` sites
//!
//! Analysis aborts on the first error. Effect-carrying steps produce
//! warnings, never errors.
//!
//! # Architecture
//!
//! - [`symbol`]: the flat symbol table (spaces, mappings, externals)
//! - [`scope`]: parameter scope stack with innermost-out lookup
//! - [`types`]: syntactic equivalence, argument inference, topology
//!   resolution
//! - [`analyze`]: the visitor threading the cursor type through paths
//! - [`error`]: the semantic error taxonomy with spans
//! - [`diagnostics`]: ariadne rendering

pub mod diagnostics;
pub mod error;
pub mod scope;
pub mod symbol;
pub mod types;

mod analyze;

use rustc_hash::FxHashMap;

use topos_parser::ast::SpaceDef;
use topos_stdlib::ExternalEntity;

pub use error::{SemanticError, Warning};
pub use symbol::{Symbol, SymbolTable};

/// The outcome of a successful analysis.
///
/// The symbol table is complete (standard library plus every space and
/// mapping in the program) and read-only from here on; the interpreter
/// consumes it as-is.
#[derive(Debug)]
pub struct Analysis {
    pub symbols: SymbolTable,
    pub warnings: Vec<Warning>,
}

/// Analyze a parsed program against loaded standard-library definitions.
///
/// This is the main entry point for stage 4 of the pipeline. The first
/// semantic error aborts.
pub fn check(
    program: &[SpaceDef],
    stdlib: FxHashMap<String, ExternalEntity>,
) -> Result<Analysis, SemanticError> {
    analyze::SemanticAnalyzer::new(SymbolTable::from_stdlib(stdlib)).run(program)
}

/// Analyze with an empty standard library. Convenient for tests and for
/// sources that use no external entities.
pub fn check_without_stdlib(program: &[SpaceDef]) -> Result<Analysis, SemanticError> {
    check(program, FxHashMap::default())
}
