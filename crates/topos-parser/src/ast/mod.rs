//! The TOPOS-Xi abstract syntax tree.
//!
//! AST nodes are plain tagged variants, created by the parser and
//! immutable afterwards. Every node carries the byte span it was parsed
//! from so later stages can point diagnostics at source text. All nodes
//! derive `Serialize` for the driver's `--emit ast` dump.

pub mod item;
pub mod path;
pub mod ty;

pub use item::{MappingDef, Parameter, PropertyDef, SpaceDef};
pub use path::{LambdaMapping, MappingCall, MatchCase, MatchExpr, PathStep, Value};
pub use ty::TypeExpr;
