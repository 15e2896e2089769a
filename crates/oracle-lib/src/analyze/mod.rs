//! Semantic analysis passes.
//!
//! Passes run in order over one shared [`Table`](oracle_core::Table):
//! - Collection: parsed files into table entries (collect)
//! - Reference resolution: raw names into qualified names (resolve)
//! - Inheritance validation: parents, cycles, omissions (inheritance)
//! - Recursion detection: structs that reach themselves (recursion)

mod collect;
mod inheritance;
mod recursion;
mod resolve;

#[cfg(test)]
mod collect_tests;
#[cfg(test)]
mod resolve_tests;

pub use collect::{FileContext, collect_file};
pub use inheritance::validate_inheritance;
pub use recursion::detect_recursive_types;
pub use resolve::resolve_type_refs;
