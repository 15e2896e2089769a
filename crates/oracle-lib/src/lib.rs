//! Oracle: parser and semantic analyzer for the Oracle schema language.
//!
//! Schemas declare structs, enums, aliases and distinct types across files that
//! import each other. Analysis turns them into one resolved [`Table`].
//!
//! # Example
//!
//! ```
//! use oracle_lib::{MemoryLoader, analyze_source};
//!
//! let source = r#"
//!     Range struct {
//!         key uuid @key
//!         name string
//!     }
//! "#;
//!
//! let analysis = analyze_source(source, "ranger", &MemoryLoader::new()).expect("out of fuel");
//! assert!(analysis.is_ok());
//!
//! let table = analysis.table().unwrap();
//! assert!(table.lookup("ranger", "Range").is_some());
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod analyze;
pub mod analyzer;
pub mod cancel;
pub mod diagnostics;
pub mod loader;
pub mod parser;
pub mod source_map;

#[cfg(test)]
mod loader_tests;

pub use analyzer::{Analysis, Analyzer, AnalyzerConfig, analyze, analyze_source};
pub use cancel::Cancellation;
pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};
pub use loader::{
    FileLoader, FileSystemLoader, LoadError, LoadedFile, MemoryLoader, derive_namespace,
};
pub use source_map::{SourceKind, SourceMap};

pub use oracle_core::{SourceId, Span, Table};

/// Errors that stop an analysis run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Execution fuel exhausted (too many parser operations).
    #[error("execution limit exceeded")]
    ExecFuelExhausted,

    /// Recursion fuel exhausted (input nested too deeply).
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,

    #[error("analysis cancelled")]
    Cancelled,

    #[error("schema analysis failed with {} errors", .0.error_count())]
    AnalysisFailed(Diagnostics),
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, Error>;
