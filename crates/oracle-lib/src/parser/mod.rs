//! Parser infrastructure for the schema language.
//!
//! # Architecture
//!
//! This parser produces a lossless concrete syntax tree (CST) via Rowan's green tree builder.
//!
//! - Zero-copy parsing: tokens carry spans, text sliced only when building tree nodes
//! - Trivia buffering: whitespace/comments collected, then attached as leading trivia
//! - Checkpoint-based wrapping: a definition's node kind is decided after its name
//! - Explicit recovery sets: per-production sets determine when to bail vs consume
//!
//! # Recovery Strategy
//!
//! The parser is resilient: it always produces a tree.
//!
//! 1. Unknown tokens get wrapped in `SyntaxKind::Error` nodes and consumed
//! 2. Missing expected tokens emit a diagnostic but don't consume (parent may handle)
//! 3. Recovery sets define "synchronization points" per production
//!
//! Fuel exhaustion (exec fuel, recursion fuel) returns an actual error immediately.

pub mod ast;
pub mod cst;
pub mod lexer;

mod core;
mod grammar;

#[cfg(test)]
mod grammar_tests;
#[cfg(test)]
mod lexer_tests;
#[cfg(test)]
mod recovery_tests;

use std::fmt::Write;

use oracle_core::SourceId;
use rowan::NodeOrToken;

pub use ast::Root;
pub use core::{ParseResult, Parser};
pub use cst::{SyntaxKind, SyntaxNode, SyntaxToken};

use crate::Error;

/// Default execution fuel: one unit per consumed token.
pub const DEFAULT_PARSE_FUEL: u32 = 1_000_000;

/// Default nesting limit for type references.
pub const DEFAULT_PARSE_MAX_DEPTH: u32 = 4096;

/// Parse with default limits. Returns Err on fuel exhaustion.
pub fn parse(source: &str, source_id: SourceId) -> Result<ParseResult, Error> {
    parse_with_limits(
        source,
        source_id,
        DEFAULT_PARSE_FUEL,
        DEFAULT_PARSE_MAX_DEPTH,
    )
}

pub fn parse_with_limits(
    source: &str,
    source_id: SourceId,
    exec_fuel: u32,
    max_depth: u32,
) -> Result<ParseResult, Error> {
    let tokens = lexer::lex(source);
    Parser::new(source, source_id, tokens, exec_fuel, max_depth).parse()
}

/// Indented CST dump: nodes by kind, tokens as `Kind "text"`.
pub fn dump_cst(node: &SyntaxNode, with_trivia: bool) -> String {
    let mut out = String::new();
    format_cst(node, 0, with_trivia, &mut out).expect("String write never fails");
    out
}

fn format_cst(
    node: &SyntaxNode,
    indent: usize,
    with_trivia: bool,
    w: &mut impl Write,
) -> std::fmt::Result {
    let prefix = "  ".repeat(indent);
    writeln!(w, "{}{:?}", prefix, node.kind())?;

    for child in node.children_with_tokens() {
        match child {
            NodeOrToken::Node(n) => format_cst(&n, indent + 1, with_trivia, w)?,
            NodeOrToken::Token(t) => {
                if with_trivia || !t.kind().is_trivia() {
                    let child_prefix = "  ".repeat(indent + 1);
                    writeln!(w, "{}{:?} {:?}", child_prefix, t.kind(), t.text())?;
                }
            }
        }
    }
    Ok(())
}
