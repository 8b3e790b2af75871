//! Packrat matching engine for matcha grammars.
//!
//! Executes a validated [`matcha_grammar::Grammar`] against input text:
//! ordered-choice backtracking with position-keyed memoization, implicit
//! whitespace skipping in syntactic rules, and rightmost-failure tracking.
//! A successful match yields an arena-backed concrete syntax tree; a failed
//! match yields a structured failure report, not an error.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod cst;
pub mod failure;
mod matcher;
mod memo;
pub mod report;
pub mod trace;

#[cfg(test)]
mod failure_tests;
#[cfg(test)]
mod report_tests;

pub use cst::{Cst, CstId, NodeId, NodeKind, Span};
pub use failure::{Failure, FailureKind, FailureReport, line_col};
pub use matcher::{MatchError, MatchResult, Matcher};
pub use report::ReportPrinter;
pub use trace::{NoopTracer, PrintTracer, Tracer, Verbosity};
