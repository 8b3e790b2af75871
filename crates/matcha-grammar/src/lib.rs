//! Grammar data model for the matcha PEG engine.
//!
//! This crate defines the structured form of a grammar: expression trees for
//! rule bodies, the rule table, and the construction-time validation that
//! guarantees every ordered choice produces a consistent number of CST nodes.
//! The textual grammar syntax is an external front end's concern; ingestion
//! here is either the builder API or a JSON description.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod build;
mod error;
mod expr;
mod grammar;
mod json;

#[cfg(test)]
mod expr_tests;
#[cfg(test)]
mod json_tests;

pub use error::GrammarError;
pub use expr::{CharClass, Expr};
pub use grammar::{Grammar, GrammarBuilder, Rule, RuleDecl, RuleId, RuleKind};
