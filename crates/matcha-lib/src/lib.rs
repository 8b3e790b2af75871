//! matcha: PEG matching over validated grammars, with pluggable tree
//! semantics.
//!
//! # Example
//!
//! ```
//! use matcha_lib::build::*;
//! use matcha_lib::{GrammarBuilder, Matcher, Semantics};
//!
//! let grammar = GrammarBuilder::new("Digits")
//!     .rule_described("number", plus(apply("digit")), "a number")
//!     .build()?;
//!
//! let result = Matcher::new(&grammar).match_input("442")?;
//! assert!(result.succeeded());
//!
//! let value = Semantics::new(&grammar)
//!     .operation::<u32>("value")
//!     .action("number", 1, |cx, _| Ok(cx.text(cx.node()).parse().unwrap()))
//!     .build()?;
//! assert_eq!(value.apply(&result)?, 442);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod semantics;

#[cfg(test)]
pub(crate) mod fixtures;

pub use matcha_engine::{
    Cst, CstId, Failure, FailureKind, FailureReport, MatchError, MatchResult, Matcher, NodeId,
    NodeKind, NoopTracer, PrintTracer, ReportPrinter, Span, Tracer, Verbosity, line_col,
};
pub use matcha_grammar::{
    CharClass, Expr, Grammar, GrammarBuilder, GrammarError, Rule, RuleDecl, RuleId, RuleKind,
    build,
};
pub use semantics::{
    AttrCx, Attribute, AttributeBuilder, OpCx, Operation, OperationBuilder, Semantics,
    SemanticsError,
};
