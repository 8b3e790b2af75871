//! Constructor helpers for assembling rule bodies.
//!
//! The structured grammar description is plain data; these shorthands keep
//! hand-written grammars readable:
//!
//! ```
//! use matcha_grammar::build::*;
//!
//! // Number = digit+ ("." digit+)?
//! let body = seq([plus(apply("digit")), opt(seq([terminal("."), plus(apply("digit"))]))]);
//! ```

use crate::expr::{CharClass, Expr};

pub fn terminal(text: &str) -> Expr {
    Expr::Terminal(text.to_string())
}

pub fn class(class: CharClass) -> Expr {
    Expr::Class(class)
}

pub fn range(lo: char, hi: char) -> Expr {
    Expr::Range(lo, hi)
}

pub fn any() -> Expr {
    Expr::Any
}

pub fn apply(name: &str) -> Expr {
    Expr::Apply {
        name: name.to_string(),
        args: Vec::new(),
    }
}

pub fn seq(items: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Seq(items.into_iter().collect())
}

pub fn choice(alts: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Choice(alts.into_iter().collect())
}

pub fn star(inner: Expr) -> Expr {
    Expr::Star(Box::new(inner))
}

pub fn plus(inner: Expr) -> Expr {
    Expr::Plus(Box::new(inner))
}

pub fn opt(inner: Expr) -> Expr {
    Expr::Opt(Box::new(inner))
}

pub fn lookahead(inner: Expr) -> Expr {
    Expr::Lookahead(Box::new(inner))
}

pub fn not(inner: Expr) -> Expr {
    Expr::Not(Box::new(inner))
}
