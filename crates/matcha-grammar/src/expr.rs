//! Expression tree definitions for rule bodies.

use serde::{Deserialize, Serialize};

/// Character-class primitive.
///
/// Each class carries a human description used when a failed match has
/// nothing better to report; those failures rank as fluffy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharClass {
    /// Unicode whitespace.
    Space,
    /// Unicode alphabetic character.
    Letter,
    /// ASCII decimal digit.
    Digit,
    /// Letter or digit.
    Alnum,
    /// Lowercase letter.
    Lower,
    /// Uppercase letter.
    Upper,
}

impl CharClass {
    /// Whether `c` belongs to this class.
    pub fn matches(self, c: char) -> bool {
        match self {
            Self::Space => c.is_whitespace(),
            Self::Letter => c.is_alphabetic(),
            Self::Digit => c.is_ascii_digit(),
            Self::Alnum => c.is_alphabetic() || c.is_ascii_digit(),
            Self::Lower => c.is_lowercase(),
            Self::Upper => c.is_uppercase(),
        }
    }

    /// Description used in diagnostics ("a letter", "a digit", ...).
    pub fn description(self) -> &'static str {
        match self {
            Self::Space => "a space",
            Self::Letter => "a letter",
            Self::Digit => "a digit",
            Self::Alnum => "an alphanumeric character",
            Self::Lower => "a lowercase letter",
            Self::Upper => "an uppercase letter",
        }
    }
}

/// Compiled representation of a rule body.
///
/// No behavior beyond structure and arity metadata; all matching semantics
/// live in the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Literal text.
    Terminal(String),
    /// Character-class primitive.
    Class(CharClass),
    /// Inclusive codepoint range.
    Range(char, char),
    /// Any single character.
    Any,
    /// Application of another rule. `args` must be empty; the field exists so
    /// the ingestion shape matches the original data model (see `GrammarError::ParameterizedRule`).
    Apply {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<Expr>,
    },
    /// Items matched in order.
    Seq(Vec<Expr>),
    /// Ordered choice: first succeeding alternative wins (PEG semantics).
    Choice(Vec<Expr>),
    /// Zero or more repetitions, greedy.
    Star(Box<Expr>),
    /// One or more repetitions, greedy.
    Plus(Box<Expr>),
    /// Zero or one match.
    Opt(Box<Expr>),
    /// Positive lookahead: succeeds iff the inner expression matches.
    /// Consumes no input, produces no CST node.
    Lookahead(Box<Expr>),
    /// Negative lookahead: succeeds iff the inner expression fails.
    Not(Box<Expr>),
}

/// Unequal alternative arities inside some `Choice`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ArityConflict {
    pub arities: Vec<usize>,
}

impl Expr {
    /// Number of CST children this expression produces on a successful match.
    ///
    /// `Seq` sums its items, repetition wraps its matches into a single
    /// iteration node, lookahead contributes nothing. A `Choice` whose
    /// alternatives disagree is an `ArityConflict`; the grammar builder turns
    /// that into `GrammarError::ArityMismatch` so it surfaces at construction
    /// time, never during matching.
    pub(crate) fn arity(&self) -> Result<usize, ArityConflict> {
        match self {
            Expr::Terminal(_) | Expr::Class(_) | Expr::Range(..) | Expr::Any => Ok(1),
            Expr::Apply { .. } => Ok(1),
            Expr::Seq(items) => {
                let mut total = 0;
                for item in items {
                    total += item.arity()?;
                }
                Ok(total)
            }
            Expr::Choice(alts) => {
                let mut arities = Vec::with_capacity(alts.len());
                for alt in alts {
                    arities.push(alt.arity()?);
                }
                match arities.first() {
                    Some(&first) if arities.iter().all(|&a| a == first) => Ok(first),
                    Some(_) => Err(ArityConflict { arities }),
                    None => Ok(0),
                }
            }
            Expr::Star(inner) | Expr::Plus(inner) | Expr::Opt(inner) => {
                inner.arity()?;
                Ok(1)
            }
            Expr::Lookahead(inner) | Expr::Not(inner) => {
                // Still validated: a conflict inside a lookahead is a grammar bug.
                inner.arity()?;
                Ok(0)
            }
        }
    }

    /// Visit every node of the expression tree, depth first.
    pub fn walk(&self, visit: &mut impl FnMut(&Expr)) {
        visit(self);
        match self {
            Expr::Terminal(_) | Expr::Class(_) | Expr::Range(..) | Expr::Any => {}
            Expr::Apply { args, .. } => {
                for arg in args {
                    arg.walk(visit);
                }
            }
            Expr::Seq(items) | Expr::Choice(items) => {
                for item in items {
                    item.walk(visit);
                }
            }
            Expr::Star(inner)
            | Expr::Plus(inner)
            | Expr::Opt(inner)
            | Expr::Lookahead(inner)
            | Expr::Not(inner) => inner.walk(visit),
        }
    }
}
