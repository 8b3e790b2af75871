//! Errors raised while constructing a grammar.

use thiserror::Error;

/// Construction-time grammar errors.
///
/// All of these are fatal: a grammar that fails to build cannot be matched
/// against. Parse failures at match time are ordinary data, not errors.
#[derive(Debug, Error)]
pub enum GrammarError {
    /// Some ordered choice in `rule` has alternatives producing different
    /// numbers of CST nodes.
    #[error("rule `{rule}`: choice alternatives have unequal arities {arities:?}")]
    ArityMismatch { rule: String, arities: Vec<usize> },

    /// An application names a rule the grammar does not define.
    #[error("rule `{referenced_from}` references unknown rule `{name}`")]
    UnknownRule {
        name: String,
        referenced_from: String,
    },

    /// The same rule name was declared twice.
    #[error("rule `{name}` is declared more than once")]
    DuplicateRule { name: String },

    /// A choice with no alternatives can never match.
    #[error("rule `{rule}` contains a choice with no alternatives")]
    EmptyChoice { rule: String },

    /// A grammar must declare at least one rule (the default start rule).
    #[error("grammar `{grammar}` declares no rules")]
    EmptyGrammar { grammar: String },

    /// Parameterized rules are carried in the data model but rejected here:
    /// their memoization-key semantics are unresolved upstream.
    #[error("rule `{rule}` uses rule parameters, which are not supported")]
    ParameterizedRule { rule: String },

    /// The requested default start rule is not defined.
    #[error("start rule `{name}` is not defined")]
    UnknownStartRule { name: String },

    /// A JSON grammar description failed to deserialize.
    #[error("grammar JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
