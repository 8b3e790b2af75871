//! JSON deserialization for structured grammar descriptions.
//!
//! The front end that parses the textual grammar syntax is out of scope; it
//! hands over a description shaped like this:
//!
//! ```json
//! {
//!   "name": "Arithmetic",
//!   "rules": {
//!     "Exp": { "body": { "Apply": { "name": "AddExp" } } },
//!     "number": { "body": { "Plus": { "Apply": { "name": "digit" } } },
//!                 "description": "a number" }
//!   }
//! }
//! ```

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::GrammarError;
use crate::expr::Expr;
use crate::grammar::{Grammar, GrammarBuilder, RuleDecl};

/// Raw grammar structure matching the JSON description format.
#[derive(Debug, Deserialize)]
struct RawGrammar {
    name: String,
    /// Rule bodies keyed by name; map order is declaration order.
    rules: IndexMap<String, RawRule>,
    /// Default start rule override.
    #[serde(default)]
    start: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    body: Expr,
    #[serde(default)]
    params: Vec<String>,
    #[serde(default)]
    description: Option<String>,
}

impl Grammar {
    /// Parse and validate a grammar from a JSON description.
    pub fn from_json(json: &str) -> Result<Self, GrammarError> {
        let raw: RawGrammar = serde_json::from_str(json)?;
        let mut builder = GrammarBuilder::new(&raw.name);
        for (name, rule) in raw.rules {
            builder = builder.decl(RuleDecl {
                name,
                params: rule.params,
                body: rule.body,
                description: rule.description,
            });
        }
        if let Some(start) = &raw.start {
            builder = builder.default_start(start);
        }
        builder.build()
    }
}
