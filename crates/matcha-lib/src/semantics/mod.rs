//! Pluggable tree semantics: typed operations and memoized attributes.
//!
//! A [`Semantics`] is bound to one grammar and hands out builders. Each
//! builder collects per-rule actions plus optional wildcards (nonterminal,
//! terminal, iteration) and validates the whole table against the grammar's
//! rule arities once, at `build()`. Dispatch after that never re-checks:
//! a miswired action table cannot survive to match time.

mod attribute;
mod error;
mod operation;

#[cfg(test)]
mod attribute_tests;

pub use attribute::{AttrCx, Attribute, AttributeBuilder};
pub use error::SemanticsError;
pub use operation::{OpCx, Operation, OperationBuilder};

use matcha_grammar::Grammar;

/// Builds families of operations and attributes for one grammar.
pub struct Semantics<'g> {
    grammar: &'g Grammar,
}

impl<'g> Semantics<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self { grammar }
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    /// Starts an operation producing `T`.
    pub fn operation<T>(&self, name: &str) -> OperationBuilder<'g, T> {
        OperationBuilder::new(self.grammar, name)
    }

    /// Starts an operation whose actions also receive a caller-supplied `&A`
    /// on every application.
    pub fn operation_with<T, A>(&self, name: &str) -> OperationBuilder<'g, T, A> {
        OperationBuilder::new(self.grammar, name)
    }

    /// Starts a memoized attribute producing `Rc<T>`.
    pub fn attribute<T>(&self, name: &str) -> AttributeBuilder<'g, T> {
        AttributeBuilder::new(self.grammar, name)
    }
}

fn check_action_arity(
    grammar: &Grammar,
    operation: &str,
    rule: &str,
    declared: usize,
) -> Result<(), SemanticsError> {
    let Some(found) = grammar.get(rule) else {
        return Err(SemanticsError::UnknownRule {
            operation: operation.to_string(),
            rule: rule.to_string(),
        });
    };
    if found.arity != declared {
        return Err(SemanticsError::ArityMismatch {
            operation: operation.to_string(),
            rule: rule.to_string(),
            expected: found.arity,
            found: declared,
        });
    }
    Ok(())
}
