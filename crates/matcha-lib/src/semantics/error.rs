use thiserror::Error;

/// Fatal errors from semantics registration or dispatch.
///
/// Parse failures are never represented here; they are data on the match
/// result. These errors mean the semantics or its use is miswired.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticsError {
    /// An action's declared child count disagrees with the rule's arity.
    /// Raised when the operation is built, before any input is processed.
    #[error(
        "operation '{operation}': action for rule '{rule}' takes {found} children, but the rule produces {expected}"
    )]
    ArityMismatch {
        operation: String,
        rule: String,
        expected: usize,
        found: usize,
    },

    /// An action names a rule the grammar does not define.
    #[error("operation '{operation}': action registered for unknown rule '{rule}'")]
    UnknownRule { operation: String, rule: String },

    /// Dispatch reached a node with no exact action, no applicable wildcard,
    /// and no single child to delegate to.
    #[error("operation '{operation}': no action for '{rule}'")]
    MissingAction { operation: String, rule: String },

    /// The operation or attribute was applied to a failed match result.
    #[error("semantics applied to a failed match")]
    NotAMatch,
}
