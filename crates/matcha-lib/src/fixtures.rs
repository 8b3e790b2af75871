//! Shared test grammar: arithmetic over `+ - * / ^`, parentheses,
//! identifiers, and numbers.

use matcha_grammar::build::*;
use matcha_grammar::{Grammar, GrammarBuilder};

/// Case-labeled alternatives arrive pre-expanded into synthetic rules named
/// `<rule>_<label>`, each an alternative of the parent choice. Recursion is
/// on the right so that no rule can re-enter itself without consuming input.
pub(crate) fn arithmetic() -> Grammar {
    GrammarBuilder::new("Arithmetic")
        .rule("Exp", apply("AddExp"))
        .rule(
            "AddExp",
            choice([
                apply("AddExp_plus"),
                apply("AddExp_minus"),
                apply("MulExp"),
            ]),
        )
        .rule(
            "AddExp_plus",
            seq([apply("MulExp"), terminal("+"), apply("AddExp")]),
        )
        .rule(
            "AddExp_minus",
            seq([apply("MulExp"), terminal("-"), apply("AddExp")]),
        )
        .rule(
            "MulExp",
            choice([
                apply("MulExp_times"),
                apply("MulExp_divide"),
                apply("ExpExp"),
            ]),
        )
        .rule(
            "MulExp_times",
            seq([apply("ExpExp"), terminal("*"), apply("MulExp")]),
        )
        .rule(
            "MulExp_divide",
            seq([apply("ExpExp"), terminal("/"), apply("MulExp")]),
        )
        .rule("ExpExp", choice([apply("ExpExp_power"), apply("PriExp")]))
        .rule(
            "ExpExp_power",
            seq([apply("PriExp"), terminal("^"), apply("ExpExp")]),
        )
        .rule(
            "PriExp",
            choice([apply("PriExp_paren"), apply("ident"), apply("number")]),
        )
        .rule(
            "PriExp_paren",
            seq([terminal("("), apply("Exp"), terminal(")")]),
        )
        .rule_described(
            "ident",
            seq([apply("letter"), star(apply("alnum"))]),
            "an identifier",
        )
        .rule_described("number", plus(apply("digit")), "a number")
        .build()
        .unwrap()
}
