use std::cell::Cell;
use std::rc::Rc;

use matcha_engine::{MatchResult, Matcher};
use matcha_grammar::build::*;
use matcha_grammar::{Grammar, GrammarBuilder};

use super::{Attribute, Semantics, SemanticsError};

fn word_grammar() -> Grammar {
    GrammarBuilder::new("Words")
        .rule("Start", apply("word"))
        .rule("word", plus(apply("letter")))
        .build()
        .unwrap()
}

fn parse<'g>(g: &'g Grammar, input: &str) -> MatchResult<'g> {
    Matcher::new(g).match_input(input).unwrap()
}

fn length_attribute(g: &Grammar) -> (Attribute<usize>, Rc<Cell<u32>>) {
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);
    let attr = Semantics::new(g)
        .attribute::<usize>("length")
        .action("word", 1, move |cx, _| {
            seen.set(seen.get() + 1);
            Ok(cx.text(cx.node()).len())
        })
        .build()
        .unwrap();
    (attr, calls)
}

#[test]
fn repeated_reads_return_the_identical_value() {
    let g = word_grammar();
    let r = parse(&g, "abc");
    let (attr, calls) = length_attribute(&g);

    let first = attr.at(&r).unwrap();
    let second = attr.at(&r).unwrap();
    assert_eq!(*first, 3);
    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(calls.get(), 1);
}

#[test]
fn delegation_shares_the_child_value() {
    let g = word_grammar();
    let r = parse(&g, "ab");
    let (attr, calls) = length_attribute(&g);

    // Root `Start` delegates to `word`; both arena slots end up holding the
    // same Rc, so reading either costs one computation total.
    let cst = r.cst().unwrap();
    let root_value = attr.of(cst).unwrap();
    let word_value = attr.at(&r).unwrap();
    assert!(Rc::ptr_eq(&root_value, &word_value));
    assert_eq!(calls.get(), 1);
}

#[test]
fn separate_trees_are_cached_separately() {
    let g = word_grammar();
    let first = parse(&g, "abc");
    let second = parse(&g, "abc");
    let (attr, calls) = length_attribute(&g);

    let a = attr.at(&first).unwrap();
    let b = attr.at(&second).unwrap();
    assert_eq!(*a, *b);
    assert!(!Rc::ptr_eq(&a, &b));
    assert_eq!(calls.get(), 2);
}

#[test]
fn attribute_builders_validate_arity_too() {
    let g = word_grammar();
    let err = Semantics::new(&g)
        .attribute::<usize>("length")
        .action("word", 4, |_, _| Ok(0))
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        SemanticsError::ArityMismatch {
            operation: "length".to_string(),
            rule: "word".to_string(),
            expected: 1,
            found: 4,
        }
    );
}

#[test]
fn reading_a_failed_match_is_not_a_match() {
    let g = word_grammar();
    let r = parse(&g, "123");
    assert!(r.failed());
    let (attr, _) = length_attribute(&g);
    assert_eq!(attr.at(&r).unwrap_err(), SemanticsError::NotAMatch);
}
