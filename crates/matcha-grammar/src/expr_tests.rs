use crate::build::*;
use crate::expr::CharClass;

#[test]
fn terminal_and_apply_have_arity_one() {
    assert_eq!(terminal("+").arity(), Ok(1));
    assert_eq!(apply("Exp").arity(), Ok(1));
    assert_eq!(any().arity(), Ok(1));
    assert_eq!(class(CharClass::Digit).arity(), Ok(1));
}

#[test]
fn seq_sums_item_arities() {
    let body = seq([apply("AddExp"), terminal("+"), apply("MulExp")]);
    assert_eq!(body.arity(), Ok(3));
}

#[test]
fn lookahead_contributes_no_children() {
    let body = seq([not(terminal("x")), apply("rest")]);
    assert_eq!(body.arity(), Ok(1));
    assert_eq!(lookahead(seq([any(), any()])).arity(), Ok(0));
}

#[test]
fn repetition_wraps_into_one_iteration_node() {
    assert_eq!(star(seq([any(), any()])).arity(), Ok(1));
    assert_eq!(plus(apply("digit")).arity(), Ok(1));
    assert_eq!(opt(terminal("-")).arity(), Ok(1));
}

#[test]
fn consistent_choice_takes_common_arity() {
    let body = choice([
        seq([terminal("("), apply("Exp"), terminal(")")]),
        seq([apply("a"), apply("b"), apply("c")]),
    ]);
    assert_eq!(body.arity(), Ok(3));
}

#[test]
fn inconsistent_choice_reports_all_arities() {
    let body = choice([seq([apply("AddExp"), terminal("+"), apply("MulExp")]), apply("MulExp")]);
    let conflict = body.arity().unwrap_err();
    assert_eq!(conflict.arities, vec![3, 1]);
}

#[test]
fn conflict_inside_lookahead_is_still_detected() {
    let body = lookahead(choice([seq([any(), any()]), any()]));
    assert!(body.arity().is_err());
}

#[test]
fn char_classes_match_expected_sets() {
    assert!(CharClass::Space.matches(' '));
    assert!(CharClass::Space.matches('\t'));
    assert!(!CharClass::Space.matches('x'));
    assert!(CharClass::Letter.matches('é'));
    assert!(!CharClass::Letter.matches('3'));
    assert!(CharClass::Digit.matches('7'));
    assert!(!CharClass::Digit.matches('x'));
    assert!(CharClass::Alnum.matches('x'));
    assert!(CharClass::Alnum.matches('4'));
    assert!(!CharClass::Alnum.matches('+'));
}

#[test]
fn expr_serializes_as_tagged_json() {
    let body = seq([terminal("+"), apply("MulExp")]);
    let json = serde_json::to_string(&body).unwrap();
    assert_eq!(
        json,
        r#"{"Seq":[{"Terminal":"+"},{"Apply":{"name":"MulExp"}}]}"#
    );
}
