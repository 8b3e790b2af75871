use crate::Grammar;
use crate::error::GrammarError;

#[test]
fn grammar_from_json_description() {
    let g = Grammar::from_json(
        r#"{
            "name": "Greeting",
            "rules": {
                "Start": { "body": { "Seq": [
                    { "Apply": { "name": "word" } },
                    { "Terminal": "!" }
                ] } },
                "word": {
                    "body": { "Plus": { "Class": "Letter" } },
                    "description": "a word"
                }
            }
        }"#,
    )
    .unwrap();
    assert_eq!(g.name(), "Greeting");
    assert_eq!(g.default_start_name(), "Start");
    assert_eq!(g.get("word").unwrap().description.as_deref(), Some("a word"));
    assert_eq!(g.get("word").unwrap().arity, 1);
}

#[test]
fn json_start_override_is_applied() {
    let g = Grammar::from_json(
        r#"{
            "name": "G",
            "start": "b",
            "rules": {
                "a": { "body": { "Terminal": "x" } },
                "b": { "body": { "Terminal": "y" } }
            }
        }"#,
    )
    .unwrap();
    assert_eq!(g.default_start_name(), "b");
}

#[test]
fn malformed_json_is_a_json_error() {
    let err = Grammar::from_json("{ not json").unwrap_err();
    assert!(matches!(err, GrammarError::Json(_)));
}

#[test]
fn json_grammar_still_goes_through_validation() {
    // Arity mismatch must surface even when the description comes from JSON.
    let err = Grammar::from_json(
        r#"{
            "name": "G",
            "rules": {
                "a": { "body": { "Choice": [
                    { "Seq": [ { "Terminal": "x" }, { "Terminal": "y" } ] },
                    { "Terminal": "z" }
                ] } }
            }
        }"#,
    )
    .unwrap_err();
    assert!(matches!(err, GrammarError::ArityMismatch { .. }));
}
