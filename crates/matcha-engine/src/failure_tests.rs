use crate::failure::{Failure, FailureKind, FailureTracker, line_col};

fn terminal(text: &str) -> FailureKind {
    FailureKind::Terminal(text.to_string())
}

fn described(text: &str) -> FailureKind {
    FailureKind::Description(text.to_string())
}

#[test]
fn only_the_rightmost_position_is_retained() {
    let mut t = FailureTracker::new();
    t.record(0, terminal("a"), false);
    t.record(3, terminal("b"), false);
    assert_eq!(t.rightmost(), 3);
    // Earlier positions no longer matter.
    t.record(1, terminal("c"), false);

    let report = t.into_report();
    assert_eq!(report.pos(), 3);
    assert_eq!(
        report.failures(),
        &[Failure {
            pos: 3,
            kind: terminal("b"),
            fluffy: false,
        }]
    );
}

#[test]
fn entries_at_the_same_position_are_deduplicated() {
    let mut t = FailureTracker::new();
    t.record(2, terminal("x"), false);
    t.record(2, terminal("y"), false);
    t.record(2, terminal("x"), false);
    assert_eq!(t.into_report().failures().len(), 2);
}

#[test]
fn recording_is_silenced_while_paused() {
    let mut t = FailureTracker::new();
    t.pause();
    t.pause();
    t.record(5, terminal("a"), false);
    t.resume();
    t.record(5, terminal("b"), false);
    t.resume();
    t.record(5, terminal("c"), false);

    let report = t.into_report();
    let kinds: Vec<&FailureKind> = report.failures().iter().map(|f| &f.kind).collect();
    assert_eq!(kinds, [&terminal("c")]);
}

#[test]
fn capture_collects_only_failures_that_escape() {
    let mut t = FailureTracker::new();
    t.begin_capture();
    t.record(1, terminal("a"), false);
    // Deeper pause: internal to a sub-expression, never escapes.
    t.pause();
    t.record(2, terminal("b"), false);
    t.resume();
    assert_eq!(
        t.end_capture(),
        vec![Failure {
            pos: 1,
            kind: terminal("a"),
            fluffy: false,
        }]
    );
}

#[test]
fn capture_inside_a_pause_still_sees_its_own_records() {
    let mut t = FailureTracker::new();
    t.pause();
    t.begin_capture();
    t.record(3, described("a number"), false);
    let captured = t.end_capture();
    t.resume();

    assert_eq!(captured.len(), 1);
    // The record itself was silenced.
    assert!(t.into_report().failures().is_empty());
}

#[test]
fn replay_respects_pause_and_rightmost_filtering() {
    let captured = vec![
        Failure {
            pos: 1,
            kind: terminal("a"),
            fluffy: false,
        },
        Failure {
            pos: 3,
            kind: terminal("b"),
            fluffy: false,
        },
    ];

    let mut t = FailureTracker::new();
    t.record(3, terminal("c"), false);
    t.replay(&captured);
    // pos 1 is behind the rightmost failure and is dropped.
    let report = t.into_report();
    assert_eq!(report.pos(), 3);
    assert_eq!(report.failures().len(), 2);

    let mut silenced = FailureTracker::new();
    silenced.pause();
    silenced.replay(&captured);
    silenced.resume();
    assert!(silenced.into_report().failures().is_empty());
}

#[test]
fn report_lists_described_failures_before_fluffy_ones() {
    let mut t = FailureTracker::new();
    t.record(4, FailureKind::Code("a digit".to_string()), true);
    t.record(4, described("an identifier"), false);
    t.record(4, FailureKind::Code("a letter".to_string()), true);

    let report = t.into_report();
    let kinds: Vec<&FailureKind> = report.failures().iter().map(|f| &f.kind).collect();
    assert_eq!(
        kinds,
        [
            &described("an identifier"),
            &FailureKind::Code("a digit".to_string()),
            &FailureKind::Code("a letter".to_string()),
        ]
    );
}

#[test]
fn expected_summary_forms() {
    let mut one = FailureTracker::new();
    one.record(0, terminal("("), false);
    assert_eq!(one.into_report().expected_summary(), "expected \"(\"");

    let mut two = FailureTracker::new();
    two.record(0, terminal("("), false);
    two.record(0, described("a number"), false);
    assert_eq!(
        two.into_report().expected_summary(),
        "expected \"(\" or a number"
    );

    let mut three = FailureTracker::new();
    three.record(0, terminal("("), false);
    three.record(0, terminal(")"), false);
    three.record(0, described("a number"), false);
    assert_eq!(
        three.into_report().expected_summary(),
        "expected \"(\", \")\", or a number"
    );

    let empty = FailureTracker::new();
    assert_eq!(
        empty.into_report().expected_summary(),
        "expected nothing (no failure details recorded)"
    );
}

#[test]
fn message_includes_line_and_column() {
    let input = "ab\ncde";
    let mut t = FailureTracker::new();
    t.record(4, terminal("x"), false);
    assert_eq!(
        t.into_report().message(input),
        "Line 2, col 2: expected \"x\""
    );
}

#[test]
fn line_col_is_one_based() {
    let input = "ab\ncd\ne";
    assert_eq!(line_col(input, 0), (1, 1));
    assert_eq!(line_col(input, 1), (1, 2));
    assert_eq!(line_col(input, 3), (2, 1));
    assert_eq!(line_col(input, 6), (3, 1));
    // Past the end clamps to the last position scanned.
    assert_eq!(line_col(input, 99), (3, 2));
}
