use crate::failure::{FailureKind, FailureTracker};
use crate::report::ReportPrinter;

#[test]
fn plain_render_names_position_and_expectation() {
    let source = "(1+x)";
    let mut t = FailureTracker::new();
    t.record(3, FailureKind::Description("a number".to_string()), false);
    let report = t.into_report();

    let out = ReportPrinter::new(&report, source).render();
    assert!(out.contains("Line 1, col 4: expected a number"), "{out}");
    assert!(out.contains("(1+x)"), "{out}");
    assert!(out.contains('^'), "{out}");
    // Plain rendering carries no ANSI escapes.
    assert!(!out.contains('\x1b'), "{out}");
}

#[test]
fn path_shows_up_in_the_origin_line() {
    let source = "x";
    let mut t = FailureTracker::new();
    t.record(0, FailureKind::Terminal("y".to_string()), false);
    let report = t.into_report();

    let out = ReportPrinter::new(&report, source)
        .path("pairs.txt")
        .render();
    assert!(out.contains("pairs.txt"), "{out}");
}

#[test]
fn failure_at_end_of_input_still_renders() {
    let source = "(1+2";
    let mut t = FailureTracker::new();
    t.record(4, FailureKind::Terminal(")".to_string()), false);
    let report = t.into_report();

    let out = ReportPrinter::new(&report, source).render();
    assert!(out.contains("expected \")\""), "{out}");
}

#[test]
fn colored_render_emits_escapes() {
    let source = "z";
    let mut t = FailureTracker::new();
    t.record(0, FailureKind::Terminal("a".to_string()), false);
    let report = t.into_report();

    let out = ReportPrinter::new(&report, source).colored(true).render();
    assert!(out.contains('\x1b'), "{out}");
}
