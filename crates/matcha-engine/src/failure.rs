//! Parse-failure model: what was expected, and where.
//!
//! The tracker retains only failures at the rightmost position reached across
//! the whole match attempt; that position is the best approximation of "what
//! the user almost typed correctly". Entries are deduplicated, and fluffy
//! (auto-generated) entries rank below described ones when reported.

use std::fmt;

use indexmap::IndexSet;

/// What kind of expectation failed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// A literal terminal.
    Terminal(String),
    /// A primitive with a generated description ("any character", "a digit").
    Code(String),
    /// A rule's explicit description ("an identifier").
    Description(String),
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminal(text) => write!(f, "\"{text}\""),
            Self::Code(desc) | Self::Description(desc) => f.write_str(desc),
        }
    }
}

/// A single failed expectation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Failure {
    pub pos: usize,
    pub kind: FailureKind,
    /// Synthesized without an explicit rule description; ranked below
    /// described failures in diagnostics.
    pub fluffy: bool,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

/// Records failures during one match attempt, keeping only the rightmost.
#[derive(Debug, Default)]
pub struct FailureTracker {
    pos: usize,
    entries: IndexSet<Failure>,
    /// Recording is silenced while skipping whitespace and inside negative
    /// lookahead; nested, so a counter rather than a flag.
    paused: u32,
    /// One frame per rule application being memoized; collects the failures
    /// that escape it so memo hits can replay them.
    captures: Vec<Capture>,
}

#[derive(Debug)]
struct Capture {
    /// Pause depth when the frame was opened. Records made under a deeper
    /// pause are internal to some sub-expression and never escape.
    base: u32,
    failures: IndexSet<Failure>,
}

impl FailureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rightmost position a failure was recorded at.
    pub fn rightmost(&self) -> usize {
        self.pos
    }

    pub fn record(&mut self, pos: usize, kind: FailureKind, fluffy: bool) {
        let failure = Failure { pos, kind, fluffy };
        for capture in &mut self.captures {
            if self.paused <= capture.base {
                capture.failures.insert(failure.clone());
            }
        }
        if self.paused > 0 || pos < self.pos {
            return;
        }
        if pos > self.pos {
            self.pos = pos;
            self.entries.clear();
        }
        self.entries.insert(failure);
    }

    pub fn pause(&mut self) {
        self.paused += 1;
    }

    pub fn resume(&mut self) {
        debug_assert!(self.paused > 0, "unbalanced resume");
        self.paused = self.paused.saturating_sub(1);
    }

    /// Open a capture frame: until the matching [`end_capture`](Self::end_capture),
    /// every failure that escapes the current pause depth is collected.
    pub fn begin_capture(&mut self) {
        self.captures.push(Capture {
            base: self.paused,
            failures: IndexSet::new(),
        });
    }

    pub fn end_capture(&mut self) -> Vec<Failure> {
        let capture = self.captures.pop().expect("unbalanced capture");
        capture.failures.into_iter().collect()
    }

    /// Re-record previously captured failures, subject to the current pause
    /// depth and rightmost filtering. This is what makes memoization invisible
    /// in diagnostics: a memo hit replays what evaluation would have recorded.
    pub fn replay(&mut self, failures: &[Failure]) {
        for failure in failures {
            self.record(failure.pos, failure.kind.clone(), failure.fluffy);
        }
    }

    /// Freeze into a report: described entries first, fluffy ones after.
    pub fn into_report(self) -> FailureReport {
        let (described, fluffy): (Vec<_>, Vec<_>) =
            self.entries.into_iter().partition(|f| !f.fluffy);
        let mut failures = described;
        failures.extend(fluffy);
        FailureReport {
            pos: self.pos,
            failures,
        }
    }
}

/// The consumer-facing outcome of a failed match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    pos: usize,
    failures: Vec<Failure>,
}

impl FailureReport {
    /// Rightmost position the matcher reached.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Deduplicated failures at [`pos`](Self::pos), non-fluffy first.
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// `expected "x", "y", or an identifier` -- the non-fluffy/fluffy order of
    /// [`failures`](Self::failures) is preserved.
    pub fn expected_summary(&self) -> String {
        match self.failures.as_slice() {
            [] => "expected nothing (no failure details recorded)".to_string(),
            [one] => format!("expected {one}"),
            [a, b] => format!("expected {a} or {b}"),
            all => {
                let head = all[..all.len() - 1]
                    .iter()
                    .map(Failure::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("expected {head}, or {}", all[all.len() - 1])
            }
        }
    }

    /// One-line human message: `Line 2, col 5: expected "+" or a digit`.
    pub fn message(&self, input: &str) -> String {
        let (line, col) = line_col(input, self.pos);
        format!("Line {line}, col {col}: {}", self.expected_summary())
    }
}

/// 1-based line and column of a byte position.
pub fn line_col(input: &str, pos: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (i, c) in input.char_indices() {
        if i >= pos {
            break;
        }
        if c == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}
