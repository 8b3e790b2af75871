//! Tracing instrumentation for the matcher.
//!
//! The tracer is a zero-cost abstraction: with `NoopTracer` every call is an
//! `#[inline(always)]` empty function and the compiler eliminates the calls
//! entirely. `PrintTracer` keeps its own indentation state and buffers output,
//! so no tracing state leaks into the matcher itself.

use std::fmt::Write as _;

/// How much `PrintTracer` shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Rule enter/exit and memo hits.
    #[default]
    Default,
    /// Also terminal attempts.
    Verbose,
}

/// Matcher instrumentation. Methods receive raw data the matcher already has;
/// formatting happens in the implementation.
pub trait Tracer {
    /// Called when a rule application starts evaluating (memo miss).
    fn trace_enter_rule(&mut self, rule: &str, pos: usize);

    /// Called when a rule application finishes evaluating.
    fn trace_exit_rule(&mut self, rule: &str, pos: usize, matched: bool);

    /// Called when a rule application is answered from the memo table.
    fn trace_memo_hit(&mut self, rule: &str, pos: usize, matched: bool);

    /// Called after a terminal or primitive attempt.
    fn trace_terminal(&mut self, literal: &str, pos: usize, matched: bool);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_enter_rule(&mut self, _rule: &str, _pos: usize) {}

    #[inline(always)]
    fn trace_exit_rule(&mut self, _rule: &str, _pos: usize, _matched: bool) {}

    #[inline(always)]
    fn trace_memo_hit(&mut self, _rule: &str, _pos: usize, _matched: bool) {}

    #[inline(always)]
    fn trace_terminal(&mut self, _literal: &str, _pos: usize, _matched: bool) {}
}

/// Buffers an indented trace of the match, one event per line.
#[derive(Debug, Default)]
pub struct PrintTracer {
    verbosity: Verbosity,
    depth: usize,
    out: String,
}

impl PrintTracer {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            ..Self::default()
        }
    }

    /// The buffered trace so far.
    pub fn output(&self) -> &str {
        &self.out
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }
}

impl Tracer for PrintTracer {
    fn trace_enter_rule(&mut self, rule: &str, pos: usize) {
        let line = format!("{rule} @ {pos}");
        self.line(&line);
        self.depth += 1;
    }

    fn trace_exit_rule(&mut self, rule: &str, _pos: usize, matched: bool) {
        self.depth = self.depth.saturating_sub(1);
        let line = format!("{} {rule}", if matched { "ok" } else { "fail" });
        self.line(&line);
    }

    fn trace_memo_hit(&mut self, rule: &str, pos: usize, matched: bool) {
        let line = format!(
            "memo {rule} @ {pos} -> {}",
            if matched { "ok" } else { "fail" }
        );
        self.line(&line);
    }

    fn trace_terminal(&mut self, literal: &str, pos: usize, matched: bool) {
        if self.verbosity != Verbosity::Verbose {
            return;
        }
        let mut line = String::new();
        let _ = write!(
            line,
            "{} {literal:?} @ {pos}",
            if matched { "eat" } else { "miss" }
        );
        self.line(&line);
    }
}
