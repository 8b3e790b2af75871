//! Recursive-descent PEG evaluation with memoization.
//!
//! Ordered choice commits to the first succeeding alternative; repetition is
//! greedy and never backtracks internally; lookahead restores position and
//! contributes no node. Syntactic rules (uppercase names) interleave the
//! grammar's `space` rule through their bodies; lexical rules never do.
//!
//! All per-call state (memo table, failure tracker, node arena) lives in a
//! `MatchState` that is discarded when `match` returns, so one `Grammar` can
//! serve any number of concurrent match calls.

use std::sync::Arc;

use thiserror::Error;

use matcha_grammar::{Expr, Grammar, RuleId, RuleKind};

use crate::cst::{Cst, NodeData, NodeId, NodeKind, Span};
use crate::failure::{FailureKind, FailureReport, FailureTracker};
use crate::memo::{MemoEntry, MemoTable};
use crate::trace::{NoopTracer, Tracer};

/// Fatal configuration errors at match time.
///
/// Ordinary parse failures are not errors; they come back as a
/// [`FailureReport`] inside [`MatchResult`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// The requested start rule is not defined by the grammar.
    #[error("unknown start rule `{name}`")]
    UnknownStartRule { name: String },

    /// A rule re-entered itself at the same position without consuming
    /// input. Unsupported grammar shape; reported instead of recursing
    /// without bound.
    #[error("left recursion detected in rule `{rule}` at position {pos}")]
    LeftRecursion { rule: String, pos: usize },
}

/// Outcome of one top-level match call.
#[derive(Debug, Clone)]
pub struct MatchResult<'g> {
    input: Arc<str>,
    outcome: Outcome<'g>,
}

#[derive(Debug, Clone)]
enum Outcome<'g> {
    Matched(Cst<'g>),
    Failed(FailureReport),
}

impl<'g> MatchResult<'g> {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, Outcome::Matched(_))
    }

    pub fn failed(&self) -> bool {
        !self.succeeded()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cst(&self) -> Option<&Cst<'g>> {
        match &self.outcome {
            Outcome::Matched(cst) => Some(cst),
            Outcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureReport> {
        match &self.outcome {
            Outcome::Matched(_) => None,
            Outcome::Failed(report) => Some(report),
        }
    }

    /// One-line failure message, `None` on success.
    pub fn failure_message(&self) -> Option<String> {
        self.failure().map(|report| report.message(&self.input))
    }
}

/// Executes a grammar against input text.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'g> {
    grammar: &'g Grammar,
}

struct MatchState<'s> {
    input: &'s str,
    memo: MemoTable,
    failures: FailureTracker,
    nodes: Vec<NodeData>,
    tracer: &'s mut dyn Tracer,
}

impl<'s> MatchState<'s> {
    fn push(&mut self, node: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn span_of(&self, node: NodeId) -> Span {
        self.nodes[node.index()].span
    }
}

impl<'g> Matcher<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self { grammar }
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    /// Match the entire input against the grammar's default start rule.
    pub fn match_input(&self, input: &str) -> Result<MatchResult<'g>, MatchError> {
        self.match_rule(input, self.grammar.default_start_name())
    }

    /// Match the entire input against a named start rule.
    pub fn match_rule(&self, input: &str, start: &str) -> Result<MatchResult<'g>, MatchError> {
        let mut tracer = NoopTracer;
        self.run(input, start, true, &mut tracer)
    }

    /// Like [`match_input`](Self::match_input), with tracing.
    pub fn match_input_traced(
        &self,
        input: &str,
        tracer: &mut dyn Tracer,
    ) -> Result<MatchResult<'g>, MatchError> {
        self.run(input, self.grammar.default_start_name(), true, tracer)
    }

    /// Could `rule` match starting at the beginning of `input`? Does not
    /// require full consumption; this is a prefix probe, not a partial match.
    pub fn probe(&self, input: &str, rule: &str) -> Result<bool, MatchError> {
        let mut tracer = NoopTracer;
        let result = self.run(input, rule, false, &mut tracer)?;
        Ok(result.succeeded())
    }

    fn run(
        &self,
        input: &str,
        start: &str,
        require_end: bool,
        tracer: &mut dyn Tracer,
    ) -> Result<MatchResult<'g>, MatchError> {
        let start_rule = self
            .grammar
            .rule_id(start)
            .ok_or_else(|| MatchError::UnknownStartRule {
                name: start.to_string(),
            })?;
        let syntactic = self.grammar.rule(start_rule).kind == RuleKind::Syntactic;

        let mut st = MatchState {
            input,
            memo: MemoTable::default(),
            failures: FailureTracker::new(),
            nodes: Vec::new(),
            tracer,
        };

        let input_arc: Arc<str> = Arc::from(input);
        let outcome = match self.apply(&mut st, start_rule, 0)? {
            Some((root, end)) => {
                let mut end = end;
                if require_end && syntactic {
                    end = self.skip_spaces(&mut st, end)?;
                }
                if !require_end || end == input.len() {
                    Outcome::Matched(Cst::from_parts(
                        self.grammar,
                        input_arc.clone(),
                        st.nodes,
                        root,
                    ))
                } else {
                    st.failures
                        .record(end, FailureKind::Code("end of input".to_string()), true);
                    Outcome::Failed(st.failures.into_report())
                }
            }
            None => Outcome::Failed(st.failures.into_report()),
        };

        Ok(MatchResult {
            input: input_arc,
            outcome,
        })
    }

    /// Apply a rule at a position, through the memo table.
    fn apply(
        &self,
        st: &mut MatchState<'_>,
        rule_id: RuleId,
        pos: usize,
    ) -> Result<Option<(NodeId, usize)>, MatchError> {
        if let Some(entry) = st.memo.get(rule_id, pos) {
            return match entry {
                MemoEntry::Busy => Err(MatchError::LeftRecursion {
                    rule: self.grammar.rule_name(rule_id).to_string(),
                    pos,
                }),
                MemoEntry::Done { outcome, failures } => {
                    st.tracer
                        .trace_memo_hit(self.grammar.rule_name(rule_id), pos, outcome.is_some());
                    // Replay what the application recorded, so the failure
                    // set is the same whether this was a hit or a miss.
                    st.failures.replay(&failures);
                    Ok(outcome)
                }
            };
        }
        st.memo.mark_busy(rule_id, pos);
        st.tracer.trace_enter_rule(self.grammar.rule_name(rule_id), pos);
        st.failures.begin_capture();

        let rule = self.grammar.rule(rule_id);
        let mut children = Vec::new();
        // A described rule speaks for its whole body: inner failures are
        // silenced and replaced by the description on failure.
        if rule.description.is_some() {
            st.failures.pause();
        }
        let body_result = self.eval(st, &rule.body, pos, rule.kind, &mut children);
        if rule.description.is_some() {
            st.failures.resume();
        }
        let outcome = match body_result? {
            Some(end) => {
                // Anchor the span on the children so nonterminal text excludes
                // the leading whitespace a syntactic body may have skipped.
                let start = children.first().map_or(pos, |&c| st.span_of(c).start);
                let stop = children.last().map_or(end, |&c| st.span_of(c).end);
                let node = st.push(NodeData {
                    kind: NodeKind::Nonterminal(rule_id),
                    span: Span { start, end: stop },
                    children,
                });
                Some((node, end))
            }
            None => {
                if let Some(desc) = &rule.description {
                    st.failures
                        .record(pos, FailureKind::Description(desc.clone()), rule.builtin);
                }
                None
            }
        };

        let recorded = st.failures.end_capture();
        st.memo.complete(rule_id, pos, outcome, recorded);
        st.tracer
            .trace_exit_rule(self.grammar.rule_name(rule_id), pos, outcome.is_some());
        Ok(outcome)
    }

    /// Evaluate one expression. Appends produced nodes to `out`; on failure
    /// `out` is left exactly as it was and the new position is `None`.
    fn eval(
        &self,
        st: &mut MatchState<'_>,
        expr: &Expr,
        pos: usize,
        mode: RuleKind,
        out: &mut Vec<NodeId>,
    ) -> Result<Option<usize>, MatchError> {
        match expr {
            Expr::Terminal(literal) => {
                let pos = self.pre_skip(st, pos, mode)?;
                if st.input[pos..].starts_with(literal.as_str()) {
                    let end = pos + literal.len();
                    st.tracer.trace_terminal(literal, pos, true);
                    out.push(st.push(NodeData {
                        kind: NodeKind::Terminal,
                        span: Span { start: pos, end },
                        children: Vec::new(),
                    }));
                    Ok(Some(end))
                } else {
                    st.tracer.trace_terminal(literal, pos, false);
                    st.failures
                        .record(pos, FailureKind::Terminal(literal.clone()), false);
                    Ok(None)
                }
            }

            Expr::Class(class) => {
                let pos = self.pre_skip(st, pos, mode)?;
                self.eval_char(st, pos, |c| class.matches(c), class.description(), out)
            }

            Expr::Range(lo, hi) => {
                let pos = self.pre_skip(st, pos, mode)?;
                let description = format!("a character in {lo:?}..{hi:?}");
                self.eval_char(st, pos, |c| (*lo..=*hi).contains(&c), &description, out)
            }

            Expr::Any => {
                let pos = self.pre_skip(st, pos, mode)?;
                self.eval_char(st, pos, |_| true, "any character", out)
            }

            Expr::Apply { name, .. } => {
                let pos = self.pre_skip(st, pos, mode)?;
                let rule_id = self
                    .grammar
                    .rule_id(name)
                    .expect("rule references are validated at grammar build");
                match self.apply(st, rule_id, pos)? {
                    Some((node, end)) => {
                        out.push(node);
                        Ok(Some(end))
                    }
                    None => Ok(None),
                }
            }

            Expr::Seq(items) => {
                let mark = out.len();
                let mut p = pos;
                for item in items {
                    match self.eval(st, item, p, mode, out)? {
                        Some(end) => p = end,
                        None => {
                            out.truncate(mark);
                            return Ok(None);
                        }
                    }
                }
                Ok(Some(p))
            }

            Expr::Choice(alts) => {
                for alt in alts {
                    let mark = out.len();
                    match self.eval(st, alt, pos, mode, out)? {
                        Some(end) => return Ok(Some(end)),
                        None => out.truncate(mark),
                    }
                }
                Ok(None)
            }

            Expr::Star(inner) => {
                let mut kids = Vec::new();
                let end = self.eval_repeat(st, inner, pos, mode, &mut kids)?;
                out.push(self.push_iter(st, pos, end, kids));
                Ok(Some(end))
            }

            Expr::Plus(inner) => {
                let mut kids = Vec::new();
                match self.eval(st, inner, pos, mode, &mut kids)? {
                    Some(first_end) => {
                        let end = self.eval_repeat(st, inner, first_end, mode, &mut kids)?;
                        out.push(self.push_iter(st, pos, end, kids));
                        Ok(Some(end))
                    }
                    None => Ok(None),
                }
            }

            Expr::Opt(inner) => {
                let mut kids = Vec::new();
                let end = match self.eval(st, inner, pos, mode, &mut kids)? {
                    Some(end) => end,
                    None => pos,
                };
                out.push(self.push_iter(st, pos, end, kids));
                Ok(Some(end))
            }

            Expr::Lookahead(inner) => {
                let mut scratch = Vec::new();
                match self.eval(st, inner, pos, mode, &mut scratch)? {
                    Some(_) => Ok(Some(pos)),
                    None => Ok(None),
                }
            }

            Expr::Not(inner) => {
                // A success inside `~x` is the failure; the inner expression's
                // own expectations are noise and stay silenced.
                st.failures.pause();
                let mut scratch = Vec::new();
                let inner_result = self.eval(st, inner, pos, mode, &mut scratch);
                st.failures.resume();
                match inner_result? {
                    Some(_) => {
                        st.failures
                            .record(pos, FailureKind::Code(self.not_description(inner)), false);
                        Ok(None)
                    }
                    None => Ok(Some(pos)),
                }
            }
        }
    }

    /// Match a single character satisfying `pred`. Failures are fluffy: these
    /// are the low-level expectations a rule description should outrank.
    fn eval_char(
        &self,
        st: &mut MatchState<'_>,
        pos: usize,
        pred: impl Fn(char) -> bool,
        description: &str,
        out: &mut Vec<NodeId>,
    ) -> Result<Option<usize>, MatchError> {
        match st.input[pos..].chars().next() {
            Some(c) if pred(c) => {
                let end = pos + c.len_utf8();
                st.tracer.trace_terminal(description, pos, true);
                out.push(st.push(NodeData {
                    kind: NodeKind::Terminal,
                    span: Span { start: pos, end },
                    children: Vec::new(),
                }));
                Ok(Some(end))
            }
            _ => {
                st.tracer.trace_terminal(description, pos, false);
                st.failures
                    .record(pos, FailureKind::Code(description.to_string()), true);
                Ok(None)
            }
        }
    }

    /// What a satisfied negative lookahead reports: the input held exactly
    /// the thing `~x` excludes.
    fn not_description(&self, inner: &Expr) -> String {
        let excluded = match inner {
            Expr::Terminal(literal) => format!("{literal:?}"),
            Expr::Class(class) => class.description().to_string(),
            Expr::Any => "any character".to_string(),
            Expr::Apply { name, .. } => match self.grammar.get(name) {
                Some(rule) => rule
                    .description
                    .clone()
                    .unwrap_or_else(|| format!("`{name}`")),
                None => format!("`{name}`"),
            },
            _ => "the excluded pattern".to_string(),
        };
        format!("not {excluded}")
    }

    /// Greedy repetition tail: match `inner` until it fails, PEG-style (no
    /// re-evaluation of fewer repetitions afterwards).
    fn eval_repeat(
        &self,
        st: &mut MatchState<'_>,
        inner: &Expr,
        pos: usize,
        mode: RuleKind,
        kids: &mut Vec<NodeId>,
    ) -> Result<usize, MatchError> {
        let mut p = pos;
        loop {
            let mark = kids.len();
            match self.eval(st, inner, p, mode, kids)? {
                // A zero-width match would repeat forever; stop instead.
                Some(end) if end > p => p = end,
                Some(_) => {
                    kids.truncate(mark);
                    break;
                }
                None => break,
            }
        }
        Ok(p)
    }

    /// Wrap one repetition's matches into a single iteration node.
    fn push_iter(&self, st: &mut MatchState<'_>, pos: usize, end: usize, kids: Vec<NodeId>) -> NodeId {
        let start = kids.first().map_or(pos, |&c| st.span_of(c).start);
        let stop = kids.last().map_or(end, |&c| st.span_of(c).end);
        st.push(NodeData {
            kind: NodeKind::Iter,
            span: Span {
                start,
                end: stop.max(start),
            },
            children: kids,
        })
    }

    fn pre_skip(
        &self,
        st: &mut MatchState<'_>,
        pos: usize,
        mode: RuleKind,
    ) -> Result<usize, MatchError> {
        match mode {
            RuleKind::Syntactic => self.skip_spaces(st, pos),
            RuleKind::Lexical => Ok(pos),
        }
    }

    /// Zero-or-more applications of the grammar's `space` rule. Their nodes
    /// are discarded and their failures never recorded.
    fn skip_spaces(&self, st: &mut MatchState<'_>, pos: usize) -> Result<usize, MatchError> {
        let space = self.grammar.space_rule();
        st.failures.pause();
        let mut p = pos;
        let result = loop {
            match self.apply(st, space, p) {
                Ok(Some((_, end))) if end > p => p = end,
                Ok(_) => break Ok(p),
                Err(e) => break Err(e),
            }
        };
        st.failures.resume();
        result
    }
}
