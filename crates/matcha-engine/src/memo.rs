//! Position-keyed memoization table (the packrat core).
//!
//! Every `(rule, position)` application is computed at most once per match
//! call, which bounds total work to O(rules x input length) despite
//! unrestricted backtracking. A `Busy` entry marks an application still being
//! computed; re-entering one means the grammar is left-recursive.
//!
//! Entries carry the failures the application recorded alongside its outcome,
//! so a memo hit can replay them and diagnostics stay identical to a fresh
//! evaluation.

use std::collections::HashMap;

use matcha_grammar::RuleId;

use crate::cst::NodeId;
use crate::failure::Failure;

/// Cached outcome of a rule application at a position.
#[derive(Debug, Clone)]
pub(crate) enum MemoEntry {
    /// Still being computed; hitting this is infinite left recursion.
    Busy,
    Done {
        /// `Some((node, end))` on success, `None` on failure.
        outcome: Option<(NodeId, usize)>,
        /// Failures the application recorded, replayed on memo hits.
        failures: Vec<Failure>,
    },
}

#[derive(Debug, Default)]
pub(crate) struct MemoTable {
    map: HashMap<(RuleId, usize), MemoEntry>,
}

impl MemoTable {
    pub fn get(&self, rule: RuleId, pos: usize) -> Option<MemoEntry> {
        self.map.get(&(rule, pos)).cloned()
    }

    pub fn mark_busy(&mut self, rule: RuleId, pos: usize) {
        self.map.insert((rule, pos), MemoEntry::Busy);
    }

    pub fn complete(
        &mut self,
        rule: RuleId,
        pos: usize,
        outcome: Option<(NodeId, usize)>,
        failures: Vec<Failure>,
    ) {
        self.map.insert((rule, pos), MemoEntry::Done { outcome, failures });
    }
}
