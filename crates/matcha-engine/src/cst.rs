//! Arena-backed concrete syntax tree.
//!
//! Nodes live in an append-only arena and are addressed by [`NodeId`]; ids
//! double as the stable identity that semantics layers key their per-node
//! memo tables on. A `Cst` is immutable once returned from the matcher.

use std::fmt::Write as _;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use matcha_grammar::{Grammar, RuleId};

/// Byte span `[start, end)` into the original input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Index of a node in its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What produced a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A successful rule application. Children count equals the rule's arity.
    Nonterminal(RuleId),
    /// Synthesized by `Star`/`Plus`/`Opt`: holds the concatenated children of
    /// every repetition, so child count varies.
    Iter,
    /// A matched terminal, char class, or `Any`. No children; its value is
    /// the consumed substring.
    Terminal,
}

/// Identity of a tree, unique per process. Lets a semantics instance detect
/// that a memoized attribute value belongs to a different tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CstId(u64);

fn next_cst_id() -> CstId {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    CstId(COUNTER.fetch_add(1, Ordering::Relaxed))
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub kind: NodeKind,
    pub span: Span,
    pub children: Vec<NodeId>,
}

/// An immutable concrete syntax tree plus the input it was matched over.
#[derive(Debug, Clone)]
pub struct Cst<'g> {
    id: CstId,
    grammar: &'g Grammar,
    input: Arc<str>,
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl<'g> Cst<'g> {
    pub(crate) fn from_parts(
        grammar: &'g Grammar,
        input: Arc<str>,
        nodes: Vec<NodeData>,
        root: NodeId,
    ) -> Self {
        Self {
            id: next_cst_id(),
            grammar,
            input,
            nodes,
            root,
        }
    }

    pub fn id(&self) -> CstId {
        self.id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    pub fn kind(&self, node: NodeId) -> NodeKind {
        self.nodes[node.index()].kind
    }

    pub fn span(&self, node: NodeId) -> Span {
        self.nodes[node.index()].span
    }

    /// The substring this node consumed.
    pub fn text(&self, node: NodeId) -> &str {
        let span = self.span(node);
        &self.input[span.start..span.end]
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.index()].children
    }

    /// Rule name for nonterminal nodes, `None` for iteration and terminal nodes.
    pub fn rule_name(&self, node: NodeId) -> Option<&'g str> {
        match self.kind(node) {
            NodeKind::Nonterminal(rule) => Some(self.grammar.rule_name(rule)),
            NodeKind::Iter | NodeKind::Terminal => None,
        }
    }

    /// Indented textual dump, one node per line. For tests and debugging.
    pub fn to_tree_string(&self) -> String {
        let mut out = String::new();
        self.write_node(&mut out, self.root, 0);
        out
    }

    fn write_node(&self, out: &mut String, node: NodeId, depth: usize) {
        let span = self.span(node);
        for _ in 0..depth {
            out.push_str("  ");
        }
        match self.kind(node) {
            NodeKind::Nonterminal(rule) => {
                let _ = writeln!(
                    out,
                    "{} [{}..{}]",
                    self.grammar.rule_name(rule),
                    span.start,
                    span.end
                );
            }
            NodeKind::Iter => {
                let _ = writeln!(out, "(iter) [{}..{}]", span.start, span.end);
            }
            NodeKind::Terminal => {
                let _ = writeln!(out, "{:?} [{}..{}]", self.text(node), span.start, span.end);
            }
        }
        for &child in self.children(node) {
            self.write_node(out, child, depth + 1);
        }
    }
}

/// Serializes the tree from the root: nonterminals as
/// `{"rule", "span", "children"}`, iteration nodes as `{"kind": "iter", ...}`,
/// terminals as `{"kind": "terminal", "text", "span"}`.
impl Serialize for Cst<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        NodeRef {
            cst: self,
            id: self.root,
        }
        .serialize(serializer)
    }
}

struct NodeRef<'a, 'g> {
    cst: &'a Cst<'g>,
    id: NodeId,
}

struct ChildrenRef<'a, 'g> {
    cst: &'a Cst<'g>,
    children: &'a [NodeId],
}

impl Serialize for NodeRef<'_, '_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let span = self.cst.span(self.id);
        let span = [span.start, span.end];
        match self.cst.kind(self.id) {
            NodeKind::Nonterminal(rule) => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("rule", self.cst.grammar().rule_name(rule))?;
                map.serialize_entry("span", &span)?;
                map.serialize_entry(
                    "children",
                    &ChildrenRef {
                        cst: self.cst,
                        children: self.cst.children(self.id),
                    },
                )?;
                map.end()
            }
            NodeKind::Iter => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("kind", "iter")?;
                map.serialize_entry("span", &span)?;
                map.serialize_entry(
                    "children",
                    &ChildrenRef {
                        cst: self.cst,
                        children: self.cst.children(self.id),
                    },
                )?;
                map.end()
            }
            NodeKind::Terminal => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("kind", "terminal")?;
                map.serialize_entry("text", self.cst.text(self.id))?;
                map.serialize_entry("span", &span)?;
                map.end()
            }
        }
    }
}

impl Serialize for ChildrenRef<'_, '_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.children.len()))?;
        for &child in self.children {
            seq.serialize_element(&NodeRef {
                cst: self.cst,
                id: child,
            })?;
        }
        seq.end()
    }
}
