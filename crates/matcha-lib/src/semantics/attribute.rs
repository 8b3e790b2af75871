//! Attributes: like operations, but memoized per node.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use matcha_engine::{Cst, CstId, MatchResult, NodeId, NodeKind};
use matcha_grammar::Grammar;

use super::check_action_arity;
use super::error::SemanticsError;

type Action<T> = Box<dyn Fn(&AttrCx<'_, '_, T>, &[NodeId]) -> Result<T, SemanticsError>>;
type LeafAction<T> = Box<dyn Fn(&AttrCx<'_, '_, T>) -> Result<T, SemanticsError>>;

/// Dispatch context for attribute actions. Recursion through [`AttrCx::eval`]
/// goes through the memo table, so shared subtrees are computed once.
pub struct AttrCx<'c, 'g, T> {
    attr: &'c Attribute<T>,
    cst: &'c Cst<'g>,
    node: NodeId,
}

impl<'c, 'g, T> AttrCx<'c, 'g, T> {
    pub fn eval(&self, node: NodeId) -> Result<Rc<T>, SemanticsError> {
        self.attr.eval_node(self.cst, node)
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn text(&self, node: NodeId) -> &'c str {
        self.cst.text(node)
    }

    pub fn cst(&self) -> &'c Cst<'g> {
        self.cst
    }
}

/// A memoized per-node computation.
///
/// Values are cached by `(CstId, NodeId)`: the first read of a node computes,
/// every later read returns the identical `Rc`. Actions must therefore be
/// deterministic over the node's subtree. The memo table is a `RefCell` side
/// table, so an `Attribute` is single-threaded.
pub struct Attribute<T> {
    name: String,
    actions: HashMap<String, Action<T>>,
    nonterminal: Option<Action<T>>,
    terminal: Option<LeafAction<T>>,
    iteration: Option<Action<T>>,
    memo: RefCell<HashMap<(CstId, NodeId), Rc<T>>>,
}

impl<T> std::fmt::Debug for Attribute<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<T> Attribute<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The attribute's value at the root of a successful match.
    pub fn at(&self, result: &MatchResult<'_>) -> Result<Rc<T>, SemanticsError> {
        let cst = result.cst().ok_or(SemanticsError::NotAMatch)?;
        self.of(cst)
    }

    pub fn of(&self, cst: &Cst<'_>) -> Result<Rc<T>, SemanticsError> {
        self.eval_node(cst, cst.root())
    }

    fn eval_node(&self, cst: &Cst<'_>, node: NodeId) -> Result<Rc<T>, SemanticsError> {
        let key = (cst.id(), node);
        if let Some(hit) = self.memo.borrow().get(&key) {
            return Ok(Rc::clone(hit));
        }
        // Not borrowed while the action runs: actions recurse through here.
        let value = self.compute(cst, node)?;
        self.memo
            .borrow_mut()
            .insert(key, Rc::clone(&value));
        Ok(value)
    }

    /// Same dispatch chain as an operation. Single-child delegation returns
    /// the child's memoized `Rc`, so a chain rule shares its child's value.
    fn compute(&self, cst: &Cst<'_>, node: NodeId) -> Result<Rc<T>, SemanticsError> {
        let cx = AttrCx {
            attr: self,
            cst,
            node,
        };
        match cst.kind(node) {
            NodeKind::Nonterminal(rule) => {
                let rule_name = cst.grammar().rule_name(rule);
                if let Some(action) = self.actions.get(rule_name) {
                    return Ok(Rc::new(action(&cx, cst.children(node))?));
                }
                if let Some(action) = &self.nonterminal {
                    return Ok(Rc::new(action(&cx, cst.children(node))?));
                }
                if let [only] = cst.children(node) {
                    return self.eval_node(cst, *only);
                }
                Err(self.missing(rule_name))
            }
            NodeKind::Iter => {
                if let Some(action) = &self.iteration {
                    return Ok(Rc::new(action(&cx, cst.children(node))?));
                }
                if let [only] = cst.children(node) {
                    return self.eval_node(cst, *only);
                }
                Err(self.missing("_iter"))
            }
            NodeKind::Terminal => match &self.terminal {
                Some(action) => Ok(Rc::new(action(&cx)?)),
                None => Err(self.missing("_terminal")),
            },
        }
    }

    fn missing(&self, rule: &str) -> SemanticsError {
        SemanticsError::MissingAction {
            operation: self.name.clone(),
            rule: rule.to_string(),
        }
    }
}

/// Collects actions for one attribute; `build()` validates the table against
/// the grammar.
pub struct AttributeBuilder<'g, T> {
    grammar: &'g Grammar,
    name: String,
    actions: Vec<(String, usize, Action<T>)>,
    nonterminal: Option<Action<T>>,
    terminal: Option<LeafAction<T>>,
    iteration: Option<Action<T>>,
}

impl<'g, T> AttributeBuilder<'g, T> {
    pub(crate) fn new(grammar: &'g Grammar, name: &str) -> Self {
        Self {
            grammar,
            name: name.to_string(),
            actions: Vec::new(),
            nonterminal: None,
            terminal: None,
            iteration: None,
        }
    }

    pub fn action(
        mut self,
        rule: &str,
        arity: usize,
        f: impl Fn(&AttrCx<'_, '_, T>, &[NodeId]) -> Result<T, SemanticsError> + 'static,
    ) -> Self {
        self.actions.push((rule.to_string(), arity, Box::new(f)));
        self
    }

    pub fn nonterminal(
        mut self,
        f: impl Fn(&AttrCx<'_, '_, T>, &[NodeId]) -> Result<T, SemanticsError> + 'static,
    ) -> Self {
        self.nonterminal = Some(Box::new(f));
        self
    }

    pub fn terminal(
        mut self,
        f: impl Fn(&AttrCx<'_, '_, T>) -> Result<T, SemanticsError> + 'static,
    ) -> Self {
        self.terminal = Some(Box::new(f));
        self
    }

    pub fn iteration(
        mut self,
        f: impl Fn(&AttrCx<'_, '_, T>, &[NodeId]) -> Result<T, SemanticsError> + 'static,
    ) -> Self {
        self.iteration = Some(Box::new(f));
        self
    }

    pub fn build(self) -> Result<Attribute<T>, SemanticsError> {
        let mut actions = HashMap::with_capacity(self.actions.len());
        for (rule, declared, f) in self.actions {
            check_action_arity(self.grammar, &self.name, &rule, declared)?;
            actions.insert(rule, f);
        }
        Ok(Attribute {
            name: self.name,
            actions,
            nonterminal: self.nonterminal,
            terminal: self.terminal,
            iteration: self.iteration,
            memo: RefCell::new(HashMap::new()),
        })
    }
}
