//! Operations: named tree-walking computations, re-evaluated on every call.

use std::collections::HashMap;

use matcha_engine::{Cst, MatchResult, NodeId, NodeKind};
use matcha_grammar::Grammar;

use super::check_action_arity;
use super::error::SemanticsError;

type Action<T, A> = Box<dyn Fn(&OpCx<'_, '_, T, A>, &[NodeId]) -> Result<T, SemanticsError>>;
type LeafAction<T, A> = Box<dyn Fn(&OpCx<'_, '_, T, A>) -> Result<T, SemanticsError>>;

/// Dispatch context handed to every action: the node being evaluated, the
/// tree it lives in, and recursion back into the operation.
pub struct OpCx<'c, 'g, T, A = ()> {
    op: &'c Operation<T, A>,
    cst: &'c Cst<'g>,
    node: NodeId,
    arg: &'c A,
}

impl<'c, 'g, T, A> OpCx<'c, 'g, T, A> {
    /// Evaluates the operation on another node, usually a child.
    pub fn eval(&self, node: NodeId) -> Result<T, SemanticsError> {
        self.op.eval_node(self.cst, node, self.arg)
    }

    /// The node this action was dispatched for.
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn text(&self, node: NodeId) -> &'c str {
        self.cst.text(node)
    }

    pub fn cst(&self) -> &'c Cst<'g> {
        self.cst
    }

    /// The caller-supplied extra argument.
    pub fn arg(&self) -> &'c A {
        self.arg
    }
}

/// A named computation over CST nodes, dispatched by producing rule.
///
/// Built through [`OperationBuilder`], which validates the action table
/// against the grammar once. Results are recomputed on every application;
/// see [`Attribute`](super::Attribute) for the memoized variant.
pub struct Operation<T, A = ()> {
    name: String,
    actions: HashMap<String, Action<T, A>>,
    nonterminal: Option<Action<T, A>>,
    terminal: Option<LeafAction<T, A>>,
    iteration: Option<Action<T, A>>,
}

impl<T, A> std::fmt::Debug for Operation<T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<T> Operation<T> {
    /// Evaluates the operation over a successful match result.
    pub fn apply(&self, result: &MatchResult<'_>) -> Result<T, SemanticsError> {
        self.apply_with(result, &())
    }

    /// Evaluates the operation starting at a tree's root.
    pub fn of(&self, cst: &Cst<'_>) -> Result<T, SemanticsError> {
        self.of_with(cst, &())
    }
}

impl<T, A> Operation<T, A> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Like [`Operation::apply`], threading an extra argument through to every
    /// action via [`OpCx::arg`].
    pub fn apply_with(&self, result: &MatchResult<'_>, arg: &A) -> Result<T, SemanticsError> {
        let cst = result.cst().ok_or(SemanticsError::NotAMatch)?;
        self.of_with(cst, arg)
    }

    pub fn of_with(&self, cst: &Cst<'_>, arg: &A) -> Result<T, SemanticsError> {
        self.eval_node(cst, cst.root(), arg)
    }

    /// Dispatch: exact action by rule name, then the registered wildcard,
    /// then single-child delegation (chain rules need no action), then
    /// [`SemanticsError::MissingAction`].
    fn eval_node(&self, cst: &Cst<'_>, node: NodeId, arg: &A) -> Result<T, SemanticsError> {
        let cx = OpCx {
            op: self,
            cst,
            node,
            arg,
        };
        match cst.kind(node) {
            NodeKind::Nonterminal(rule) => {
                let rule_name = cst.grammar().rule_name(rule);
                if let Some(action) = self.actions.get(rule_name) {
                    return action(&cx, cst.children(node));
                }
                if let Some(action) = &self.nonterminal {
                    return action(&cx, cst.children(node));
                }
                if let [only] = cst.children(node) {
                    return self.eval_node(cst, *only, arg);
                }
                Err(self.missing(rule_name))
            }
            NodeKind::Iter => {
                if let Some(action) = &self.iteration {
                    return action(&cx, cst.children(node));
                }
                if let [only] = cst.children(node) {
                    return self.eval_node(cst, *only, arg);
                }
                Err(self.missing("_iter"))
            }
            NodeKind::Terminal => match &self.terminal {
                Some(action) => action(&cx),
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

/// Collects actions for one operation; `build()` validates the table against
/// the grammar.
pub struct OperationBuilder<'g, T, A = ()> {
    grammar: &'g Grammar,
    name: String,
    actions: Vec<(String, usize, Action<T, A>)>,
    nonterminal: Option<Action<T, A>>,
    terminal: Option<LeafAction<T, A>>,
    iteration: Option<Action<T, A>>,
}

impl<'g, T, A> OperationBuilder<'g, T, A> {
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

    /// Registers the action for `rule`. `arity` is the child count the action
    /// expects; `build()` checks it against the rule's actual arity.
    pub fn action(
        mut self,
        rule: &str,
        arity: usize,
        f: impl Fn(&OpCx<'_, '_, T, A>, &[NodeId]) -> Result<T, SemanticsError> + 'static,
    ) -> Self {
        self.actions.push((rule.to_string(), arity, Box::new(f)));
        self
    }

    /// Wildcard for nonterminal nodes without an exact action.
    pub fn nonterminal(
        mut self,
        f: impl Fn(&OpCx<'_, '_, T, A>, &[NodeId]) -> Result<T, SemanticsError> + 'static,
    ) -> Self {
        self.nonterminal = Some(Box::new(f));
        self
    }

    /// Handler for terminal leaves; the consumed text is reachable through
    /// the context.
    pub fn terminal(
        mut self,
        f: impl Fn(&OpCx<'_, '_, T, A>) -> Result<T, SemanticsError> + 'static,
    ) -> Self {
        self.terminal = Some(Box::new(f));
        self
    }

    /// Handler for iteration nodes synthesized by `Star`/`Plus`/`Opt`.
    pub fn iteration(
        mut self,
        f: impl Fn(&OpCx<'_, '_, T, A>, &[NodeId]) -> Result<T, SemanticsError> + 'static,
    ) -> Self {
        self.iteration = Some(Box::new(f));
        self
    }

    pub fn build(self) -> Result<Operation<T, A>, SemanticsError> {
        let mut actions = HashMap::with_capacity(self.actions.len());
        for (rule, declared, f) in self.actions {
            check_action_arity(self.grammar, &self.name, &rule, declared)?;
            actions.insert(rule, f);
        }
        Ok(Operation {
            name: self.name,
            actions,
            nonterminal: self.nonterminal,
            terminal: self.terminal,
            iteration: self.iteration,
        })
    }
}
