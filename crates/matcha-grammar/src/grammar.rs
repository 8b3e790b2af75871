//! Grammar construction and validation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::build;
use crate::error::GrammarError;
use crate::expr::{CharClass, Expr};

/// A rule as ingested from the front end.
///
/// Case-labeled alternatives are expected to be pre-expanded by the front end
/// into synthetic rules named `<rule>_<label>`, one per disjunction arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDecl {
    pub name: String,
    /// Formal parameters. Must be empty; see `GrammarError::ParameterizedRule`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
    pub body: Expr,
    /// Human description used in diagnostics ("an identifier", "a number").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RuleDecl {
    pub fn new(name: &str, body: Expr) -> Self {
        Self {
            name: name.to_string(),
            params: Vec::new(),
            body,
            description: None,
        }
    }

    pub fn described(name: &str, body: Expr, description: &str) -> Self {
        Self {
            description: Some(description.to_string()),
            ..Self::new(name, body)
        }
    }
}

/// Whether a rule skips whitespace implicitly.
///
/// Determined by the case of the rule name's first character: uppercase rules
/// are syntactic (the engine interleaves `space*` through their bodies),
/// everything else is lexical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Syntactic,
    Lexical,
}

impl RuleKind {
    fn of(name: &str) -> Self {
        if name.chars().next().is_some_and(|c| c.is_uppercase()) {
            Self::Syntactic
        } else {
            Self::Lexical
        }
    }
}

/// A compiled rule: body plus derived metadata.
#[derive(Debug, Clone)]
pub struct Rule {
    pub body: Expr,
    pub description: Option<String>,
    /// Number of CST children a successful application produces. Cached at
    /// construction; consistent by validation.
    pub arity: usize,
    pub kind: RuleKind,
    /// Installed by the builder rather than declared by the user. Failures
    /// attributed to builtin rules rank as fluffy in diagnostics.
    pub builtin: bool,
}

/// Index of a rule in the grammar's table. Stable for the life of the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(u32);

impl RuleId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An immutable, validated set of rules.
///
/// Insertion order is declaration order; the first declared rule is the
/// default start rule unless the builder overrides it. A `Grammar` is
/// read-only after construction and safe to share across threads; each match
/// call allocates its own state.
#[derive(Debug, Clone)]
pub struct Grammar {
    name: String,
    rules: IndexMap<String, Rule>,
    default_start: RuleId,
    space: RuleId,
}

impl Grammar {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rule_id(&self, name: &str) -> Option<RuleId> {
        self.rules.get_index_of(name).map(|i| RuleId(i as u32))
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        let (_, rule) = self
            .rules
            .get_index(id.index())
            .expect("RuleId is only minted by this grammar");
        rule
    }

    pub fn rule_name(&self, id: RuleId) -> &str {
        let (name, _) = self
            .rules
            .get_index(id.index())
            .expect("RuleId is only minted by this grammar");
        name
    }

    /// The rule matched when no start rule is named: the first declared rule.
    pub fn default_start(&self) -> RuleId {
        self.default_start
    }

    pub fn default_start_name(&self) -> &str {
        self.rule_name(self.default_start)
    }

    /// The whitespace rule syntactic rules skip with. Either the builtin
    /// `space` or a user override of the same name.
    pub fn space_rule(&self) -> RuleId {
        self.space
    }

    pub fn rules(&self) -> impl Iterator<Item = (RuleId, &str, &Rule)> {
        self.rules
            .iter()
            .enumerate()
            .map(|(i, (name, rule))| (RuleId(i as u32), name.as_str(), rule))
    }
}

/// Accumulates rule declarations and produces a validated `Grammar`.
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    name: String,
    decls: Vec<RuleDecl>,
    default_start: Option<String>,
}

impl GrammarBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            decls: Vec::new(),
            default_start: None,
        }
    }

    /// Declare a rule. Declaration order is significant: the first rule
    /// becomes the default start rule.
    pub fn rule(mut self, name: &str, body: Expr) -> Self {
        self.decls.push(RuleDecl::new(name, body));
        self
    }

    /// Declare a rule with a diagnostic description.
    pub fn rule_described(mut self, name: &str, body: Expr, description: &str) -> Self {
        self.decls.push(RuleDecl::described(name, body, description));
        self
    }

    /// Declare a rule from a pre-built declaration.
    pub fn decl(mut self, decl: RuleDecl) -> Self {
        self.decls.push(decl);
        self
    }

    /// Override the default start rule.
    pub fn default_start(mut self, name: &str) -> Self {
        self.default_start = Some(name.to_string());
        self
    }

    /// Validate and freeze the grammar.
    ///
    /// Checks, in order: at least one rule, no duplicates, no rule
    /// parameters, every application resolves, every choice is non-empty and
    /// arity-consistent. Builtin lexical rules (`any`, `space`, `spaces`,
    /// `letter`, `digit`, `alnum`) are appended unless the grammar defines
    /// its own, so a user `space` rule customizes syntactic whitespace.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        if self.decls.is_empty() {
            return Err(GrammarError::EmptyGrammar { grammar: self.name });
        }

        let mut rules: IndexMap<String, Rule> = IndexMap::with_capacity(self.decls.len() + 6);
        for decl in self.decls {
            if !decl.params.is_empty() {
                return Err(GrammarError::ParameterizedRule { rule: decl.name });
            }
            let kind = RuleKind::of(&decl.name);
            let prev = rules.insert(
                decl.name.clone(),
                Rule {
                    body: decl.body,
                    description: decl.description,
                    arity: 0,
                    kind,
                    builtin: false,
                },
            );
            if prev.is_some() {
                return Err(GrammarError::DuplicateRule { name: decl.name });
            }
        }

        for (name, body, description) in builtin_rules() {
            if !rules.contains_key(name) {
                rules.insert(
                    name.to_string(),
                    Rule {
                        body,
                        description: Some(description.to_string()),
                        arity: 0,
                        kind: RuleKind::Lexical,
                        builtin: true,
                    },
                );
            }
        }

        // Reference and shape checks over every body, builtins included.
        for index in 0..rules.len() {
            let (name, rule) = rules.get_index(index).expect("index in bounds");
            let mut error = None;
            rule.body.walk(&mut |expr| {
                if error.is_some() {
                    return;
                }
                match expr {
                    Expr::Apply { name: target, args } => {
                        if !args.is_empty() {
                            error = Some(GrammarError::ParameterizedRule { rule: name.clone() });
                        } else if !rules.contains_key(target) {
                            error = Some(GrammarError::UnknownRule {
                                name: target.clone(),
                                referenced_from: name.clone(),
                            });
                        }
                    }
                    Expr::Choice(alts) if alts.is_empty() => {
                        error = Some(GrammarError::EmptyChoice { rule: name.clone() });
                    }
                    _ => {}
                }
            });
            if let Some(error) = error {
                return Err(error);
            }
        }

        // Arity computation; a conflict anywhere in a body is fatal here.
        for index in 0..rules.len() {
            let (name, rule) = rules.get_index(index).expect("index in bounds");
            let arity = rule.body.arity().map_err(|conflict| {
                GrammarError::ArityMismatch {
                    rule: name.clone(),
                    arities: conflict.arities,
                }
            })?;
            rules
                .get_index_mut(index)
                .expect("index in bounds")
                .1
                .arity = arity;
        }

        let default_start = match self.default_start {
            Some(name) => RuleId(
                rules
                    .get_index_of(&name)
                    .ok_or(GrammarError::UnknownStartRule { name })? as u32,
            ),
            None => RuleId(0),
        };
        let space = RuleId(
            rules
                .get_index_of("space")
                .expect("space rule is always installed") as u32,
        );

        Ok(Grammar {
            name: self.name,
            rules,
            default_start,
            space,
        })
    }
}

/// Built-in lexical rules appended to every grammar.
fn builtin_rules() -> Vec<(&'static str, Expr, &'static str)> {
    vec![
        ("any", Expr::Any, "any character"),
        ("space", build::class(CharClass::Space), "a space"),
        ("spaces", build::star(build::apply("space")), "zero or more spaces"),
        ("letter", build::class(CharClass::Letter), "a letter"),
        ("digit", build::class(CharClass::Digit), "a digit"),
        ("alnum", build::class(CharClass::Alnum), "an alphanumeric character"),
    ]
}
