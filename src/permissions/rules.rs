use super::predicate::Predicate;
use crate::models::{Entity, EntityKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Read,
    Update,
    Delete,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Read, Action::Update, Action::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Allow,
    Deny,
}

/// Fields a rule grants or retracts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fields {
    All,
    Only(BTreeSet<&'static str>),
}

impl Fields {
    pub fn expand(&self, kind: EntityKind) -> BTreeSet<&'static str> {
        match self {
            Fields::All => kind.fields().iter().copied().collect(),
            Fields::Only(names) => names.clone(),
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, Fields::Only(names) if names.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub effect: Effect,
    pub action: Action,
    pub kind: EntityKind,
    pub fields: Fields,
    pub predicate: Predicate,
}

impl Rule {
    pub fn new(effect: Effect, action: Action, kind: EntityKind) -> Self {
        Self {
            effect,
            action,
            kind,
            fields: Fields::All,
            predicate: Predicate::Always,
        }
    }

    /// Restricts the rule to the named fields.
    pub fn fields(&mut self, names: &[&'static str]) -> &mut Self {
        self.fields = Fields::Only(names.iter().copied().collect());
        self
    }

    /// Restricts the rule to instances satisfying `predicate`.
    pub fn when(&mut self, predicate: Predicate) -> &mut Self {
        self.predicate = predicate;
        self
    }

    pub fn applies_to(&self, action: Action, kind: EntityKind) -> bool {
        self.action == action && self.kind == kind
    }

    pub fn matches(&self, action: Action, entity: &Entity) -> bool {
        self.applies_to(action, entity.kind()) && self.predicate.evaluate(entity)
    }

    /// Whether the rule decides access to the instance as a whole.
    ///
    /// A deny naming specific fields only hides those fields, and an allow
    /// naming no fields grants nothing.
    pub fn decides_instance(&self) -> bool {
        match self.effect {
            Effect::Allow => !self.fields.is_empty(),
            Effect::Deny => self.fields == Fields::All,
        }
    }
}

/// Ordered, immutable list of rules. Later rules override earlier ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Rules for `(action, kind)` in declaration order.
    pub fn rules_for(&self, action: Action, kind: EntityKind) -> impl Iterator<Item = &Rule> {
        self.rules
            .iter()
            .filter(move |rule| rule.applies_to(action, kind))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Collects rules in declaration order.
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    rules: Vec<Rule>,
}

impl RuleSetBuilder {
    pub fn allow(&mut self, action: Action, kind: EntityKind) -> &mut Rule {
        self.push(Rule::new(Effect::Allow, action, kind))
    }

    pub fn deny(&mut self, action: Action, kind: EntityKind) -> &mut Rule {
        self.push(Rule::new(Effect::Deny, action, kind))
    }

    fn push(&mut self, rule: Rule) -> &mut Rule {
        let index = self.rules.len();
        self.rules.push(rule);
        &mut self.rules[index]
    }

    pub fn build(self) -> RuleSet {
        RuleSet::new(self.rules)
    }
}
