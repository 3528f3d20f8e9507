//! Evaluated permission surface of one principal for one request.
use super::builder::define_rules_for;
use super::principal::Principal;
use super::query::accessible_by;
use super::rules::{Action, Effect, RuleSet};
use crate::models::{Entity, EntityKind};
use crate::store::Filter;
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("not permitted to {action} this {kind}")]
pub struct PermissionDenied {
    pub action: Action,
    pub kind: EntityKind,
}

#[derive(Debug, Clone)]
pub struct Ability {
    rules: RuleSet,
}

impl Ability {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn for_principal(principal: &Principal) -> Self {
        Self::new(define_rules_for(principal))
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// The last matching instance-level rule for the action decides.
    pub fn can(&self, action: Action, entity: &Entity) -> bool {
        let allowed = self
            .rules
            .rules_for(action, entity.kind())
            .filter(|rule| rule.decides_instance() && rule.predicate.evaluate(entity))
            .last()
            .is_some_and(|rule| rule.effect == Effect::Allow);
        tracing::debug!(
            action = %action,
            kind = %entity.kind(),
            id = entity.id(),
            allowed,
            "evaluated ability"
        );
        allowed
    }

    pub fn cannot(&self, action: Action, entity: &Entity) -> bool {
        !self.can(action, entity)
    }

    /// `Err(PermissionDenied)` when `cannot(action, entity)`.
    pub fn ensure(&self, action: Action, entity: &Entity) -> Result<(), PermissionDenied> {
        if self.cannot(action, entity) {
            return Err(PermissionDenied {
                action,
                kind: entity.kind(),
            });
        }
        Ok(())
    }

    /// Fields of the instance the principal may see (read) or write (update).
    ///
    /// Folded in declaration order: a matching allow adds its fields and a
    /// matching deny removes its fields, so later rules win per field.
    pub fn accessible_fields(&self, action: Action, entity: &Entity) -> BTreeSet<&'static str> {
        let kind = entity.kind();
        let mut fields = BTreeSet::new();
        for rule in self.rules.rules_for(action, kind) {
            if !rule.predicate.evaluate(entity) {
                continue;
            }
            let named = rule.fields.expand(kind);
            match rule.effect {
                Effect::Allow => fields.extend(named),
                Effect::Deny => fields.retain(|field| !named.contains(field)),
            }
        }
        fields
    }

    /// Store filter matching exactly the instances `can(action, _)` admits.
    pub fn accessible_by(&self, action: Action, kind: EntityKind) -> Filter {
        accessible_by(&self.rules, action, kind)
    }
}
