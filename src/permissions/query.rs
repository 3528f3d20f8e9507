//! Translation of a rule set into a store filter for list queries.
use super::rules::{Action, Effect, RuleSet};
use crate::models::EntityKind;
use crate::store::Filter;

/// Builds the filter admitting exactly the instances `can(action, _)` admits.
///
/// Rules are folded in declaration order starting from "nothing": an allow
/// ORs its predicate in, a whole-instance deny ANDs the negation of its
/// predicate, and field-only denies are skipped. When every deny follows every
/// allow this is `OR(allows) AND NOT OR(denies)`.
pub fn accessible_by(rules: &RuleSet, action: Action, kind: EntityKind) -> Filter {
    let filter = rules
        .rules_for(action, kind)
        .filter(|rule| rule.decides_instance())
        .fold(Filter::Nothing, |acc, rule| match rule.effect {
            Effect::Allow => acc.or(rule.predicate.lower()),
            Effect::Deny => acc.and(rule.predicate.lower().negate()),
        });
    tracing::debug!(
        action = %action,
        kind = %kind,
        filter = %filter.to_document(),
        "translated rules to filter"
    );
    filter
}
