//! Role based access policies.
//!
//! Rules are declared in a fixed order: the guest baseline first, then the
//! ownership-scoped USER rules, then the unconditional ADMIN grants. Because
//! later rules override earlier ones, a principal holding both roles gets the
//! ADMIN view of every instance.
use super::predicate::Predicate;
use super::principal::Principal;
use super::rules::{Action, RuleSet, RuleSetBuilder};
use crate::models::{EntityKind, RoleName};

/// Get the rules the principal is subject to for this request.
pub fn define_rules_for(principal: &Principal) -> RuleSet {
    let mut rules = RuleSetBuilder::default();

    rules
        .allow(Action::Read, EntityKind::Property)
        .when(Predicate::ne("status", "archived"));

    if let Principal::Authenticated { id, .. } = principal {
        if principal.has_role(RoleName::User) {
            user_rules(&mut rules, id);
        }
        if principal.has_role(RoleName::Admin) {
            admin_rules(&mut rules);
        }
    }

    let rules = rules.build();
    tracing::debug!(
        principal = principal.id().unwrap_or("guest"),
        rules = rules.len(),
        "defined rules"
    );
    rules
}

fn user_rules(rules: &mut RuleSetBuilder, id: &str) {
    let is_self = || Predicate::eq("id", id);
    let owns = || Predicate::eq("ownerId", id);
    let receives = || Predicate::eq("receiverUserId", id);

    rules
        .allow(Action::Read, EntityKind::User)
        .fields(&["id", "email", "roles"])
        .when(is_self());
    rules
        .allow(Action::Update, EntityKind::User)
        .fields(&["email", "password"])
        .when(is_self());
    rules
        .allow(Action::Delete, EntityKind::User)
        .when(is_self());

    rules.allow(Action::Read, EntityKind::Property).when(owns());
    rules
        .deny(Action::Read, EntityKind::Property)
        .fields(&["location"])
        .when(Predicate::ne("ownerId", id));
    rules.allow(Action::Update, EntityKind::Property).when(owns());
    rules.allow(Action::Delete, EntityKind::Property).when(owns());

    rules.allow(Action::Read, EntityKind::Message).when(receives());
    rules
        .allow(Action::Update, EntityKind::Message)
        .fields(&["status"])
        .when(receives());
    rules.allow(Action::Delete, EntityKind::Message).when(receives());
}

fn admin_rules(rules: &mut RuleSetBuilder) {
    for kind in EntityKind::ALL {
        for action in Action::ALL {
            rules.allow(action, kind);
        }
    }
}
