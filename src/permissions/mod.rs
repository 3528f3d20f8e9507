//! Attribute based access control.
//!
//! Rules are built per request from the caller's roles ([`define_rules_for`]),
//! evaluated against single instances ([`Ability::can`]), translated into
//! store filters for listings ([`Ability::accessible_by`]) and used to trim
//! entities down to their permitted fields ([`project`], [`apply_update`]).
pub mod ability;
pub mod builder;
pub mod predicate;
pub mod principal;
pub mod projector;
pub mod query;
pub mod rules;

pub use ability::{Ability, PermissionDenied};
pub use builder::define_rules_for;
pub use predicate::{Literal, Predicate};
pub use principal::Principal;
pub use projector::{apply_update, project, rejected_keys};
pub use rules::{Action, Effect, Fields, Rule, RuleSet, RuleSetBuilder};
