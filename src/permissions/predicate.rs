//! Instance predicates for permission rules.
//!
//! A [`Predicate`] is evaluated in-process against a typed [`Entity`] when
//! answering `can`, and lowered to a store [`Filter`] when building list
//! queries. Both evaluations must agree for every instance.
use crate::models::{Attr, Entity};
use crate::store::filter::Filter;
use regex::RegexBuilder;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Str(String),
    Int(i64),
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Str(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::Str(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int(value)
    }
}

impl Literal {
    fn matches(&self, attr: Attr<'_>) -> bool {
        match (self, attr) {
            (Literal::Str(expected), Attr::Str(actual)) => expected == actual,
            (Literal::Int(expected), Attr::Int(actual)) => *expected == actual,
            (Literal::Str(expected), Attr::List(items)) => items.iter().any(|i| i == expected),
            _ => false,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Literal::Str(s) => Value::String(s.clone()),
            Literal::Int(n) => Value::from(*n),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Always,
    Eq(&'static str, Literal),
    /// True when the field is absent or differs.
    Ne(&'static str, Literal),
    Gte(&'static str, i64),
    Lte(&'static str, i64),
    Regex {
        field: &'static str,
        pattern: String,
        case_insensitive: bool,
    },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn eq(field: &'static str, value: impl Into<Literal>) -> Self {
        Predicate::Eq(field, value.into())
    }

    pub fn ne(field: &'static str, value: impl Into<Literal>) -> Self {
        Predicate::Ne(field, value.into())
    }

    pub fn not(predicate: Predicate) -> Self {
        Predicate::Not(Box::new(predicate))
    }

    pub fn evaluate(&self, entity: &Entity) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::Eq(field, literal) => entity
                .attribute(field)
                .is_some_and(|attr| literal.matches(attr)),
            Predicate::Ne(field, literal) => !entity
                .attribute(field)
                .is_some_and(|attr| literal.matches(attr)),
            Predicate::Gte(field, bound) => {
                matches!(entity.attribute(field), Some(Attr::Int(v)) if v >= *bound)
            }
            Predicate::Lte(field, bound) => {
                matches!(entity.attribute(field), Some(Attr::Int(v)) if v <= *bound)
            }
            Predicate::Regex {
                field,
                pattern,
                case_insensitive,
            } => {
                let Ok(re) = RegexBuilder::new(pattern)
                    .case_insensitive(*case_insensitive)
                    .build()
                else {
                    return false;
                };
                match entity.attribute(field) {
                    Some(Attr::Str(s)) => re.is_match(s),
                    Some(Attr::List(items)) => items.iter().any(|item| re.is_match(item)),
                    _ => false,
                }
            }
            Predicate::And(all) => all.iter().all(|p| p.evaluate(entity)),
            Predicate::Or(any) => any.iter().any(|p| p.evaluate(entity)),
            Predicate::Not(inner) => !inner.evaluate(entity),
        }
    }

    /// Lowers the predicate to a store filter over persisted documents.
    pub fn lower(&self) -> Filter {
        match self {
            Predicate::Always => Filter::All,
            Predicate::Eq(field, literal) => Filter::Eq(document_path(field), literal.to_value()),
            Predicate::Ne(field, literal) => Filter::Ne(document_path(field), literal.to_value()),
            Predicate::Gte(field, bound) => Filter::Gte(document_path(field), *bound),
            Predicate::Lte(field, bound) => Filter::Lte(document_path(field), *bound),
            Predicate::Regex {
                field,
                pattern,
                case_insensitive,
            } => Filter::Regex {
                path: document_path(field),
                pattern: pattern.clone(),
                case_insensitive: *case_insensitive,
            },
            Predicate::And(all) => all
                .iter()
                .map(Predicate::lower)
                .fold(Filter::All, Filter::and),
            Predicate::Or(any) => any
                .iter()
                .map(Predicate::lower)
                .fold(Filter::Nothing, Filter::or),
            Predicate::Not(inner) => inner.lower().negate(),
        }
    }
}

/// Documents key their identifier as `_id`.
fn document_path(field: &str) -> String {
    match field {
        "id" => "_id".to_string(),
        other => other.to_string(),
    }
}
