//! Document filters understood by the store.
//!
//! Filters are evaluated against persisted JSON documents and can be rendered
//! as MongoDB-style operator documents for logging and debugging. Field paths
//! are dotted (`location.town`); an array-valued field matches an equality or
//! regex test when any of its elements does.
use regex::RegexBuilder;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every document.
    All,
    /// Matches no document.
    Nothing,
    Eq(String, Value),
    Ne(String, Value),
    Gte(String, i64),
    Lte(String, i64),
    Regex {
        path: String,
        pattern: String,
        case_insensitive: bool,
    },
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Nor(Vec<Filter>),
}

impl Filter {
    pub fn eq(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(path.into(), value.into())
    }

    pub fn ne(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Ne(path.into(), value.into())
    }

    pub fn regex(path: impl Into<String>, pattern: impl Into<String>) -> Self {
        Filter::Regex {
            path: path.into(),
            pattern: pattern.into(),
            case_insensitive: true,
        }
    }

    /// Logical OR, folding away `All`/`Nothing` and flattening nested ORs.
    pub fn or(self, other: Filter) -> Filter {
        match (self, other) {
            (Filter::All, _) | (_, Filter::All) => Filter::All,
            (Filter::Nothing, f) | (f, Filter::Nothing) => f,
            (Filter::Or(mut left), Filter::Or(right)) => {
                left.extend(right);
                Filter::Or(left)
            }
            (Filter::Or(mut left), f) => {
                left.push(f);
                Filter::Or(left)
            }
            (f, other) => Filter::Or(vec![f, other]),
        }
    }

    /// Logical AND, folding away `All`/`Nothing` and flattening nested ANDs.
    pub fn and(self, other: Filter) -> Filter {
        match (self, other) {
            (Filter::Nothing, _) | (_, Filter::Nothing) => Filter::Nothing,
            (Filter::All, f) | (f, Filter::All) => f,
            (Filter::And(mut left), Filter::And(right)) => {
                left.extend(right);
                Filter::And(left)
            }
            (Filter::And(mut left), f) => {
                left.push(f);
                Filter::And(left)
            }
            (f, other) => Filter::And(vec![f, other]),
        }
    }

    /// AND-combines caller search filters onto this one.
    pub fn and_all(self, filters: impl IntoIterator<Item = Filter>) -> Filter {
        filters.into_iter().fold(self, Filter::and)
    }

    pub fn negate(self) -> Filter {
        match self {
            Filter::All => Filter::Nothing,
            Filter::Nothing => Filter::All,
            f => Filter::Nor(vec![f]),
        }
    }

    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Filter::All => true,
            Filter::Nothing => false,
            Filter::Eq(path, expected) => lookup(doc, path).is_some_and(|v| equals(v, expected)),
            Filter::Ne(path, expected) => !lookup(doc, path).is_some_and(|v| equals(v, expected)),
            Filter::Gte(path, bound) => lookup(doc, path)
                .and_then(Value::as_i64)
                .is_some_and(|v| v >= *bound),
            Filter::Lte(path, bound) => lookup(doc, path)
                .and_then(Value::as_i64)
                .is_some_and(|v| v <= *bound),
            Filter::Regex {
                path,
                pattern,
                case_insensitive,
            } => {
                let Ok(re) = RegexBuilder::new(pattern)
                    .case_insensitive(*case_insensitive)
                    .build()
                else {
                    return false;
                };
                lookup(doc, path).is_some_and(|v| match v {
                    Value::String(s) => re.is_match(s),
                    Value::Array(items) => items
                        .iter()
                        .any(|item| item.as_str().is_some_and(|s| re.is_match(s))),
                    _ => false,
                })
            }
            Filter::And(filters) => filters.iter().all(|f| f.matches(doc)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(doc)),
            Filter::Nor(filters) => !filters.iter().any(|f| f.matches(doc)),
        }
    }

    /// Renders the filter as a MongoDB query document.
    pub fn to_document(&self) -> Value {
        match self {
            Filter::All => json!({}),
            Filter::Nothing => json!({ "_id": { "$exists": false } }),
            Filter::Eq(path, value) => single(path, value.clone()),
            Filter::Ne(path, value) => single(path, json!({ "$ne": value })),
            Filter::Gte(path, bound) => single(path, json!({ "$gte": bound })),
            Filter::Lte(path, bound) => single(path, json!({ "$lte": bound })),
            Filter::Regex {
                path,
                pattern,
                case_insensitive,
            } => {
                let mut op = Map::new();
                op.insert("$regex".into(), json!(pattern));
                if *case_insensitive {
                    op.insert("$options".into(), json!("i"));
                }
                single(path, Value::Object(op))
            }
            Filter::And(filters) => combinator("$and", filters),
            Filter::Or(filters) => combinator("$or", filters),
            Filter::Nor(filters) => combinator("$nor", filters),
        }
    }
}

fn single(path: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(path.to_string(), value);
    Value::Object(map)
}

fn combinator(op: &str, filters: &[Filter]) -> Value {
    single(op, Value::Array(filters.iter().map(Filter::to_document).collect()))
}

fn lookup<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(doc, |value, segment| value.get(segment))
        .filter(|value| !value.is_null())
}

fn equals(actual: &Value, expected: &Value) -> bool {
    match actual {
        Value::Array(items) if !expected.is_array() => items.iter().any(|item| item == expected),
        _ => actual == expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Value {
        json!({
            "_id": "p1",
            "ownerId": "u1",
            "status": "listed",
            "price": 10000,
            "features": ["Has Garden", "garage"],
            "location": { "town": "Coventry", "postcode": "CV1 5FB" }
        })
    }

    #[test]
    fn equality_reaches_nested_and_array_fields() {
        assert!(Filter::eq("location.town", "Coventry").matches(&doc()));
        assert!(Filter::eq("features", "garage").matches(&doc()));
        assert!(!Filter::eq("location.county", "West Midlands").matches(&doc()));
    }

    #[test]
    fn ne_matches_missing_fields() {
        assert!(Filter::ne("location.county", "West Midlands").matches(&doc()));
        assert!(!Filter::ne("status", "listed").matches(&doc()));
    }

    #[test]
    fn numeric_bounds_compare_pence() {
        assert!(Filter::Gte("price".into(), 100).matches(&doc()));
        assert!(Filter::Lte("price".into(), 10000).matches(&doc()));
        assert!(!Filter::Lte("price".into(), 9999).matches(&doc()));
    }

    #[test]
    fn regex_is_case_insensitive_and_searches_arrays() {
        assert!(Filter::regex("features", "garden").matches(&doc()));
        assert!(Filter::regex("location.postcode", "^cv1").matches(&doc()));
        assert!(!Filter::regex("location.postcode", "^cv2").matches(&doc()));
    }

    #[test]
    fn combinators_simplify() {
        assert_eq!(Filter::Nothing.or(Filter::eq("a", 1)), Filter::eq("a", 1));
        assert_eq!(Filter::All.and(Filter::eq("a", 1)), Filter::eq("a", 1));
        assert_eq!(Filter::eq("a", 1).or(Filter::All), Filter::All);
        assert_eq!(Filter::eq("a", 1).and(Filter::Nothing), Filter::Nothing);
        assert_eq!(Filter::All.negate(), Filter::Nothing);
        assert!(!Filter::Nothing.matches(&doc()));
    }

    #[test]
    fn renders_mongo_documents() {
        let filter = Filter::eq("ownerId", "u1").or(Filter::ne("status", "archived").negate());
        assert_eq!(
            filter.to_document(),
            json!({ "$or": [
                { "ownerId": "u1" },
                { "$nor": [ { "status": { "$ne": "archived" } } ] }
            ]})
        );
        assert_eq!(
            Filter::regex("title", "flat").to_document(),
            json!({ "title": { "$regex": "flat", "$options": "i" } })
        );
    }
}
