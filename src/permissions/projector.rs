//! Field-level projection of entities for responses and updates.
use crate::models::Entity;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Keeps only the permitted keys of the entity's external representation.
/// Fields absent on the entity stay absent.
pub fn project(
    entity: &Entity,
    fields: &BTreeSet<&'static str>,
) -> serde_json::Result<Map<String, Value>> {
    let Value::Object(external) = entity.to_external()? else {
        return Ok(Map::new());
    };
    Ok(external
        .into_iter()
        .filter(|(key, _)| fields.contains(key.as_str()))
        .collect())
}

/// Merges the permitted keys of `body` into the entity.
///
/// Keys outside `fields` are dropped silently and `id` is never taken from the
/// body. An explicit `null` clears an optional field.
pub fn apply_update(
    entity: &Entity,
    body: &Map<String, Value>,
    fields: &BTreeSet<&'static str>,
) -> serde_json::Result<Entity> {
    let mut external = match entity.to_external()? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in body {
        if key == "id" || !fields.contains(key.as_str()) {
            continue;
        }
        if value.is_null() {
            external.remove(key);
        } else {
            external.insert(key.clone(), value.clone());
        }
    }
    Entity::from_external(entity.kind(), Value::Object(external))
}

/// Body keys that [`apply_update`] would drop.
pub fn rejected_keys<'a>(
    body: &'a Map<String, Value>,
    fields: &BTreeSet<&'static str>,
) -> Vec<&'a str> {
    body.keys()
        .map(String::as_str)
        .filter(|key| *key == "id" || !fields.contains(key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, Price, Priority, Property, PropertyStatus, PropertyType, User};
    use chrono::Utc;
    use serde_json::json;

    fn user() -> Entity {
        Entity::User(User {
            id: "u1".into(),
            email: "me@example.com".into(),
            password: "$2b$10$hash".into(),
            roles: vec!["user".into()],
        })
    }

    fn property(location: Option<Location>) -> Entity {
        Entity::Property(Property {
            id: "p1".into(),
            title: "Two bed flat".into(),
            description: None,
            owner_id: "u1".into(),
            kind: PropertyType::Flat,
            status: PropertyStatus::Listed,
            priority: Priority::Normal,
            features: vec![],
            price: Price::from_pence(25_000_000),
            location,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    #[test]
    fn projects_only_permitted_fields() {
        let fields = BTreeSet::from(["id", "email", "roles"]);
        let projected = project(&user(), &fields).unwrap();
        assert_eq!(
            Value::Object(projected),
            json!({ "id": "u1", "email": "me@example.com", "roles": ["user"] })
        );
    }

    #[test]
    fn never_fabricates_absent_fields() {
        let fields = BTreeSet::from(["id", "location", "description"]);
        let projected = project(&property(None), &fields).unwrap();
        assert_eq!(Value::Object(projected), json!({ "id": "p1" }));
    }

    #[test]
    fn empty_field_set_projects_nothing() {
        assert!(project(&user(), &BTreeSet::new()).unwrap().is_empty());
    }

    #[test]
    fn update_keeps_only_permitted_keys() {
        let fields = BTreeSet::from(["email", "password"]);
        let body = json!({ "email": "new@example.com", "roles": ["admin"], "id": "u2" });
        let updated = apply_update(&user(), body.as_object().unwrap(), &fields).unwrap();
        let updated = updated.as_user().unwrap();
        assert_eq!(updated.email, "new@example.com");
        assert_eq!(updated.roles, vec!["user".to_string()]);
        assert_eq!(updated.id, "u1");
    }

    #[test]
    fn id_is_never_written_even_when_permitted() {
        let fields = BTreeSet::from(["id", "title"]);
        let body = json!({ "id": "other", "title": "Renamed" });
        let updated = apply_update(&property(None), body.as_object().unwrap(), &fields).unwrap();
        assert_eq!(updated.id(), "p1");
        assert_eq!(updated.as_property().unwrap().title, "Renamed");
    }

    #[test]
    fn update_parses_prices_in_pounds() {
        let fields = BTreeSet::from(["price"]);
        let body = json!({ "price": "199999.99" });
        let updated = apply_update(&property(None), body.as_object().unwrap(), &fields).unwrap();
        assert_eq!(updated.as_property().unwrap().price.pence(), 19_999_999);
    }

    #[test]
    fn reports_dropped_keys() {
        let fields = BTreeSet::from(["status"]);
        let body = json!({ "status": "read", "body": "edited", "id": "x" });
        let mut rejected = rejected_keys(body.as_object().unwrap(), &fields);
        rejected.sort_unstable();
        assert_eq!(rejected, vec!["body", "id"]);
    }
}
