//! Persisted document shape of each entity.
//!
//! Differs from the external representation: identifiers are keyed `_id`,
//! prices are integer pence and timestamps are epoch milliseconds.
use crate::models::{Entity, Location, Message, Property, User};
use serde_json::{json, Map, Value};

pub fn to_document(entity: &Entity) -> Value {
    match entity {
        Entity::User(user) => user_document(user),
        Entity::Property(property) => property_document(property),
        Entity::Message(message) => message_document(message),
    }
}

fn user_document(user: &User) -> Value {
    json!({
        "_id": user.id,
        "email": user.email,
        "password": user.password,
        "roles": user.roles,
    })
}

fn property_document(property: &Property) -> Value {
    let mut doc = Map::new();
    doc.insert("_id".into(), json!(property.id));
    doc.insert("title".into(), json!(property.title));
    if let Some(description) = &property.description {
        doc.insert("description".into(), json!(description));
    }
    doc.insert("ownerId".into(), json!(property.owner_id));
    doc.insert("type".into(), json!(property.kind.as_str()));
    doc.insert("status".into(), json!(property.status.as_str()));
    doc.insert("priority".into(), json!(property.priority.as_str()));
    doc.insert("features".into(), json!(property.features));
    doc.insert("price".into(), json!(property.price.pence()));
    if let Some(location) = &property.location {
        doc.insert("location".into(), location_document(location));
    }
    doc.insert(
        "createdAt".into(),
        json!(property.created_at.timestamp_millis()),
    );
    doc.insert(
        "updatedAt".into(),
        json!(property.updated_at.timestamp_millis()),
    );
    Value::Object(doc)
}

fn location_document(location: &Location) -> Value {
    let mut doc = Map::new();
    doc.insert("addressLine1".into(), json!(location.address_line1));
    if let Some(line2) = &location.address_line2 {
        doc.insert("addressLine2".into(), json!(line2));
    }
    doc.insert("town".into(), json!(location.town));
    if let Some(county) = &location.county {
        doc.insert("county".into(), json!(county));
    }
    doc.insert("postcode".into(), json!(location.postcode));
    Value::Object(doc)
}

fn message_document(message: &Message) -> Value {
    let mut doc = Map::new();
    doc.insert("_id".into(), json!(message.id));
    doc.insert("body".into(), json!(message.body));
    doc.insert("status".into(), json!(message.status.as_str()));
    doc.insert("senderEmail".into(), json!(message.sender_email));
    if let Some(phone) = &message.sender_phone {
        doc.insert("senderPhone".into(), json!(phone));
    }
    doc.insert("propertyId".into(), json!(message.property_id));
    doc.insert("receiverUserId".into(), json!(message.receiver_user_id));
    Value::Object(doc)
}
