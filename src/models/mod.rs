pub mod message;
pub mod price;
pub mod property;
pub mod user;

pub use message::{Message, MessageStatus, NewMessage};
pub use price::{Price, PriceError};
pub use property::{Location, NewProperty, Priority, Property, PropertyStatus, PropertyType};
pub use user::{Role, RoleName, User};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of entity that permission rules can target
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    User,
    Property,
    Message,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::User, EntityKind::Property, EntityKind::Message];

    /// Every externally named field of the kind, in presentation order.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            EntityKind::User => &["id", "email", "password", "roles"],
            EntityKind::Property => &[
                "id",
                "title",
                "description",
                "ownerId",
                "type",
                "status",
                "priority",
                "features",
                "price",
                "location",
                "createdAt",
                "updatedAt",
            ],
            EntityKind::Message => &[
                "id",
                "body",
                "status",
                "senderEmail",
                "senderPhone",
                "propertyId",
                "receiverUserId",
            ],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Property => "Property",
            EntityKind::Message => "Message",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed view of a single attribute, used when evaluating rule predicates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Attr<'a> {
    Str(&'a str),
    Int(i64),
    List(&'a [String]),
}

/// An entity instance tagged with its kind
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    User(User),
    Property(Property),
    Message(Message),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::User(_) => EntityKind::User,
            Entity::Property(_) => EntityKind::Property,
            Entity::Message(_) => EntityKind::Message,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Entity::User(user) => &user.id,
            Entity::Property(property) => &property.id,
            Entity::Message(message) => &message.id,
        }
    }

    /// Looks up an attribute by its external name. Nested location fields use
    /// dotted paths such as `location.town`.
    pub fn attribute(&self, path: &str) -> Option<Attr<'_>> {
        match self {
            Entity::User(user) => match path {
                "id" => Some(Attr::Str(&user.id)),
                "email" => Some(Attr::Str(&user.email)),
                "password" => Some(Attr::Str(&user.password)),
                "roles" => Some(Attr::List(&user.roles)),
                _ => None,
            },
            Entity::Property(property) => property_attribute(property, path),
            Entity::Message(message) => match path {
                "id" => Some(Attr::Str(&message.id)),
                "body" => Some(Attr::Str(&message.body)),
                "status" => Some(Attr::Str(message.status.as_str())),
                "senderEmail" => Some(Attr::Str(&message.sender_email)),
                "senderPhone" => message.sender_phone.as_deref().map(Attr::Str),
                "propertyId" => Some(Attr::Str(&message.property_id)),
                "receiverUserId" => Some(Attr::Str(&message.receiver_user_id)),
                _ => None,
            },
        }
    }

    /// External JSON representation: camelCase keys, price in pounds, absent
    /// optional fields omitted.
    pub fn to_external(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            Entity::User(user) => serde_json::to_value(user),
            Entity::Property(property) => serde_json::to_value(property),
            Entity::Message(message) => serde_json::to_value(message),
        }
    }

    pub fn from_external(kind: EntityKind, value: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match kind {
            EntityKind::User => Entity::User(serde_json::from_value(value)?),
            EntityKind::Property => Entity::Property(serde_json::from_value(value)?),
            EntityKind::Message => Entity::Message(serde_json::from_value(value)?),
        })
    }

    pub fn as_user(&self) -> Option<&User> {
        match self {
            Entity::User(user) => Some(user),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&Property> {
        match self {
            Entity::Property(property) => Some(property),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Entity::Message(message) => Some(message),
            _ => None,
        }
    }
}

fn property_attribute<'a>(property: &'a Property, path: &str) -> Option<Attr<'a>> {
    let location = property.location.as_ref();
    match path {
        "id" => Some(Attr::Str(&property.id)),
        "title" => Some(Attr::Str(&property.title)),
        "description" => property.description.as_deref().map(Attr::Str),
        "ownerId" => Some(Attr::Str(&property.owner_id)),
        "type" => Some(Attr::Str(property.kind.as_str())),
        "status" => Some(Attr::Str(property.status.as_str())),
        "priority" => Some(Attr::Str(property.priority.as_str())),
        "features" => Some(Attr::List(&property.features)),
        "price" => Some(Attr::Int(property.price.pence())),
        "createdAt" => Some(Attr::Int(property.created_at.timestamp_millis())),
        "updatedAt" => Some(Attr::Int(property.updated_at.timestamp_millis())),
        "location.addressLine1" => location.map(|l| Attr::Str(&l.address_line1)),
        "location.addressLine2" => location
            .and_then(|l| l.address_line2.as_deref())
            .map(Attr::Str),
        "location.town" => location.map(|l| Attr::Str(&l.town)),
        "location.county" => location.and_then(|l| l.county.as_deref()).map(Attr::Str),
        "location.postcode" => location.map(|l| Attr::Str(&l.postcode)),
        _ => None,
    }
}

impl From<User> for Entity {
    fn from(user: User) -> Self {
        Entity::User(user)
    }
}

impl From<Property> for Entity {
    fn from(property: Property) -> Self {
        Entity::Property(property)
    }
}

impl From<Message> for Entity {
    fn from(message: Message) -> Self {
        Entity::Message(message)
    }
}
