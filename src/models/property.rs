use super::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of building being listed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PropertyType {
    Commercial,
    Terrace,
    EndOfTerrace,
    Flat,
    Detached,
    SemiDetached,
    Cottage,
    Bungalow,
    Mansion,
}

impl PropertyType {
    pub const ALL: [PropertyType; 9] = [
        PropertyType::Commercial,
        PropertyType::Terrace,
        PropertyType::EndOfTerrace,
        PropertyType::Flat,
        PropertyType::Detached,
        PropertyType::SemiDetached,
        PropertyType::Cottage,
        PropertyType::Bungalow,
        PropertyType::Mansion,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PropertyType::Commercial => "commercial",
            PropertyType::Terrace => "terrace",
            PropertyType::EndOfTerrace => "endOfTerrace",
            PropertyType::Flat => "flat",
            PropertyType::Detached => "detached",
            PropertyType::SemiDetached => "semiDetached",
            PropertyType::Cottage => "cottage",
            PropertyType::Bungalow => "bungalow",
            PropertyType::Mansion => "mansion",
        }
    }
}

/// Where a listing is in its lifecycle
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PropertyStatus {
    #[default]
    Listed,
    UnderOffer,
    Archived,
}

impl PropertyStatus {
    pub const ALL: [PropertyStatus; 3] = [
        PropertyStatus::Listed,
        PropertyStatus::UnderOffer,
        PropertyStatus::Archived,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PropertyStatus::Listed => "listed",
            PropertyStatus::UnderOffer => "underOffer",
            PropertyStatus::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Priority {
    #[default]
    Normal,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::High => "high",
        }
    }
}

/// Postal address of a property
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub town: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    pub postcode: String,
}

/// Core property listing model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub owner_id: String,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    #[serde(default)]
    pub status: PropertyStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields of a new listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProperty {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    #[serde(default)]
    pub status: PropertyStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub location: Option<Location>,
}

impl Property {
    pub fn create(id: String, owner_id: String, details: NewProperty, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: details.title,
            description: details.description,
            owner_id,
            kind: details.kind,
            status: details.status,
            priority: details.priority,
            features: details.features,
            price: details.price,
            location: details.location,
            created_at: now,
            updated_at: now,
        }
    }
}
