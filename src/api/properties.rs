//! Property listing handlers.
use super::error::ApiError;
use super::types::{Links, Projected, PropertyListResponse};
use super::{as_object, delete_one, load, read_one, readable, updated};
use crate::app::AppState;
use crate::auth::Access;
use crate::models::{Entity, EntityKind, NewProperty, Property};
use crate::permissions::{Ability, Action};
use crate::search::{Pagination, PropertySearch};
use crate::validation::Schema;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;

const PREFIX: &str = "/properties";

/// Filtered and paginated listings visible to the caller.
pub async fn list_properties(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<PropertyListResponse>, ApiError> {
    let principal = state.principal(&headers, Access::GuestAllowed).await?;
    state
        .validators
        .validate_params(Schema::PropertySearch, &params)?;
    let pagination = Pagination::from_params(&params)?;
    let search = PropertySearch::from_params(&params).to_filters()?;

    let ability = Ability::for_principal(&principal);
    let filter = ability
        .accessible_by(Action::Read, EntityKind::Property)
        .and_all(search);
    let properties = state
        .store
        .find(EntityKind::Property, &filter, &pagination.find_options())
        .await?;
    let property_count = state.store.count(EntityKind::Property, &filter).await?;
    tracing::debug!(
        principal = principal.id().unwrap_or("guest"),
        returned = properties.len(),
        total = property_count,
        "listed properties"
    );

    let properties = properties
        .iter()
        .map(|property| readable(&ability, property))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(PropertyListResponse {
        properties,
        page: pagination.page,
        results_per_page: pagination.results_per_page,
        property_count,
        page_count: pagination.page_count(property_count),
        links: Links {
            create: create_link(&headers),
        },
    }))
}

fn create_link(headers: &HeaderMap) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");
    format!("http://{host}{PREFIX}/")
}

/// Adds a listing owned by the caller.
pub async fn create_property(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = state.principal(&headers, Access::Required).await?;
    state.validators.validate(Schema::PropertyCreate, &body)?;
    let details: NewProperty = serde_json::from_value(body)?;
    let owner_id = principal.id().unwrap_or_default().to_string();

    let property = Property::create(
        uuid::Uuid::new_v4().to_string(),
        owner_id,
        details,
        Utc::now(),
    );
    let created = state.store.insert(Entity::Property(property)).await?;
    tracing::info!(property = created.id(), "property created");

    let ability = Ability::for_principal(&principal);
    Ok((StatusCode::CREATED, Json(readable(&ability, &created)?)))
}

pub async fn get_property(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Projected>, ApiError> {
    let principal = state.principal(&headers, Access::GuestAllowed).await?;
    let ability = Ability::for_principal(&principal);
    Ok(Json(
        read_one(&state, &ability, EntityKind::Property, &id).await?,
    ))
}

pub async fn update_property(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Projected>, ApiError> {
    let principal = state.principal(&headers, Access::Required).await?;
    state.validators.validate(Schema::PropertyUpdate, &body)?;
    let body = as_object(body)?;

    let ability = Ability::for_principal(&principal);
    let property = load(&state, EntityKind::Property, &id).await?;
    let mut property = updated(&ability, &property, &body)?;
    if let Entity::Property(property) = &mut property {
        property.updated_at = Utc::now();
    }
    let saved = state.store.replace(property).await?;
    tracing::info!(property = saved.id(), "property updated");
    Ok(Json(readable(&ability, &saved)?))
}

pub async fn delete_property(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Projected>, ApiError> {
    let principal = state.principal(&headers, Access::Required).await?;
    let ability = Ability::for_principal(&principal);
    Ok(Json(
        delete_one(&state, &ability, EntityKind::Property, &id).await?,
    ))
}
