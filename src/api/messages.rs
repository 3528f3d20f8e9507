//! Buyer enquiry handlers. Messages are addressed to the owner of the
//! listing they are about; only the receiver (or an admin) can see them.
use super::error::{api_not_found, ApiError};
use super::types::{MessageListResponse, Projected};
use super::{as_object, delete_one, load, read_one, readable, updated};
use crate::app::AppState;
use crate::auth::Access;
use crate::models::{Entity, EntityKind, Message, NewMessage};
use crate::permissions::{Ability, Action};
use crate::search::{MessageSearch, Pagination};
use crate::validation::Schema;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value;
use std::collections::HashMap;

pub async fn list_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<MessageListResponse>, ApiError> {
    let principal = state.principal(&headers, Access::Required).await?;
    state
        .validators
        .validate_params(Schema::MessageSearch, &params)?;
    let pagination = Pagination::from_params(&params)?;
    let search = MessageSearch::from_params(&params).to_filters();

    let ability = Ability::for_principal(&principal);
    let filter = ability
        .accessible_by(Action::Read, EntityKind::Message)
        .and_all(search);
    let messages = state
        .store
        .find(EntityKind::Message, &filter, &pagination.find_options())
        .await?;
    let message_count = state.store.count(EntityKind::Message, &filter).await?;

    let messages = messages
        .iter()
        .map(|message| readable(&ability, message))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(MessageListResponse {
        messages,
        page: pagination.page,
        results_per_page: pagination.results_per_page,
        message_count,
        page_count: pagination.page_count(message_count),
    }))
}

/// Sends an enquiry about a listing. Guests may send messages; the response
/// only shows what the sender is allowed to read of the stored message.
pub async fn create_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = state.principal(&headers, Access::GuestAllowed).await?;
    state.validators.validate(Schema::MessageCreate, &body)?;
    let details: NewMessage = serde_json::from_value(body)?;

    let ability = Ability::for_principal(&principal);
    let property = load(&state, EntityKind::Property, &details.property_id).await?;
    let Some(receiver) = property
        .as_property()
        .filter(|_| ability.can(Action::Read, &property))
        .map(|property| property.owner_id.clone())
    else {
        return Err(api_not_found("The requested property does not exist"));
    };

    let message = Message::create(uuid::Uuid::new_v4().to_string(), details, receiver);
    let created = state.store.insert(Entity::Message(message)).await?;
    tracing::info!(
        message_id = created.id(),
        property = %property.id(),
        "message sent"
    );
    Ok((StatusCode::CREATED, Json(readable(&ability, &created)?)))
}

pub async fn get_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Projected>, ApiError> {
    let principal = state.principal(&headers, Access::Required).await?;
    let ability = Ability::for_principal(&principal);
    Ok(Json(
        read_one(&state, &ability, EntityKind::Message, &id).await?,
    ))
}

/// Changes the status of a message.
pub async fn update_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Projected>, ApiError> {
    let principal = state.principal(&headers, Access::Required).await?;
    state.validators.validate(Schema::MessageUpdate, &body)?;
    let body = as_object(body)?;

    let ability = Ability::for_principal(&principal);
    let message = load(&state, EntityKind::Message, &id).await?;
    let message = updated(&ability, &message, &body)?;
    let saved = state.store.replace(message).await?;
    tracing::info!(message_id = saved.id(), "message updated");
    Ok(Json(readable(&ability, &saved)?))
}

pub async fn delete_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Projected>, ApiError> {
    let principal = state.principal(&headers, Access::Required).await?;
    let ability = Ability::for_principal(&principal);
    Ok(Json(
        delete_one(&state, &ability, EntityKind::Message, &id).await?,
    ))
}
