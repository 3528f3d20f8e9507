//! HTTP handlers. Every handler resolves the caller, builds its ability for
//! the request, gates the operation on it and projects what it returns.
pub mod error;
pub mod messages;
pub mod properties;
pub mod schemas;
pub mod types;
pub mod users;

use crate::app::AppState;
use crate::models::{Entity, EntityKind};
use crate::permissions::{apply_update, project, rejected_keys, Ability, Action};
use error::{api_internal, api_invalid_argument, api_not_found, ApiError};
use serde_json::{Map, Value};
use types::Projected;

pub(crate) async fn load(
    state: &AppState,
    kind: EntityKind,
    id: &str,
) -> Result<Entity, ApiError> {
    state.store.find_by_id(kind, id).await?.ok_or_else(|| {
        api_not_found(&format!(
            "The requested {} does not exist",
            kind.as_str().to_lowercase()
        ))
    })
}

/// Projection of `entity` onto the fields the ability may read.
pub(crate) fn readable(ability: &Ability, entity: &Entity) -> Result<Projected, ApiError> {
    let fields = ability.accessible_fields(Action::Read, entity);
    project(entity, &fields).map_err(|err| api_internal("failed to render entity", &err))
}

pub(crate) async fn read_one(
    state: &AppState,
    ability: &Ability,
    kind: EntityKind,
    id: &str,
) -> Result<Projected, ApiError> {
    let entity = load(state, kind, id).await?;
    ability.ensure(Action::Read, &entity)?;
    readable(ability, &entity)
}

/// Applies the updatable part of `body` to `entity`.
pub(crate) fn updated(
    ability: &Ability,
    entity: &Entity,
    body: &Map<String, Value>,
) -> Result<Entity, ApiError> {
    ability.ensure(Action::Update, entity)?;
    let fields = ability.accessible_fields(Action::Update, entity);
    let dropped = rejected_keys(body, &fields);
    if !dropped.is_empty() {
        tracing::debug!(
            kind = %entity.kind(),
            id = entity.id(),
            ?dropped,
            "ignoring fields the caller may not update"
        );
    }
    Ok(apply_update(entity, body, &fields)?)
}

pub(crate) async fn delete_one(
    state: &AppState,
    ability: &Ability,
    kind: EntityKind,
    id: &str,
) -> Result<Projected, ApiError> {
    let entity = load(state, kind, id).await?;
    ability.ensure(Action::Delete, &entity)?;
    let removed = state.store.delete(kind, id).await?;
    tracing::info!(kind = %kind, id, "deleted");
    readable(ability, &removed)
}

pub(crate) fn as_object(body: Value) -> Result<Map<String, Value>, ApiError> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(api_invalid_argument("request body must be a JSON object", None)),
    }
}
