//! User account handlers.
use super::error::{api_bad_request, api_forbidden, api_internal, api_unauthorized, ApiError};
use super::types::{Projected, SignInRequest, SignInResponse, UserCreateRequest};
use super::{as_object, delete_one, load, read_one, readable, updated};
use crate::app::AppState;
use crate::auth::{hash_password, verify_password, Access};
use crate::models::{Entity, EntityKind, RoleName, User};
use crate::permissions::{Ability, Action, Principal};
use crate::store::FindOptions;
use crate::validation::Schema;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value;

pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    state.validators.validate(Schema::UserCreate, &body)?;
    let request: UserCreateRequest = serde_json::from_value(body)?;
    if !state.is_valid_signup_code(&request.sign_up_code) {
        return Err(api_forbidden("The provided sign-up code is invalid"));
    }

    let role = state
        .store
        .list_roles()
        .await?
        .into_iter()
        .find(|role| RoleName::from_name(&role.name) == Some(RoleName::User))
        .ok_or_else(|| api_internal("cannot create user", &"user role is not seeded"))?;
    let password = hash_password(&request.password)
        .await
        .map_err(|err| api_internal("cannot create user", &err))?;

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        email: request.email,
        password,
        roles: vec![role.id],
    };
    let created = state.store.insert(Entity::User(user)).await?;
    tracing::info!(user = created.id(), "user created");

    let ability = Ability::for_principal(&Principal::authenticated(
        created.id(),
        [RoleName::User.as_str()],
    ));
    Ok((StatusCode::CREATED, Json(readable(&ability, &created)?)))
}

pub async fn sign_in(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<SignInResponse>, ApiError> {
    state.validators.validate(Schema::UserSignin, &body)?;
    let request: SignInRequest = serde_json::from_value(body)?;
    let Some(user) = state.store.find_user_by_email(&request.email).await? else {
        return Err(api_bad_request(
            "unknown_email",
            "There is no user with the provided email address",
        ));
    };
    let valid = verify_password(&request.password, &user.password)
        .await
        .map_err(|err| api_internal("cannot sign in", &err))?;
    if !valid {
        return Err(api_unauthorized("The provided password was invalid"));
    }
    let access_token = state
        .tokens
        .issue(&user.id)
        .map_err(|err| api_internal("cannot issue token", &err))?;
    tracing::info!(user = %user.id, "signed in");
    Ok(Json(SignInResponse {
        id: user.id,
        access_token,
    }))
}

pub async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Projected>>, ApiError> {
    let principal = state.principal(&headers, Access::Required).await?;
    let ability = Ability::for_principal(&principal);
    let filter = ability.accessible_by(Action::Read, EntityKind::User);
    let users = state
        .store
        .find(EntityKind::User, &filter, &FindOptions::default())
        .await?;
    let users = users
        .iter()
        .map(|user| readable(&ability, user))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Projected>, ApiError> {
    let principal = state.principal(&headers, Access::Required).await?;
    let ability = Ability::for_principal(&principal);
    Ok(Json(read_one(&state, &ability, EntityKind::User, &id).await?))
}

pub async fn update_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Projected>, ApiError> {
    let principal = state.principal(&headers, Access::Required).await?;
    state.validators.validate(Schema::UserUpdate, &body)?;
    let mut body = as_object(body)?;

    let ability = Ability::for_principal(&principal);
    let user = load(&state, EntityKind::User, &id).await?;
    ability.ensure(Action::Update, &user)?;
    if let Some(Value::String(raw)) = body.get("password").cloned() {
        let hashed = hash_password(&raw)
            .await
            .map_err(|err| api_internal("cannot update user", &err))?;
        body.insert("password".to_string(), Value::String(hashed));
    }

    let user = updated(&ability, &user, &body)?;
    let saved = state.store.replace(user).await?;
    tracing::info!(user = saved.id(), "user updated");
    Ok(Json(readable(&ability, &saved)?))
}

pub async fn delete_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Projected>, ApiError> {
    let principal = state.principal(&headers, Access::Required).await?;
    let ability = Ability::for_principal(&principal);
    Ok(Json(delete_one(&state, &ability, EntityKind::User, &id).await?))
}
