//! Resolution of the calling principal from request headers.
pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenIssuer};

use crate::models::{EntityKind, User};
use crate::permissions::Principal;
use crate::store::{DocumentStore, StoreError};
use axum::http::HeaderMap;
use thiserror::Error;

pub const TOKEN_HEADER: &str = "x-access-token";

/// Whether a route accepts callers without a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    GuestAllowed,
    Required,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("you need to provide an authorization token in the x-access-token header")]
    MissingToken,
    #[error("the authorization token is invalid or expired")]
    InvalidToken,
    #[error("the user of this token no longer exists")]
    UnknownUser,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Reads the token header and loads the calling user.
///
/// Without a token the caller is a guest where `access` allows it. Role ids
/// that cannot be resolved to names leave the principal with no roles.
pub async fn resolve_principal(
    store: &dyn DocumentStore,
    tokens: &TokenIssuer,
    headers: &HeaderMap,
    access: Access,
) -> Result<Principal, AuthError> {
    let token = headers
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty());
    let Some(token) = token else {
        return match access {
            Access::GuestAllowed => Ok(Principal::Guest),
            Access::Required => Err(AuthError::MissingToken),
        };
    };

    let claims = tokens.verify(token).map_err(|err| {
        tracing::debug!(error = %err, "rejected access token");
        AuthError::InvalidToken
    })?;

    let user = store
        .find_by_id(EntityKind::User, &claims.id)
        .await?
        .and_then(|entity| entity.as_user().cloned())
        .ok_or(AuthError::UnknownUser)?;

    let role_names = role_names(store, &user).await;
    Ok(Principal::authenticated(user.id, role_names))
}

/// Names of the user's roles.
pub async fn role_names(store: &dyn DocumentStore, user: &User) -> Vec<String> {
    match store.list_roles().await {
        Ok(roles) => roles
            .into_iter()
            .filter(|role| user.roles.contains(&role.id))
            .map(|role| role.name)
            .collect(),
        Err(err) => {
            tracing::warn!(user = %user.id, error = %err, "role lookup failed, continuing without roles");
            Vec::new()
        }
    }
}
