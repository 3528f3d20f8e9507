//! HTTP application wiring.
//!
//! Builds the axum router, configures middleware, and defines the shared
//! state injected into handlers.
use crate::api;
use crate::api::error::ApiError;
use crate::auth::{self, Access, TokenIssuer, TOKEN_HEADER};
use crate::config::AppConfig;
use crate::permissions::Principal;
use crate::store::DocumentStore;
use crate::validation::Validators;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub tokens: TokenIssuer,
    pub validators: Arc<Validators>,
    pub signup_codes: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        config: &AppConfig,
        validators: Validators,
    ) -> Self {
        Self {
            store,
            tokens: TokenIssuer::new(&config.jwt_secret, config.token_ttl),
            validators: Arc::new(validators),
            signup_codes: Arc::new(config.signup_codes.clone()),
        }
    }

    pub async fn principal(
        &self,
        headers: &HeaderMap,
        access: Access,
    ) -> Result<Principal, ApiError> {
        Ok(auth::resolve_principal(self.store.as_ref(), &self.tokens, headers, access).await?)
    }

    pub fn is_valid_signup_code(&self, code: &str) -> bool {
        self.signup_codes.iter().any(|valid| valid == code)
    }
}

pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            )
        });

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            HeaderName::from_static(TOKEN_HEADER),
        ]);
    match HeaderValue::from_str(cors_origin) {
        Ok(origin) => cors = cors.allow_origin(origin),
        Err(err) => tracing::warn!(origin = cors_origin, error = %err, "ignoring invalid CORS origin"),
    }

    Router::new()
        .route("/users", get(api::users::list_users).post(api::users::create_user))
        .route("/users/signin", post(api::users::sign_in))
        .route(
            "/users/:id",
            get(api::users::get_user)
                .put(api::users::update_user)
                .delete(api::users::delete_user),
        )
        .route(
            "/properties",
            get(api::properties::list_properties).post(api::properties::create_property),
        )
        .route(
            "/properties/:id",
            get(api::properties::get_property)
                .put(api::properties::update_property)
                .delete(api::properties::delete_property),
        )
        .route(
            "/messages",
            get(api::messages::list_messages).post(api::messages::create_message),
        )
        .route(
            "/messages/:id",
            get(api::messages::get_message)
                .put(api::messages::update_message)
                .delete(api::messages::delete_message),
        )
        .route("/schemas", get(api::schemas::list_schemas))
        .route("/schemas/:name", get(api::schemas::get_schema))
        .layer(cors)
        .layer(trace_layer)
        .with_state(state)
}
