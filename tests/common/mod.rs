#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use estate_agent::models::{
    Entity, Location, Message, MessageStatus, Price, Priority, Property, PropertyStatus,
    PropertyType, Role, RoleName, User,
};
use estate_agent::store::{seed_roles, DocumentStore, InMemoryStore};
use estate_agent::validation::Validators;
use estate_agent::{build_router, AppConfig, AppState};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const SIGNUP_CODE: &str = "we_sell_houses_agent";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: InMemoryStore,
    roles: Vec<Role>,
}

pub fn test_config() -> AppConfig {
    AppConfig {
        bind_addr: "127.0.0.1:0".parse().expect("addr"),
        jwt_secret: "test-secret".to_string(),
        token_ttl: std::time::Duration::from_secs(3600),
        signup_codes: vec![SIGNUP_CODE.to_string()],
        cors_origin: "http://localhost:3000".to_string(),
    }
}

impl TestApp {
    pub async fn new() -> Self {
        let store = InMemoryStore::new();
        let roles = seed_roles(&store).await.expect("roles");
        let shared: Arc<dyn DocumentStore> = Arc::new(store.clone());
        let config = test_config();
        let state = AppState::new(shared, &config, Validators::compile().expect("schemas"));
        let router = build_router(state.clone(), &config.cors_origin);
        Self {
            router,
            state,
            store,
            roles,
        }
    }

    fn role_ids(&self, names: &[RoleName]) -> Vec<String> {
        self.roles
            .iter()
            .filter(|role| names.iter().any(|name| name.as_str() == role.name))
            .map(|role| role.id.clone())
            .collect()
    }

    /// Stores a user directly and returns an access token for it.
    pub async fn add_user(&self, id: &str, roles: &[RoleName]) -> String {
        let user = User {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            password: "$2b$10$not-a-real-hash".to_string(),
            roles: self.role_ids(roles),
        };
        self.store.insert(Entity::User(user)).await.expect("user");
        self.state.tokens.issue(id).expect("token")
    }

    pub async fn add_property(
        &self,
        id: &str,
        owner: &str,
        status: PropertyStatus,
        age_days: i64,
    ) -> Property {
        let created = Utc::now() - Duration::days(age_days);
        let property = Property {
            id: id.to_string(),
            title: format!("Property {id}"),
            description: Some("A lovely home with a garden".to_string()),
            owner_id: owner.to_string(),
            kind: PropertyType::SemiDetached,
            status,
            priority: Priority::Normal,
            features: vec!["garden".to_string(), "garage".to_string()],
            price: Price::from_pence(25_000_000),
            location: Some(Location {
                address_line1: "1 High Street".to_string(),
                address_line2: None,
                town: "Coventry".to_string(),
                county: Some("West Midlands".to_string()),
                postcode: "CV1 5FB".to_string(),
            }),
            created_at: created,
            updated_at: created,
        };
        self.store
            .insert(Entity::Property(property.clone()))
            .await
            .expect("property");
        property
    }

    pub async fn add_message(&self, id: &str, property: &str, receiver: &str) -> Message {
        let message = Message {
            id: id.to_string(),
            body: "Is it still available?".to_string(),
            status: MessageStatus::Sent,
            sender_email: "buyer@example.com".to_string(),
            sender_phone: None,
            property_id: property.to_string(),
            receiver_user_id: receiver.to_string(),
        };
        self.store
            .insert(Entity::Message(message.clone()))
            .await
            .expect("message");
        message
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request(method, uri, token, body))
            .await
            .expect("response");
        let status = response.status();
        (status, read_json(response).await)
    }
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("host", "estate.test");
    if let Some(token) = token {
        builder = builder.header("x-access-token", token);
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("json")
}

/// Sorted keys of a JSON object.
pub fn keys(value: &Value) -> Vec<String> {
    let mut keys: Vec<String> = value
        .as_object()
        .expect("object")
        .keys()
        .cloned()
        .collect();
    keys.sort();
    keys
}
