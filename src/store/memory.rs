//! In-memory implementation of the document store.
//!
//! Each entity kind lives in its own collection guarded by a
//! `tokio::sync::RwLock`, so reads proceed concurrently and writes are
//! serialized per collection. Filters and sorting run over the persisted
//! document shape produced by [`to_document`]. Nothing survives a restart.
use super::document::to_document;
use super::{
    DocumentStore, Filter, FindOptions, SortDirection, StoreError, StoreResult,
};
use crate::models::{Entity, EntityKind, Role, User};
use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct Stored {
    /// Insertion sequence, used as the sort tie-breaker.
    seq: u64,
    entity: Entity,
    document: Value,
}

type Collection = Arc<RwLock<HashMap<String, Stored>>>;

#[derive(Clone, Default)]
pub struct InMemoryStore {
    users: Collection,
    properties: Collection,
    messages: Collection,
    roles: Arc<RwLock<Vec<Role>>>,
    next_seq: Arc<AtomicU64>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn collection(&self, kind: EntityKind) -> &Collection {
        match kind {
            EntityKind::User => &self.users,
            EntityKind::Property => &self.properties,
            EntityKind::Message => &self.messages,
        }
    }

    fn email_taken(items: &HashMap<String, Stored>, user: &User) -> bool {
        items.values().any(|stored| {
            stored
                .entity
                .as_user()
                .is_some_and(|other| other.id != user.id && other.email == user.email)
        })
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn insert(&self, entity: Entity) -> StoreResult<Entity> {
        let mut items = self.collection(entity.kind()).write().await;
        if items.contains_key(entity.id()) {
            return Err(StoreError::Conflict(format!(
                "{} {} already exists",
                entity.kind(),
                entity.id()
            )));
        }
        if let Some(user) = entity.as_user() {
            if Self::email_taken(&items, user) {
                return Err(StoreError::Conflict(format!(
                    "email {} already registered",
                    user.email
                )));
            }
        }
        let stored = Stored {
            seq: self.next_seq.fetch_add(1, AtomicOrdering::Relaxed),
            document: to_document(&entity),
            entity: entity.clone(),
        };
        items.insert(entity.id().to_string(), stored);
        tracing::debug!(kind = %entity.kind(), id = entity.id(), "inserted document");
        Ok(entity)
    }

    async fn find_by_id(&self, kind: EntityKind, id: &str) -> StoreResult<Option<Entity>> {
        let items = self.collection(kind).read().await;
        Ok(items.get(id).map(|stored| stored.entity.clone()))
    }

    async fn find(
        &self,
        kind: EntityKind,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<Entity>> {
        let items = self.collection(kind).read().await;
        let mut matched: Vec<&Stored> = items
            .values()
            .filter(|stored| filter.matches(&stored.document))
            .collect();

        match &options.sort {
            Some(sort) => matched.sort_by(|a, b| {
                let ordering = compare_paths(&a.document, &b.document, &sort.path)
                    .then(a.seq.cmp(&b.seq));
                match sort.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            }),
            None => matched.sort_by_key(|stored| stored.seq),
        }

        let skip = usize::try_from(options.skip).unwrap_or(usize::MAX);
        let limit = options
            .limit
            .and_then(|limit| usize::try_from(limit).ok())
            .unwrap_or(usize::MAX);
        Ok(matched
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|stored| stored.entity.clone())
            .collect())
    }

    async fn count(&self, kind: EntityKind, filter: &Filter) -> StoreResult<u64> {
        let items = self.collection(kind).read().await;
        let count = items
            .values()
            .filter(|stored| filter.matches(&stored.document))
            .count();
        Ok(count as u64)
    }

    async fn replace(&self, entity: Entity) -> StoreResult<Entity> {
        let mut items = self.collection(entity.kind()).write().await;
        if let Some(user) = entity.as_user() {
            if Self::email_taken(&items, user) {
                return Err(StoreError::Conflict(format!(
                    "email {} already registered",
                    user.email
                )));
            }
        }
        let Some(stored) = items.get_mut(entity.id()) else {
            return Err(StoreError::NotFound(format!(
                "{} {}",
                entity.kind(),
                entity.id()
            )));
        };
        stored.document = to_document(&entity);
        stored.entity = entity.clone();
        tracing::debug!(kind = %entity.kind(), id = entity.id(), "replaced document");
        Ok(entity)
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> StoreResult<Entity> {
        let mut items = self.collection(kind).write().await;
        match items.remove(id) {
            Some(stored) => {
                tracing::debug!(kind = %kind, id, "deleted document");
                Ok(stored.entity)
            }
            None => Err(StoreError::NotFound(format!("{kind} {id}"))),
        }
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let items = self.users.read().await;
        Ok(items
            .values()
            .filter_map(|stored| stored.entity.as_user())
            .find(|user| user.email == email)
            .cloned())
    }

    async fn list_roles(&self) -> StoreResult<Vec<Role>> {
        Ok(self.roles.read().await.clone())
    }

    async fn insert_role(&self, role: Role) -> StoreResult<Role> {
        let mut roles = self.roles.write().await;
        if roles.iter().any(|r| r.name == role.name || r.id == role.id) {
            return Err(StoreError::Conflict(format!("role {} already exists", role.name)));
        }
        roles.push(role.clone());
        Ok(role)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// Orders two documents by a dotted path. Missing values sort first.
fn compare_paths(a: &Value, b: &Value, path: &str) -> Ordering {
    let get = |doc: &Value| {
        path.split('.')
            .try_fold(doc, |value, segment| value.get(segment))
            .cloned()
            .unwrap_or(Value::Null)
    };
    compare_values(&get(a), &get(b))
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
