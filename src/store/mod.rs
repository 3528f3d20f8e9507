pub mod document;
pub mod filter;
pub mod memory;

pub use filter::Filter;
pub use memory::InMemoryStore;

use crate::models::{Entity, EntityKind, Role, User};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    /// Document path, e.g. `createdAt` or `price`
    pub path: String,
    pub direction: SortDirection,
}

/// Sorting and paging for `find`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub sort: Option<Sort>,
    pub skip: u64,
    pub limit: Option<u64>,
}

/// Document persistence, one collection per entity kind.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fails with `Conflict` on a duplicate id or user email.
    async fn insert(&self, entity: Entity) -> StoreResult<Entity>;

    async fn find_by_id(&self, kind: EntityKind, id: &str) -> StoreResult<Option<Entity>>;

    async fn find(
        &self,
        kind: EntityKind,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<Entity>>;

    async fn count(&self, kind: EntityKind, filter: &Filter) -> StoreResult<u64>;

    /// Replaces the stored document with the same id.
    async fn replace(&self, entity: Entity) -> StoreResult<Entity>;

    /// Removes and returns the stored document.
    async fn delete(&self, kind: EntityKind, id: &str) -> StoreResult<Entity>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn list_roles(&self) -> StoreResult<Vec<Role>>;

    async fn insert_role(&self, role: Role) -> StoreResult<Role>;

    /// Get the name of the backend
    fn backend_name(&self) -> &'static str;
}

/// Seeds the fixed role set when the role collection is empty.
pub async fn seed_roles(store: &dyn DocumentStore) -> StoreResult<Vec<Role>> {
    let existing = store.list_roles().await?;
    if !existing.is_empty() {
        return Ok(existing);
    }
    let mut roles = Vec::new();
    for name in crate::models::RoleName::ALL {
        tracing::info!(role = name.as_str(), "creating role");
        let role = Role {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.as_str().to_string(),
        };
        roles.push(store.insert_role(role).await?);
    }
    Ok(roles)
}
