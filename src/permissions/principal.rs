use crate::models::RoleName;
use std::collections::BTreeSet;

/// Caller on whose behalf a request runs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Principal {
    #[default]
    Guest,
    Authenticated {
        id: String,
        roles: BTreeSet<RoleName>,
    },
}

impl Principal {
    /// Builds an authenticated principal from stored role names.
    /// Names outside the fixed role set contribute nothing.
    pub fn authenticated<I, S>(id: impl Into<String>, role_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let id = id.into();
        let roles = role_names
            .into_iter()
            .filter_map(|name| {
                let name = name.as_ref();
                let role = RoleName::from_name(name);
                if role.is_none() {
                    tracing::debug!(principal = %id, role = name, "ignoring unknown role");
                }
                role
            })
            .collect();
        Principal::Authenticated { id, roles }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Principal::Guest => None,
            Principal::Authenticated { id, .. } => Some(id),
        }
    }

    pub fn has_role(&self, role: RoleName) -> bool {
        match self {
            Principal::Guest => false,
            Principal::Authenticated { roles, .. } => roles.contains(&role),
        }
    }
}
