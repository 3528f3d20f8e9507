use serde::{Deserialize, Serialize};

/// Role names recognised by the permission model
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RoleName {
    User,
    Admin,
}

impl RoleName {
    pub const ALL: [RoleName; 2] = [RoleName::User, RoleName::Admin];

    pub fn as_str(self) -> &'static str {
        match self {
            RoleName::User => "user",
            RoleName::Admin => "admin",
        }
    }

    /// Unrecognised names yield `None` rather than an error.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(name))
    }
}

/// A stored role document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Role {
    pub id: String,
    pub name: String,
}

/// Account of an agent using the platform
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    /// bcrypt hash, never the raw password
    pub password: String,
    /// Role ids
    #[serde(default)]
    pub roles: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_parse_case_insensitively() {
        assert_eq!(RoleName::from_name("user"), Some(RoleName::User));
        assert_eq!(RoleName::from_name("ADMIN"), Some(RoleName::Admin));
        assert_eq!(RoleName::from_name("superuser"), None);
    }
}
