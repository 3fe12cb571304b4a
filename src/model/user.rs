//! The authenticated identity returned by `GET /auth/ping`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Roles a user may hold. The server sends them as plain strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserRole {
    User,
    Moderator,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "User",
            UserRole::Moderator => "Moderator",
            UserRole::Admin => "Admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of the caller.
///
/// `roles` is kept as the raw strings so an unknown role from the server never fails decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: i64,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl User {
    pub fn new(user_id: i64, roles: &[UserRole]) -> Self {
        Self {
            user_id,
            roles: roles.iter().map(|r| r.as_str().to_string()).collect(),
        }
    }

    pub fn has_role(&self, role: UserRole) -> bool {
        self.roles.iter().any(|r| r == role.as_str())
    }
}
