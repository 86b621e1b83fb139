use std::fmt;

use serde::{Deserialize, Serialize};

/// Console roles as reported by `/api/auth/me`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::Staff => f.write_str("staff"),
        }
    }
}

/// The authenticated user. Always replaced as a whole, never patched.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl Identity {
    pub fn new(id: i64, username: impl Into<String>, role: Role) -> Self {
        Identity {
            id,
            username: username.into(),
            role,
        }
    }
}
