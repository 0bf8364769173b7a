//! Operator account models.

use serde::{Deserialize, Serialize};

/// Role given to accounts provisioned without one.
pub const DEFAULT_ROLE: &str = "admin";

/// An operator account as stored. Never serialized: it carries the hash.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// bcrypt hash of the password
    pub password_hash: String,
    pub role: String,
    pub created_at: String,
}

impl User {
    /// Public view of the account.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            role: self.role.clone(),
        }
    }
}

/// The account fields returned to callers and embedded in tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub role: String,
}
