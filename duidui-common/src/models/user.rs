use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    /// Account id at the identity provider. 0 for locally configured admins.
    pub external_id: i64,
    pub username: String,
    pub name: String,
    pub trust_level: i64,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile as reported after a login; used to create or refresh a `User`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserProfile {
    pub external_id: i64,
    pub username: String,
    pub name: String,
    pub trust_level: i64,
    pub is_admin: bool,
}

impl UserProfile {
    pub fn apply_to(&self, user: &mut User, now: DateTime<Utc>) {
        user.username = self.username.clone();
        user.name = self.name.clone();
        user.trust_level = self.trust_level;
        user.is_admin = self.is_admin;
        user.updated_at = now;
    }
}
