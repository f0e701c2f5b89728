use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pending login verification state, persisted between `login start`
/// and `login finish`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LoginState {
    pub id: i64,
    pub state: String,
    pub issued_at: DateTime<Utc>,
}
