// File: duidui-common/src/models/tier.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A named reward level that CDKs are loaded into.
///
/// Field order matches the `tier` table columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub id: i64,
    pub name: String,
    /// Informational grant size shown to users.
    pub quota: i64,
    pub required_level: i64,
    pub daily_limit: i64,
    /// Derived from the CDK table on every read. The stored value is a
    /// placeholder and is never trusted.
    pub stock: i64,
    pub is_active: bool,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin-supplied fields for creating or replacing a tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierDraft {
    pub name: String,
    pub quota: i64,
    pub required_level: i64,
    pub daily_limit: i64,
    pub sort_order: i64,
    pub is_active: bool,
}

impl TierDraft {
    pub fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("tier name must not be empty".into()));
        }
        for (field, value) in [
            ("quota", self.quota),
            ("required_level", self.required_level),
            ("daily_limit", self.daily_limit),
        ] {
            if value < 0 {
                return Err(Error::Validation(format!(
                    "{field} must not be negative, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Copies the draft onto an existing tier, leaving id, stock and
    /// created_at untouched.
    pub fn apply_to(&self, tier: &mut Tier, now: DateTime<Utc>) {
        tier.name = self.name.trim().to_string();
        tier.quota = self.quota;
        tier.required_level = self.required_level;
        tier.daily_limit = self.daily_limit;
        tier.sort_order = self.sort_order;
        tier.is_active = self.is_active;
        tier.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, quota: i64) -> TierDraft {
        TierDraft {
            name: name.to_string(),
            quota,
            required_level: 0,
            daily_limit: 1,
            sort_order: 0,
            is_active: true,
        }
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let err = draft("   ", 10).validate().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_validate_rejects_negative_quota() {
        let err = draft("Gold", -1).validate().unwrap_err();
        assert!(matches!(err, Error::Validation(msg) if msg.contains("quota")));
    }

    #[test]
    fn test_apply_to_keeps_identity() {
        let created = Utc::now() - chrono::Duration::days(1);
        let mut tier = Tier {
            id: 7,
            name: "Old".into(),
            quota: 1,
            required_level: 0,
            daily_limit: 0,
            stock: 0,
            is_active: false,
            sort_order: 0,
            created_at: created,
            updated_at: created,
        };
        let now = Utc::now();
        draft("  Gold ", 10).apply_to(&mut tier, now);

        assert_eq!(tier.id, 7);
        assert_eq!(tier.name, "Gold");
        assert_eq!(tier.quota, 10);
        assert!(tier.is_active);
        assert_eq!(tier.created_at, created);
        assert_eq!(tier.updated_at, now);
    }
}
