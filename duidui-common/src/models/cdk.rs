// File: duidui-common/src/models/cdk.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

/// Lifecycle state of a single CDK, persisted as its integer value.
///
/// `Locked` is reserved for a hold-and-confirm step that no current flow
/// produces. It is parsed, listed and revocable, but redemption never
/// selects a locked row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CdkStatus {
    Available = 0,
    Locked = 1,
    Redeemed = 2,
    Revoked = 3,
}

impl CdkStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, CdkStatus::Redeemed | CdkStatus::Revoked)
    }

    /// Forward-only transitions. Revoked -> Revoked is allowed so that a
    /// repeated revoke stays a success.
    pub fn can_transition_to(self, next: CdkStatus) -> bool {
        match (self, next) {
            (CdkStatus::Available | CdkStatus::Locked, CdkStatus::Redeemed) => true,
            (CdkStatus::Available | CdkStatus::Locked, CdkStatus::Revoked) => true,
            (CdkStatus::Revoked, CdkStatus::Revoked) => true,
            _ => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CdkStatus::Available => "available",
            CdkStatus::Locked => "locked",
            CdkStatus::Redeemed => "redeemed",
            CdkStatus::Revoked => "revoked",
        }
    }
}

impl From<CdkStatus> for u8 {
    fn from(status: CdkStatus) -> Self {
        status as u8
    }
}

impl TryFrom<u8> for CdkStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CdkStatus::Available),
            1 => Ok(CdkStatus::Locked),
            2 => Ok(CdkStatus::Redeemed),
            3 => Ok(CdkStatus::Revoked),
            other => Err(format!("unknown CDK status {other}")),
        }
    }
}

impl fmt::Display for CdkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CdkStatus {
    type Err = Error;

    /// Accepts either the name ("redeemed") or the stored integer ("2").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u8>() {
            return CdkStatus::try_from(n).map_err(Error::Validation);
        }
        match s.to_ascii_lowercase().as_str() {
            "available" => Ok(CdkStatus::Available),
            "locked" => Ok(CdkStatus::Locked),
            "redeemed" => Ok(CdkStatus::Redeemed),
            "revoked" => Ok(CdkStatus::Revoked),
            other => Err(Error::Validation(format!("unknown CDK status '{other}'"))),
        }
    }
}

/// One single-use redemption code. Field order matches the `cdk` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cdk {
    pub id: i64,
    pub tier_id: i64,
    /// Stored in obfuscated form, never plaintext.
    pub code: String,
    pub status: CdkStatus,
    /// Unused placeholder, always 0.
    pub order_id: i64,
    #[serde(deserialize_with = "zero_as_none")]
    pub redeemed_by: Option<i64>,
    pub redeemed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Older tables write `0` for "nobody".
fn zero_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.filter(|id| *id != 0))
}

impl Cdk {
    pub fn new_available(id: i64, tier_id: i64, code: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            tier_id,
            code,
            status: CdkStatus::Available,
            order_id: 0,
            redeemed_by: None,
            redeemed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_available_in(&self, tier_id: i64) -> bool {
        self.tier_id == tier_id && self.status == CdkStatus::Available
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CdkFilter {
    pub tier_id: Option<i64>,
    pub status: Option<CdkStatus>,
}

impl CdkFilter {
    pub fn matches(&self, cdk: &Cdk) -> bool {
        self.tier_id.is_none_or(|t| cdk.tier_id == t)
            && self.status.is_none_or(|s| cdk.status == s)
    }
}

/// Mixed outcome of a batch import. Duplicates are reported here rather
/// than failing the whole call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    pub success_count: usize,
    pub failed_count: usize,
    pub failed_codes: Vec<String>,
    /// Set when the tier was deleted while the import ran, leaving the new
    /// codes orphaned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
