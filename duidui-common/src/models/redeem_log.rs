// File: duidui-common/src/models/redeem_log.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Append-only record of one successful redemption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedeemLog {
    pub id: i64,
    pub user_id: i64,
    pub cdk_id: i64,
    pub tier_id: i64,
    pub created_at: DateTime<Utc>,
}

/// What the caller of a redemption gets back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedeemOutcome {
    pub tier_id: i64,
    pub tier_name: String,
    pub cdk_id: i64,
    /// Decoded code, handed to the user in plaintext.
    pub plain_code: String,
    pub redeemed_at: DateTime<Utc>,

    /// Set when the code was reserved but the redemption log could not be
    /// written. The redemption itself still stands.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_warning: Option<String>,
}

/// A log row joined with its tier name and decoded code, for history views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedemptionView {
    pub log_id: i64,
    pub user_id: i64,
    pub tier_id: i64,
    /// Empty when the tier has since been deleted.
    pub tier_name: String,
    pub cdk_id: i64,
    /// `***` when the stored code is missing or cannot be decoded.
    pub cdk_code: String,
    pub redeemed_at: DateTime<Utc>,
}
