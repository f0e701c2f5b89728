use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Error;
use crate::models::{
    Cdk, CdkFilter, ImportResult, RedeemLog, Tier, TierDraft, User, UserProfile,
};

#[async_trait]
pub trait TierRepository: Send + Sync {
    async fn create_tier(&self, draft: &TierDraft) -> Result<Tier, Error>;
    async fn get_tier(&self, tier_id: i64) -> Result<Option<Tier>, Error>;
    /// Insertion order. `stock` is whatever was stored; callers overwrite it.
    async fn list_tiers(&self) -> Result<Vec<Tier>, Error>;
    /// Returns `None` if no tier has that id.
    async fn update_tier(&self, tier_id: i64, draft: &TierDraft) -> Result<Option<Tier>, Error>;
    /// Returns `false` if no tier has that id.
    async fn delete_tier(&self, tier_id: i64) -> Result<bool, Error>;
}

/// Store for CDK rows.
///
/// Every mutating method is a single atomic step against the store: no two
/// concurrent calls may observe the same pre-state and both act on it.
#[async_trait]
pub trait CdkRepository: Send + Sync {
    async fn list_cdks(&self, filter: &CdkFilter) -> Result<Vec<Cdk>, Error>;

    /// Inserts plaintext `codes` into `tier_id`, skipping blanks and
    /// reporting duplicates (against the table and within the batch).
    async fn insert_codes(&self, tier_id: i64, codes: &[String]) -> Result<ImportResult, Error>;

    /// Marks the lowest-id available CDK of `tier_id` as redeemed by
    /// `user_id` and returns it. `Error::Exhausted` if there is none.
    async fn reserve_available(&self, tier_id: i64, user_id: i64) -> Result<Cdk, Error>;

    /// `Error::NotFound` for an unknown id, `Error::Conflict` for a
    /// redeemed code.
    async fn revoke_cdk(&self, cdk_id: i64) -> Result<Cdk, Error>;
}

#[async_trait]
pub trait RedeemLogRepository: Send + Sync {
    async fn append_log(
        &self,
        user_id: i64,
        cdk_id: i64,
        tier_id: i64,
        at: DateTime<Utc>,
    ) -> Result<RedeemLog, Error>;
    async fn list_logs_for_user(&self, user_id: i64) -> Result<Vec<RedeemLog>, Error>;
    async fn list_logs(&self) -> Result<Vec<RedeemLog>, Error>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates the user on first sight of `external_id`, otherwise refreshes
    /// the profile fields.
    async fn upsert_user(&self, profile: &UserProfile) -> Result<User, Error>;
    async fn get_user(&self, user_id: i64) -> Result<Option<User>, Error>;
    async fn get_user_by_external_id(&self, external_id: i64) -> Result<Option<User>, Error>;
    async fn list_users(&self) -> Result<Vec<User>, Error>;
}

/// One-time login verification states shared by every process on the
/// data directory.
#[async_trait]
pub trait LoginStateRepository: Send + Sync {
    /// Stores and returns a fresh random state.
    async fn issue_state(&self) -> Result<String, Error>;

    /// Removes `state` and returns true only if it existed and had not
    /// expired. A second call with the same state always returns false.
    async fn consume_state(&self, state: &str) -> Result<bool, Error>;
}
