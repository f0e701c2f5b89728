// File: duidui-core/src/test_utils/helpers.rs

use std::sync::Arc;

use duidui_common::models::{Tier, TierDraft};
use tempfile::TempDir;

use crate::Error;
use crate::db::Database;
use crate::repositories::{CsvCdkRepository, CsvRedeemLogRepository, CsvTierRepository, CsvUserRepository};
use crate::services::{CdkService, RedeemService, TierService, UserService};

/// Opens a database in a fresh temporary directory. Keep the `TempDir`
/// alive for as long as the database is used.
pub async fn setup_test_database() -> Result<(TempDir, Database), Error> {
    let dir = tempfile::tempdir()?;
    let db = Database::open(dir.path()).await?;
    Ok((dir, db))
}

/// Every service wired against the CSV repositories of one database.
pub struct TestServices {
    pub tiers: TierService,
    pub cdks: CdkService,
    pub redeem: RedeemService,
    pub users: UserService,
}

pub fn build_services(db: &Database) -> TestServices {
    let tier_repo = Arc::new(CsvTierRepository::new(db.tiers()));
    let cdk_repo = Arc::new(CsvCdkRepository::new(db.cdks()));
    let log_repo = Arc::new(CsvRedeemLogRepository::new(db.redeem_logs()));
    let user_repo = Arc::new(CsvUserRepository::new(db.users()));

    TestServices {
        tiers: TierService::new(tier_repo.clone(), cdk_repo.clone()),
        cdks: CdkService::new(tier_repo.clone(), cdk_repo.clone()),
        redeem: RedeemService::new(tier_repo, cdk_repo, log_repo),
        users: UserService::new(user_repo),
    }
}

/// An active tier with quota 1 and no level or daily limit.
pub fn tier_draft(name: &str) -> TierDraft {
    TierDraft {
        name: name.to_string(),
        quota: 1,
        required_level: 0,
        daily_limit: 0,
        sort_order: 0,
        is_active: true,
    }
}

/// Creates an active tier and imports `codes` into it.
pub async fn seed_tier(services: &TestServices, name: &str, codes: &[&str]) -> Result<Tier, Error> {
    let tier = services.tiers.create_tier(&tier_draft(name)).await?;
    if !codes.is_empty() {
        let codes: Vec<String> = codes.iter().map(|c| c.to_string()).collect();
        services.cdks.import_codes(tier.id, &codes).await?;
    }
    services.tiers.get_tier(tier.id).await
}
