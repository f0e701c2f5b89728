use std::sync::Arc;

use duidui_common::models::{Cdk, CdkFilter, ImportResult};
use duidui_common::traits::repository_traits::{CdkRepository, TierRepository};
use tracing::{info, warn};

use crate::Error;

/// Admin operations on CDKs: bulk import, listing, revocation.
pub struct CdkService {
    tier_repo: Arc<dyn TierRepository + Send + Sync>,
    cdk_repo: Arc<dyn CdkRepository + Send + Sync>,
}

impl CdkService {
    pub fn new(
        tier_repo: Arc<dyn TierRepository + Send + Sync>,
        cdk_repo: Arc<dyn CdkRepository + Send + Sync>,
    ) -> Self {
        Self { tier_repo, cdk_repo }
    }

    /// Imports plaintext codes into an existing tier as one store mutation.
    /// Duplicates do not fail the call; they come back in `failed_codes`.
    pub async fn import_codes(&self, tier_id: i64, raw_codes: &[String]) -> Result<ImportResult, Error> {
        if raw_codes.is_empty() {
            return Err(Error::Validation("code list must not be empty".into()));
        }
        if self.tier_repo.get_tier(tier_id).await?.is_none() {
            return Err(Error::NotFound(format!("tier {tier_id} does not exist")));
        }

        let mut result = self.cdk_repo.insert_codes(tier_id, raw_codes).await?;
        info!(
            "Imported into tier id={}: {} added, {} duplicate",
            tier_id, result.success_count, result.failed_count
        );

        // tiers and CDKs are locked separately; a delete may have landed in between
        if result.success_count > 0 && self.tier_repo.get_tier(tier_id).await?.is_none() {
            warn!(
                "Tier id={} was deleted during import; {} new codes are orphaned",
                tier_id, result.success_count
            );
            result.warning = Some(format!(
                "tier {tier_id} was deleted during the import; {} codes were stored without a tier",
                result.success_count
            ));
        }
        Ok(result)
    }

    /// Rows as stored; `code` is still in obfuscated form.
    pub async fn list_cdks(&self, filter: &CdkFilter) -> Result<Vec<Cdk>, Error> {
        self.cdk_repo.list_cdks(filter).await
    }

    pub async fn revoke_cdk(&self, cdk_id: i64) -> Result<Cdk, Error> {
        let cdk = self.cdk_repo.revoke_cdk(cdk_id).await?;
        info!("Revoked CDK id={} (tier id={})", cdk.id, cdk.tier_id);
        Ok(cdk)
    }
}
