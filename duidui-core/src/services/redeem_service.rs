use std::collections::HashMap;
use std::sync::Arc;

use duidui_common::models::{CdkFilter, RedeemLog, RedeemOutcome, RedemptionView};
use duidui_common::traits::repository_traits::{CdkRepository, RedeemLogRepository, TierRepository};
use tracing::{debug, error, info, warn};

use crate::services::stock::StockCalculator;
use crate::{Error, codec};

const HIDDEN_CODE: &str = "***";

pub struct RedeemService {
    tier_repo: Arc<dyn TierRepository + Send + Sync>,
    cdk_repo: Arc<dyn CdkRepository + Send + Sync>,
    log_repo: Arc<dyn RedeemLogRepository + Send + Sync>,
    stock: StockCalculator,
}

impl RedeemService {
    pub fn new(
        tier_repo: Arc<dyn TierRepository + Send + Sync>,
        cdk_repo: Arc<dyn CdkRepository + Send + Sync>,
        log_repo: Arc<dyn RedeemLogRepository + Send + Sync>,
    ) -> Self {
        Self {
            tier_repo,
            stock: StockCalculator::new(cdk_repo.clone()),
            cdk_repo,
            log_repo,
        }
    }

    /// Hands one available code of `tier_id` to `user_id`.
    ///
    /// The tier and stock checks up front only reject early; the reservation
    /// in the CDK repository re-checks availability under the table lock and
    /// is what actually decides. Once the reservation is saved the code
    /// belongs to the user: a failure to write the redemption log after that
    /// point is returned as `log_warning`, not as an error.
    pub async fn redeem(&self, tier_id: i64, user_id: i64) -> Result<RedeemOutcome, Error> {
        let tier = self
            .tier_repo
            .get_tier(tier_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("tier {tier_id} does not exist")))?;
        if !tier.is_active {
            return Err(Error::Conflict(format!("tier '{}' is not active", tier.name)));
        }
        if self.stock.stock_for(tier_id).await? <= 0 {
            debug!("Tier id={} has no stock => rejecting redeem for user {}", tier_id, user_id);
            return Err(Error::Exhausted(format!("tier '{}' is out of stock", tier.name)));
        }

        let cdk = self.cdk_repo.reserve_available(tier_id, user_id).await?;
        let redeemed_at = cdk.redeemed_at.ok_or_else(|| {
            Error::Persistence(format!("CDK {} reserved without a redeemed_at", cdk.id))
        })?;

        let log_warning = match self.log_repo.append_log(user_id, cdk.id, tier_id, redeemed_at).await {
            Ok(log) => {
                debug!("Wrote redeem log id={} for CDK {}", log.id, cdk.id);
                None
            }
            Err(e) => {
                warn!(
                    "CDK {} redeemed by user {} but the redeem log write failed: {}",
                    cdk.id, user_id, e
                );
                Some(format!("redemption succeeded but was not logged: {e}"))
            }
        };

        let plain_code = codec::decode(&cdk.code).map_err(|e| {
            error!("CDK {} is reserved for user {} but its code cannot be decoded: {}", cdk.id, user_id, e);
            Error::Persistence(format!("stored code of CDK {} is corrupt: {e}", cdk.id))
        })?;

        info!("User {} redeemed CDK id={} from tier '{}'", user_id, cdk.id, tier.name);
        Ok(RedeemOutcome {
            tier_id,
            tier_name: tier.name,
            cdk_id: cdk.id,
            plain_code,
            redeemed_at,
            log_warning,
        })
    }

    /// Redemption history of one user, oldest first.
    pub async fn list_user_redemptions(&self, user_id: i64) -> Result<Vec<RedemptionView>, Error> {
        let logs = self.log_repo.list_logs_for_user(user_id).await?;
        self.build_views(logs).await
    }

    /// Every redemption, oldest first (admin view).
    pub async fn list_all_redemptions(&self) -> Result<Vec<RedemptionView>, Error> {
        let logs = self.log_repo.list_logs().await?;
        self.build_views(logs).await
    }

    async fn build_views(&self, logs: Vec<RedeemLog>) -> Result<Vec<RedemptionView>, Error> {
        if logs.is_empty() {
            return Ok(Vec::new());
        }

        let tier_names: HashMap<i64, String> = self
            .tier_repo
            .list_tiers()
            .await?
            .into_iter()
            .map(|t| (t.id, t.name))
            .collect();
        let codes: HashMap<i64, String> = self
            .cdk_repo
            .list_cdks(&CdkFilter::default())
            .await?
            .into_iter()
            .map(|c| (c.id, c.code))
            .collect();

        Ok(logs
            .into_iter()
            .map(|log| RedemptionView {
                log_id: log.id,
                user_id: log.user_id,
                tier_id: log.tier_id,
                tier_name: tier_names.get(&log.tier_id).cloned().unwrap_or_default(),
                cdk_id: log.cdk_id,
                cdk_code: codes
                    .get(&log.cdk_id)
                    .and_then(|code| codec::decode(code).ok())
                    .unwrap_or_else(|| HIDDEN_CODE.to_string()),
                redeemed_at: log.created_at,
            })
            .collect())
    }
}
