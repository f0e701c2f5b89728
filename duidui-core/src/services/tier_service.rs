use std::sync::Arc;

use duidui_common::models::{CdkFilter, Tier, TierDraft};
use duidui_common::traits::repository_traits::{CdkRepository, TierRepository};
use tracing::{debug, info, warn};

use crate::Error;
use crate::services::stock::StockCalculator;

pub struct TierService {
    tier_repo: Arc<dyn TierRepository + Send + Sync>,
    cdk_repo: Arc<dyn CdkRepository + Send + Sync>,
    stock: StockCalculator,
}

impl TierService {
    pub fn new(
        tier_repo: Arc<dyn TierRepository + Send + Sync>,
        cdk_repo: Arc<dyn CdkRepository + Send + Sync>,
    ) -> Self {
        Self {
            tier_repo,
            stock: StockCalculator::new(cdk_repo.clone()),
            cdk_repo,
        }
    }

    /// All tiers in insertion order, with stock derived from live CDK rows.
    pub async fn list_tiers(&self) -> Result<Vec<Tier>, Error> {
        let mut tiers = self.tier_repo.list_tiers().await?;
        let stock = self.stock.stock_by_tier().await?;
        for tier in &mut tiers {
            tier.stock = stock.get(&tier.id).copied().unwrap_or(0);
        }
        debug!("Listed {} tiers", tiers.len());
        Ok(tiers)
    }

    /// The user-facing list: active tiers only.
    pub async fn list_active_tiers(&self) -> Result<Vec<Tier>, Error> {
        let tiers = self.list_tiers().await?;
        Ok(tiers.into_iter().filter(|t| t.is_active).collect())
    }

    pub async fn get_tier(&self, tier_id: i64) -> Result<Tier, Error> {
        let mut tier = self
            .tier_repo
            .get_tier(tier_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("tier {tier_id} does not exist")))?;
        tier.stock = self.stock.stock_for(tier_id).await?;
        Ok(tier)
    }

    pub async fn create_tier(&self, draft: &TierDraft) -> Result<Tier, Error> {
        draft.validate()?;
        let mut tier = self.tier_repo.create_tier(draft).await?;
        tier.stock = self.stock.stock_for(tier.id).await?;
        info!("Created tier id={} name='{}'", tier.id, tier.name);
        Ok(tier)
    }

    pub async fn update_tier(&self, tier_id: i64, draft: &TierDraft) -> Result<Tier, Error> {
        draft.validate()?;
        let mut tier = self
            .tier_repo
            .update_tier(tier_id, draft)
            .await?
            .ok_or_else(|| Error::NotFound(format!("tier {tier_id} does not exist")))?;
        tier.stock = self.stock.stock_for(tier_id).await?;
        info!("Updated tier id={} name='{}' active={}", tier.id, tier.name, tier.is_active);
        Ok(tier)
    }

    /// Deletes the tier row only. CDKs that pointed at it stay in the table
    /// as orphans; they are never redeemable again because tier ids are not
    /// reused.
    pub async fn delete_tier(&self, tier_id: i64) -> Result<(), Error> {
        if !self.tier_repo.delete_tier(tier_id).await? {
            return Err(Error::NotFound(format!("tier {tier_id} does not exist")));
        }

        let orphans = self
            .cdk_repo
            .list_cdks(&CdkFilter { tier_id: Some(tier_id), status: None })
            .await?
            .len();
        if orphans > 0 {
            warn!("Deleted tier id={} leaves {} orphaned CDK rows", tier_id, orphans);
        } else {
            info!("Deleted tier id={}", tier_id);
        }
        Ok(())
    }
}
