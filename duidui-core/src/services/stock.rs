use std::collections::HashMap;
use std::sync::Arc;

use duidui_common::models::CdkFilter;
use duidui_common::traits::repository_traits::CdkRepository;

use crate::Error;
use crate::engine;

/// Derives tier stock from the CDK table on every call. Nothing is cached:
/// the table is the only source of truth.
#[derive(Clone)]
pub struct StockCalculator {
    cdk_repo: Arc<dyn CdkRepository + Send + Sync>,
}

impl StockCalculator {
    pub fn new(cdk_repo: Arc<dyn CdkRepository + Send + Sync>) -> Self {
        Self { cdk_repo }
    }

    pub async fn stock_for(&self, tier_id: i64) -> Result<i64, Error> {
        let filter = CdkFilter {
            tier_id: Some(tier_id),
            status: None,
        };
        let rows = self.cdk_repo.list_cdks(&filter).await?;
        Ok(engine::stock::count_available(&rows, tier_id))
    }

    /// Stock of every tier from a single scan.
    pub async fn stock_by_tier(&self) -> Result<HashMap<i64, i64>, Error> {
        let rows = self.cdk_repo.list_cdks(&CdkFilter::default()).await?;
        Ok(engine::stock::available_by_tier(&rows))
    }
}
