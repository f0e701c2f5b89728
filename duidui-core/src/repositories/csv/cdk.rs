// File: duidui-core/src/repositories/csv/cdk.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use duidui_common::models::{Cdk, CdkFilter, ImportResult};
use duidui_common::traits::repository_traits::CdkRepository;

use crate::Error;
use crate::engine;
use crate::store::Table;

/// CDK repository over the CSV table.
///
/// All mutations go through [`Table::modify`], so each one is a single
/// locked load -> decide -> save cycle over the whole table. The lock is
/// table-wide rather than per tier because every save rewrites every tier's
/// rows.
pub struct CsvCdkRepository {
    table: Arc<Table<Cdk>>,
}

impl CsvCdkRepository {
    pub fn new(table: Arc<Table<Cdk>>) -> Self {
        Self { table }
    }
}

#[async_trait]
impl CdkRepository for CsvCdkRepository {
    async fn list_cdks(&self, filter: &CdkFilter) -> Result<Vec<Cdk>, Error> {
        let rows = self.table.read_all().await?;
        Ok(rows.into_iter().filter(|c| filter.matches(c)).collect())
    }

    async fn insert_codes(&self, tier_id: i64, codes: &[String]) -> Result<ImportResult, Error> {
        let now = Utc::now();
        let codes = codes.to_vec();
        self.table
            .modify(move |rows| engine::import::apply_import(rows, tier_id, &codes, now))
            .await
    }

    async fn reserve_available(&self, tier_id: i64, user_id: i64) -> Result<Cdk, Error> {
        let now = Utc::now();
        self.table
            .modify(move |rows| engine::redeem::reserve_first_available(rows, tier_id, user_id, now))
            .await
    }

    async fn revoke_cdk(&self, cdk_id: i64) -> Result<Cdk, Error> {
        let now = Utc::now();
        self.table
            .modify(move |rows| engine::revoke::apply_revoke(rows, cdk_id, now))
            .await
    }
}
