// File: duidui-core/src/repositories/csv/redeem_log.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use duidui_common::models::RedeemLog;
use duidui_common::traits::repository_traits::RedeemLogRepository;

use crate::Error;
use crate::store::Table;

/// Append-only: this repository never edits or removes a row.
pub struct CsvRedeemLogRepository {
    table: Arc<Table<RedeemLog>>,
}

impl CsvRedeemLogRepository {
    pub fn new(table: Arc<Table<RedeemLog>>) -> Self {
        Self { table }
    }
}

#[async_trait]
impl RedeemLogRepository for CsvRedeemLogRepository {
    async fn append_log(
        &self,
        user_id: i64,
        cdk_id: i64,
        tier_id: i64,
        at: DateTime<Utc>,
    ) -> Result<RedeemLog, Error> {
        self.table
            .modify(move |rows| {
                let log = RedeemLog {
                    id: rows.next_id(),
                    user_id,
                    cdk_id,
                    tier_id,
                    created_at: at,
                };
                rows.push(log.clone());
                Ok(log)
            })
            .await
    }

    async fn list_logs_for_user(&self, user_id: i64) -> Result<Vec<RedeemLog>, Error> {
        let rows = self.table.read_all().await?;
        Ok(rows.into_iter().filter(|l| l.user_id == user_id).collect())
    }

    async fn list_logs(&self) -> Result<Vec<RedeemLog>, Error> {
        self.table.read_all().await
    }
}
