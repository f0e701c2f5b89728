// File: duidui-core/src/repositories/csv/tier.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use duidui_common::models::{Tier, TierDraft};
use duidui_common::traits::repository_traits::TierRepository;

use crate::Error;
use crate::store::Table;

pub struct CsvTierRepository {
    table: Arc<Table<Tier>>,
}

impl CsvTierRepository {
    pub fn new(table: Arc<Table<Tier>>) -> Self {
        Self { table }
    }
}

#[async_trait]
impl TierRepository for CsvTierRepository {
    async fn create_tier(&self, draft: &TierDraft) -> Result<Tier, Error> {
        let now = Utc::now();
        let draft = draft.clone();
        self.table
            .modify(move |rows| {
                let tier = Tier {
                    id: rows.next_id(),
                    name: draft.name.trim().to_string(),
                    quota: draft.quota,
                    required_level: draft.required_level,
                    daily_limit: draft.daily_limit,
                    // placeholder; stock is always derived on read
                    stock: 0,
                    is_active: draft.is_active,
                    sort_order: draft.sort_order,
                    created_at: now,
                    updated_at: now,
                };
                rows.push(tier.clone());
                Ok(tier)
            })
            .await
    }

    async fn get_tier(&self, tier_id: i64) -> Result<Option<Tier>, Error> {
        let rows = self.table.read_all().await?;
        Ok(rows.into_iter().find(|t| t.id == tier_id))
    }

    async fn list_tiers(&self) -> Result<Vec<Tier>, Error> {
        self.table.read_all().await
    }

    async fn update_tier(&self, tier_id: i64, draft: &TierDraft) -> Result<Option<Tier>, Error> {
        let now = Utc::now();
        let draft = draft.clone();
        self.table
            .modify(move |rows| {
                let tier = rows
                    .iter_mut()
                    .find(|t| t.id == tier_id)
                    .ok_or_else(|| Error::NotFound(format!("tier {tier_id} does not exist")))?;
                draft.apply_to(tier, now);
                tier.stock = 0;
                Ok(tier.clone())
            })
            .await
            .map(Some)
            .or_else(|e| match e {
                Error::NotFound(_) => Ok(None),
                other => Err(other),
            })
    }

    async fn delete_tier(&self, tier_id: i64) -> Result<bool, Error> {
        self.table
            .modify(move |rows| {
                let before = rows.len();
                rows.retain(|t| t.id != tier_id);
                if rows.len() == before {
                    // nothing to save
                    return Err(Error::NotFound(format!("tier {tier_id} does not exist")));
                }
                Ok(())
            })
            .await
            .map(|()| true)
            .or_else(|e| match e {
                Error::NotFound(_) => Ok(false),
                other => Err(other),
            })
    }
}
