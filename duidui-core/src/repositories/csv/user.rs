use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use duidui_common::models::{User, UserProfile};
use duidui_common::traits::repository_traits::UserRepository;

use crate::Error;
use crate::store::Table;

pub struct CsvUserRepository {
    table: Arc<Table<User>>,
}

impl CsvUserRepository {
    pub fn new(table: Arc<Table<User>>) -> Self {
        Self { table }
    }
}

#[async_trait]
impl UserRepository for CsvUserRepository {
    async fn upsert_user(&self, profile: &UserProfile) -> Result<User, Error> {
        let now = Utc::now();
        let profile = profile.clone();
        self.table
            .modify(move |rows| {
                if let Some(existing) = rows.iter_mut().find(|u| u.external_id == profile.external_id) {
                    profile.apply_to(existing, now);
                    return Ok(existing.clone());
                }

                let user = User {
                    id: rows.next_id(),
                    external_id: profile.external_id,
                    username: profile.username.clone(),
                    name: profile.name.clone(),
                    trust_level: profile.trust_level,
                    is_admin: profile.is_admin,
                    created_at: now,
                    updated_at: now,
                };
                rows.push(user.clone());
                Ok(user)
            })
            .await
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<User>, Error> {
        let rows = self.table.read_all().await?;
        Ok(rows.into_iter().find(|u| u.id == user_id))
    }

    async fn get_user_by_external_id(&self, external_id: i64) -> Result<Option<User>, Error> {
        let rows = self.table.read_all().await?;
        Ok(rows.into_iter().find(|u| u.external_id == external_id))
    }

    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.table.read_all().await
    }
}
