use std::sync::Arc;

use duidui_common::models::{User, UserProfile};
use duidui_common::traits::repository_traits::UserRepository;
use tracing::info;

use crate::Error;

pub struct UserService {
    user_repo: Arc<dyn UserRepository + Send + Sync>,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepository + Send + Sync>) -> Self {
        Self { user_repo }
    }

    /// Called after a successful login with the profile the identity
    /// provider reported.
    pub async fn upsert_user(&self, profile: &UserProfile) -> Result<User, Error> {
        if profile.username.trim().is_empty() {
            return Err(Error::Validation("username must not be empty".into()));
        }
        let user = self.user_repo.upsert_user(profile).await?;
        info!("Upserted user id={} external_id={}", user.id, user.external_id);
        Ok(user)
    }

    pub async fn get_user(&self, user_id: i64) -> Result<User, Error> {
        self.user_repo
            .get_user(user_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("user {user_id} does not exist")))
    }

    pub async fn get_user_by_external_id(&self, external_id: i64) -> Result<User, Error> {
        self.user_repo
            .get_user_by_external_id(external_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("no user with external_id={external_id}")))
    }

    pub async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.user_repo.list_users().await
    }
}
