use std::sync::Arc;

use duidui_common::models::{User, UserProfile};
use duidui_common::traits::repository_traits::LoginStateRepository;
use tracing::{info, warn};

use crate::Error;
use crate::services::UserService;

/// Two-step login: `start` hands out a verification state, `finish`
/// accepts it once and stores the reported profile.
pub struct LoginService {
    state_repo: Arc<dyn LoginStateRepository + Send + Sync>,
    user_service: Arc<UserService>,
}

impl LoginService {
    pub fn new(
        state_repo: Arc<dyn LoginStateRepository + Send + Sync>,
        user_service: Arc<UserService>,
    ) -> Self {
        Self { state_repo, user_service }
    }

    pub async fn start(&self) -> Result<String, Error> {
        let state = self.state_repo.issue_state().await?;
        info!("Issued login state");
        Ok(state)
    }

    /// `Error::Conflict` if `state` is unknown, expired or already used.
    pub async fn finish(&self, state: &str, profile: &UserProfile) -> Result<User, Error> {
        if !self.state_repo.consume_state(state).await? {
            warn!("Rejected login with an unknown, expired or used state");
            return Err(Error::Conflict("login state expired or already used".into()));
        }
        let user = self.user_service.upsert_user(profile).await?;
        info!("User id={} logged in", user.id);
        Ok(user)
    }
}
