//! duidui-server/src/context.rs
//!
//! The ServerContext: the opened database plus every service wired against
//! its CSV repositories.

use std::sync::Arc;

use chrono::Duration;
use duidui_common::traits::repository_traits::{
    CdkRepository, LoginStateRepository, RedeemLogRepository, TierRepository, UserRepository,
};
use duidui_core::Database;
use duidui_core::Error;
use duidui_core::repositories::{
    CsvCdkRepository, CsvLoginStateRepository, CsvRedeemLogRepository, CsvTierRepository,
    CsvUserRepository,
};
use duidui_core::services::{CdkService, LoginService, RedeemService, TierService, UserService};
use tracing::info;

use crate::config::ServerConfig;

pub struct ServerContext {
    pub db: Database,
    pub tier_service: Arc<TierService>,
    pub cdk_service: Arc<CdkService>,
    pub redeem_service: Arc<RedeemService>,
    pub user_service: Arc<UserService>,
    pub login_service: Arc<LoginService>,
    pub state_ttl: Duration,
}

impl ServerContext {
    pub async fn new(config: &ServerConfig) -> Result<Self, Error> {
        let db = Database::open(&config.data_dir).await?;

        let tier_repo: Arc<dyn TierRepository + Send + Sync> =
            Arc::new(CsvTierRepository::new(db.tiers()));
        let cdk_repo: Arc<dyn CdkRepository + Send + Sync> =
            Arc::new(CsvCdkRepository::new(db.cdks()));
        let log_repo: Arc<dyn RedeemLogRepository + Send + Sync> =
            Arc::new(CsvRedeemLogRepository::new(db.redeem_logs()));
        let user_repo: Arc<dyn UserRepository + Send + Sync> =
            Arc::new(CsvUserRepository::new(db.users()));
        let state_repo: Arc<dyn LoginStateRepository + Send + Sync> =
            Arc::new(CsvLoginStateRepository::new(db.login_states(), config.state_ttl));

        let tier_service = Arc::new(TierService::new(tier_repo.clone(), cdk_repo.clone()));
        let cdk_service = Arc::new(CdkService::new(tier_repo.clone(), cdk_repo.clone()));
        let redeem_service = Arc::new(RedeemService::new(tier_repo, cdk_repo, log_repo));
        let user_service = Arc::new(UserService::new(user_repo));
        let login_service = Arc::new(LoginService::new(state_repo, user_service.clone()));

        info!(
            "Server context ready (data_dir={}, state_ttl={}s)",
            config.data_dir.display(),
            config.state_ttl.num_seconds()
        );

        Ok(Self {
            db,
            tier_service,
            cdk_service,
            redeem_service,
            user_service,
            login_service,
            state_ttl: config.state_ttl,
        })
    }
}
