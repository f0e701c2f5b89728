// duidui-core/src/db/mod.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use duidui_common::models::{Cdk, LoginState, RedeemLog, Tier, User};
use tracing::info;

use crate::Error;
use crate::store::{CsvStore, Table};

/// Every table under one data directory.
#[derive(Clone)]
pub struct Database {
    data_dir: PathBuf,
    tiers: Arc<Table<Tier>>,
    cdks: Arc<Table<Cdk>>,
    redeem_logs: Arc<Table<RedeemLog>>,
    users: Arc<Table<User>>,
    login_states: Arc<Table<LoginState>>,
}

impl Database {
    /// Opens (and if needed creates) the tables under `data_dir`.
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, Error> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;

        let db = Self {
            tiers: Arc::new(Table::new(CsvStore::new(&data_dir))),
            cdks: Arc::new(Table::new(CsvStore::new(&data_dir))),
            redeem_logs: Arc::new(Table::new(CsvStore::new(&data_dir))),
            users: Arc::new(Table::new(CsvStore::new(&data_dir))),
            login_states: Arc::new(Table::new(CsvStore::new(&data_dir))),
            data_dir,
        };
        db.ensure_tables().await?;

        info!("Opened data directory {}", db.data_dir.display());
        Ok(db)
    }

    /// Touches every table so missing files are created with their header
    /// and unreadable ones fail at startup rather than on first use.
    pub async fn ensure_tables(&self) -> Result<(), Error> {
        self.tiers.read_all().await?;
        self.cdks.read_all().await?;
        self.redeem_logs.read_all().await?;
        self.users.read_all().await?;
        self.login_states.read_all().await?;
        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn tiers(&self) -> Arc<Table<Tier>> {
        self.tiers.clone()
    }

    pub fn cdks(&self) -> Arc<Table<Cdk>> {
        self.cdks.clone()
    }

    pub fn redeem_logs(&self) -> Arc<Table<RedeemLog>> {
        self.redeem_logs.clone()
    }

    pub fn users(&self) -> Arc<Table<User>> {
        self.users.clone()
    }

    pub fn login_states(&self) -> Arc<Table<LoginState>> {
        self.login_states.clone()
    }
}
