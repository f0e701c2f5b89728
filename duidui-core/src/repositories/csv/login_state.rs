// File: duidui-core/src/repositories/csv/login_state.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use duidui_common::models::LoginState;
use duidui_common::traits::repository_traits::LoginStateRepository;

use crate::Error;
use crate::auth::LoginStateStore;
use crate::store::{Rows, Table};

/// Login states kept in the `login_state` table, so a state issued by one
/// process can be finished by another and is still single-use.
pub struct CsvLoginStateRepository {
    table: Arc<Table<LoginState>>,
    ttl: Duration,
}

impl CsvLoginStateRepository {
    pub fn new(table: Arc<Table<LoginState>>, ttl: Duration) -> Self {
        Self { table, ttl }
    }
}

/// Loads the table into a [`LoginStateStore`], runs `f` on it and writes
/// back what is still pending.
fn with_store<R>(rows: &mut Rows<LoginState>, ttl: Duration, f: impl FnOnce(&LoginStateStore) -> R) -> R {
    let store = LoginStateStore::restore(ttl, rows.drain(..).map(|row| (row.state, row.issued_at)));
    let out = f(&store);
    for (state, issued_at) in store.snapshot() {
        let id = rows.next_id();
        rows.push(LoginState { id, state, issued_at });
    }
    out
}

#[async_trait]
impl LoginStateRepository for CsvLoginStateRepository {
    async fn issue_state(&self) -> Result<String, Error> {
        let ttl = self.ttl;
        self.table
            .modify(move |rows| Ok(with_store(rows, ttl, LoginStateStore::issue)))
            .await
    }

    async fn consume_state(&self, state: &str) -> Result<bool, Error> {
        let ttl = self.ttl;
        let state = state.to_string();
        self.table
            .modify(move |rows| Ok(with_store(rows, ttl, |store| store.consume(&state))))
            .await
    }
}
