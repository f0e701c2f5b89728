//! duidui-core/src/store/mod.rs
//!
//! Flat-file record store. Each table is one CSV file with a header row,
//! rewritten in full on every save. A [`Table`] pairs a store with the
//! locks that make its read-modify-write cycles atomic: an in-process mutex
//! plus the store's own lock, which also excludes other processes sharing
//! the data directory.

mod csv_store;
mod records;
mod table;

pub use csv_store::CsvStore;
pub use table::Table;

use std::fs::File;
use std::ops::{Deref, DerefMut};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::Error;

/// A row type that can live in a table.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// File stem of the backing table, e.g. `cdk` for `cdk.csv`.
    const TABLE: &'static str;
    /// Column names in persisted order.
    const HEADER: &'static [&'static str];

    fn id(&self) -> i64;
}

/// Exclusive hold on a table. Released on drop.
#[derive(Debug)]
pub struct StoreLock {
    _file: Option<File>,
}

impl StoreLock {
    /// Holds an already locked file until dropped.
    pub fn file(file: File) -> Self {
        Self { _file: Some(file) }
    }

    /// For stores with no state outside this process.
    pub fn none() -> Self {
        Self { _file: None }
    }
}

/// Load/save contract for one table.
pub trait RecordStore<T: Record>: Send + Sync {
    /// Blocks until no other holder, in this or another process, has the
    /// table. Callers keep the guard across load -> decide -> save.
    fn lock_exclusive(&self) -> Result<StoreLock, Error>;

    /// All rows in insertion order. Creates an empty table if none exists.
    fn load_all(&self) -> Result<Rows<T>, Error>;

    /// Replaces the whole table. Must never leave a truncated table behind.
    fn save_all(&self, rows: &Rows<T>) -> Result<(), Error>;
}

/// Loaded rows plus the table's id high-water mark.
#[derive(Debug, Clone)]
pub struct Rows<T> {
    rows: Vec<T>,
    high_water: i64,
}

impl<T: Record> Rows<T> {
    pub fn new(rows: Vec<T>, high_water: i64) -> Self {
        Self { rows, high_water }
    }

    fn max_id(&self) -> i64 {
        self.rows.iter().map(Record::id).max().unwrap_or(0)
    }

    /// Allocates the next id. Ids are never handed out twice, even if the
    /// row holding the highest id has been deleted.
    pub fn next_id(&mut self) -> i64 {
        let id = self.max_id().max(self.high_water) + 1;
        self.high_water = id;
        id
    }

    pub fn high_water(&self) -> i64 {
        self.max_id().max(self.high_water)
    }

    pub fn into_vec(self) -> Vec<T> {
        self.rows
    }
}

impl<T> Deref for Rows<T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Self::Target {
        &self.rows
    }
}

impl<T> DerefMut for Rows<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.rows
    }
}
