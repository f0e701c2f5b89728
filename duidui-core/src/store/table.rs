use std::sync::Arc;

use tokio::sync::Mutex;

use super::{Record, RecordStore, Rows};
use crate::Error;

/// A record store guarded by two locks.
///
/// The async mutex queues callers within this process without tying up
/// blocking threads. The store lock (a `flock` for [`super::CsvStore`])
/// excludes other processes on the same data directory. Both are held
/// across the whole load -> decide -> save cycle, which runs on the blocking
/// pool. The decision step in [`Table::modify`] is a plain closure, so it
/// cannot `.await` while the locks are held.
pub struct Table<T: Record> {
    store: Arc<dyn RecordStore<T>>,
    lock: Mutex<()>,
}

impl<T: Record> Table<T> {
    pub fn new(store: impl RecordStore<T> + 'static) -> Self {
        Self {
            store: Arc::new(store),
            lock: Mutex::new(()),
        }
    }

    pub async fn read_all(&self) -> Result<Vec<T>, Error> {
        let _guard = self.lock.lock().await;
        let store = self.store.clone();
        run_blocking(move || {
            let _held = store.lock_exclusive()?;
            Ok(store.load_all()?.into_vec())
        })
        .await
    }

    /// Runs `f` against the current rows and saves them if it returns `Ok`.
    /// On `Err` nothing is written.
    pub async fn modify<R, F>(&self, f: F) -> Result<R, Error>
    where
        F: FnOnce(&mut Rows<T>) -> Result<R, Error> + Send + 'static,
        R: Send + 'static,
    {
        let _guard = self.lock.lock().await;
        let store = self.store.clone();
        run_blocking(move || {
            let _held = store.lock_exclusive()?;
            let mut rows = store.load_all()?;
            let out = f(&mut rows)?;
            store.save_all(&rows)?;
            Ok(out)
        })
        .await
    }
}

async fn run_blocking<R, F>(f: F) -> Result<R, Error>
where
    F: FnOnce() -> Result<R, Error> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Persistence(format!("store task did not complete: {e}")))?
}
