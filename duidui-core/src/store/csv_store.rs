use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::{Record, RecordStore, Rows, StoreLock};
use crate::Error;

/// CSV-file implementation of [`RecordStore`].
///
/// `<dir>/<table>.csv` holds the rows, `<dir>/<table>.seq` the id
/// high-water mark. Both are replaced with temp-file + rename.
/// `<dir>/<table>.lock` is never written; it only carries the `flock`
/// that serializes every process using the directory.
pub struct CsvStore<T> {
    path: PathBuf,
    seq_path: PathBuf,
    lock_path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Record> CsvStore<T> {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("{}.csv", T::TABLE)),
            seq_path: dir.join(format!("{}.seq", T::TABLE)),
            lock_path: dir.join(format!("{}.lock", T::TABLE)),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_exists(&self) -> Result<(), Error> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        debug!("Creating empty table {}", self.path.display());
        write_atomic(&self.path, &encode_rows::<T>(&[])?)
    }

    fn read_high_water(&self) -> Result<i64, Error> {
        match fs::read_to_string(&self.seq_path) {
            Ok(text) => text.trim().parse().map_err(|e| {
                Error::Persistence(format!("{}: bad sequence value: {e}", self.seq_path.display()))
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}

impl<T: Record> RecordStore<T> for CsvStore<T> {
    fn lock_exclusive(&self) -> Result<StoreLock, Error> {
        if let Some(parent) = self.lock_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)?;
        FileExt::lock_exclusive(&file).map_err(|e| {
            Error::Persistence(format!("failed to lock {}: {e}", self.lock_path.display()))
        })?;
        Ok(StoreLock::file(file))
    }

    fn load_all(&self) -> Result<Rows<T>, Error> {
        self.ensure_exists()?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;

        let header = reader.headers()?.clone();
        if header.len() != T::HEADER.len() {
            return Err(Error::Persistence(format!(
                "{}: expected {} columns, header has {}",
                self.path.display(),
                T::HEADER.len(),
                header.len()
            )));
        }
        if header.iter().ne(T::HEADER.iter().copied()) {
            // Columns are read by position, so renamed headers still load.
            warn!(
                "{}: header {:?} differs from expected {:?}",
                self.path.display(),
                header,
                T::HEADER
            );
        }

        let mut rows = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            // A bad row is an error, not a skip: the next save would erase it.
            let row: T = record
                .and_then(|r| r.deserialize(None))
                .map_err(|e| {
                    Error::Persistence(format!("{}: row {}: {e}", self.path.display(), idx + 1))
                })?;
            rows.push(row);
        }

        Ok(Rows::new(rows, self.read_high_water()?))
    }

    fn save_all(&self, rows: &Rows<T>) -> Result<(), Error> {
        write_atomic(&self.path, &encode_rows(rows)?)?;
        write_atomic(&self.seq_path, rows.high_water().to_string().as_bytes())
    }
}

fn encode_rows<T: Record>(rows: &[T]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(T::HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| Error::Persistence(format!("flushing CSV buffer: {e}")))
}

/// Writes `bytes` to `path` atomically using tempfile + rename in the same
/// directory, so readers see either the old or the new content. The
/// directory is synced afterwards so the rename survives a crash.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    sync_dir(parent)
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<(), Error> {
    fs::File::open(dir)?.sync_all()?;
    Ok(())
}

// no portable directory handle to sync
#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<(), Error> {
    Ok(())
}
