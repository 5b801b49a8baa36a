//! Generic flat-file record store.
//!
//! A [`RecordStore`] keeps every record of one file in memory and rewrites
//! the whole file after each mutation, through a temporary file that
//! replaces the original once it is fully written.

use std::fs::{self, File};
use std::io::{BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};

use super::codec::{decode, encode};
use super::record::Record;

/// An in-memory collection of `T` backed by a CSV file.
///
/// The file is read on first use, at most once per store. Every successful
/// mutation rewrites the file before the in-memory collection changes, so a
/// failed write leaves both the file and the collection as they were.
///
/// # Example
///
/// ```no_run
/// use motorph_payroll::models::Employee;
/// use motorph_payroll::store::RecordStore;
///
/// let store: RecordStore<Employee> = RecordStore::new("data/employees.csv");
/// let employees = store.load_all()?;
/// println!("{} employees on file", employees.len());
/// # Ok::<(), motorph_payroll::error::EngineError>(())
/// ```
#[derive(Debug)]
pub struct RecordStore<T: Record> {
    path: PathBuf,
    records: OnceCell<Mutex<Vec<T>>>,
}

impl<T: Record> RecordStore<T> {
    /// Creates a store for the file at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: OnceCell::new(),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a copy of every record, loading the file on first use.
    ///
    /// A missing file is an empty store.
    pub fn load_all(&self) -> EngineResult<Vec<T>> {
        Ok(self.lock()?.clone())
    }

    /// Returns the number of records.
    pub fn len(&self) -> EngineResult<usize> {
        Ok(self.lock()?.len())
    }

    /// Returns true if the store holds no records.
    pub fn is_empty(&self) -> EngineResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    /// Returns a copy of the record with `key`, if any.
    pub fn find(&self, key: &T::Key) -> EngineResult<Option<T>> {
        Ok(self.lock()?.iter().find(|r| r.key() == *key).cloned())
    }

    /// Returns true if a record with `key` exists.
    pub fn contains(&self, key: &T::Key) -> EngineResult<bool> {
        Ok(self.lock()?.iter().any(|r| r.key() == *key))
    }

    /// Returns copies of the records matching `predicate`, in file order.
    pub fn filter<P>(&self, predicate: P) -> EngineResult<Vec<T>>
    where
        P: Fn(&T) -> bool,
    {
        Ok(self
            .lock()?
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect())
    }

    /// Replaces every record and rewrites the file.
    ///
    /// Fails with `DuplicateKey` if two of the new records share a key.
    pub fn replace_all(&self, records: Vec<T>) -> EngineResult<()> {
        for (i, record) in records.iter().enumerate() {
            let key = record.key();
            if records[..i].iter().any(|r| r.key() == key) {
                return Err(EngineError::duplicate(T::ENTITY, key));
            }
        }

        let mut guard = self.lock()?;
        self.persist(&records)?;
        *guard = records;
        Ok(())
    }

    /// Appends `record` and rewrites the file.
    ///
    /// Returns `false`, without touching the file, if a record with the same
    /// key already exists.
    pub fn append_and_persist(&self, record: T) -> EngineResult<bool> {
        let mut guard = self.lock()?;
        let key = record.key();
        if guard.iter().any(|r| r.key() == key) {
            debug!(entity = T::ENTITY, key = %key, "Rejected duplicate record");
            return Ok(false);
        }

        let mut next = guard.clone();
        next.push(record);
        self.persist(&next)?;
        *guard = next;
        Ok(true)
    }

    /// Appends every record whose key is not taken, then rewrites the file once.
    ///
    /// Returns how many records were added; the file is untouched if none were.
    pub fn extend_and_persist<I>(&self, records: I) -> EngineResult<usize>
    where
        I: IntoIterator<Item = T>,
    {
        let mut guard = self.lock()?;
        let mut next = guard.clone();
        for record in records {
            let key = record.key();
            if next.iter().any(|r| r.key() == key) {
                debug!(entity = T::ENTITY, key = %key, "Rejected duplicate record");
                continue;
            }
            next.push(record);
        }

        let added = next.len() - guard.len();
        if added == 0 {
            return Ok(0);
        }
        self.persist(&next)?;
        *guard = next;
        Ok(added)
    }

    /// Applies `mutator` to the record with `key` and rewrites the file.
    ///
    /// Returns `false` if no record has `key`. Fails with `DuplicateKey` if
    /// the mutation changes the key to one held by another record.
    pub fn update_and_persist<F>(&self, key: &T::Key, mutator: F) -> EngineResult<bool>
    where
        F: FnOnce(&mut T),
    {
        let mut guard = self.lock()?;
        let Some(index) = guard.iter().position(|r| r.key() == *key) else {
            return Ok(false);
        };

        let mut next = guard.clone();
        mutator(&mut next[index]);

        let new_key = next[index].key();
        if new_key != *key
            && next
                .iter()
                .enumerate()
                .any(|(i, r)| i != index && r.key() == new_key)
        {
            return Err(EngineError::duplicate(T::ENTITY, new_key));
        }

        self.persist(&next)?;
        *guard = next;
        Ok(true)
    }

    /// Removes the record with `key` and rewrites the file.
    ///
    /// Returns `false` if no record has `key`.
    pub fn delete_and_persist(&self, key: &T::Key) -> EngineResult<bool> {
        let mut guard = self.lock()?;
        if !guard.iter().any(|r| r.key() == *key) {
            return Ok(false);
        }

        let next: Vec<T> = guard.iter().filter(|r| r.key() != *key).cloned().collect();
        self.persist(&next)?;
        *guard = next;
        Ok(true)
    }

    /// Removes every record matching `predicate` and returns how many went.
    ///
    /// The file is only rewritten if something was removed.
    pub fn delete_where<P>(&self, predicate: P) -> EngineResult<usize>
    where
        P: Fn(&T) -> bool,
    {
        let mut guard = self.lock()?;
        let next: Vec<T> = guard.iter().filter(|r| !predicate(r)).cloned().collect();
        let removed = guard.len() - next.len();
        if removed == 0 {
            return Ok(0);
        }

        self.persist(&next)?;
        *guard = next;
        Ok(removed)
    }

    fn lock(&self) -> EngineResult<MutexGuard<'_, Vec<T>>> {
        let cell = self
            .records
            .get_or_try_init(|| self.read_file().map(Mutex::new))?;
        Ok(cell.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn read_file(&self) -> EngineResult<Vec<T>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(
                    entity = T::ENTITY,
                    path = %self.path.display(),
                    "Store file not found, starting empty"
                );
                return Ok(Vec::new());
            }
            Err(e) => return Err(persistence_error(&self.path, "read", e)),
        };

        let decoded = decode::<T, _>(BufReader::new(file))
            .map_err(|e| persistence_error(&self.path, "read", e))?;

        info!(
            entity = T::ENTITY,
            path = %self.path.display(),
            loaded = decoded.records.len(),
            skipped = decoded.skipped,
            "Loaded records"
        );
        Ok(decoded.records)
    }

    fn persist(&self, records: &[T]) -> EngineResult<()> {
        let bytes =
            encode(records).map_err(|e| persistence_error(&self.path, "encode records for", e))?;
        write_atomically(&self.path, &bytes)?;
        debug!(
            entity = T::ENTITY,
            path = %self.path.display(),
            records = records.len(),
            "Persisted records"
        );
        Ok(())
    }
}

/// Returns `<path>.tmp`, the staging file used by [`write_atomically`].
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Writes `bytes` to `path` by way of a temporary file.
///
/// The temporary file is fully written and synced first, then the original
/// is deleted and the temporary file renamed over it. If the delete or the
/// rename fails the temporary file is left in place holding the new data.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> EngineResult<()> {
    let staging = temp_path(path);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| persistence_error(parent, "create directory", e))?;
    }

    let mut file =
        File::create(&staging).map_err(|e| persistence_error(&staging, "write temp file", e))?;
    file.write_all(bytes)
        .and_then(|_| file.sync_all())
        .map_err(|e| persistence_error(&staging, "write temp file", e))?;
    drop(file);

    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(persistence_error(path, "delete", e)),
    }

    fs::rename(&staging, path).map_err(|e| persistence_error(path, "rename", e))
}

fn persistence_error(path: &Path, operation: &str, error: impl std::fmt::Display) -> EngineError {
    EngineError::Persistence {
        path: path.display().to_string(),
        operation: operation.to_string(),
        message: error.to_string(),
    }
}
