//! Table Cache
//! Memoizes loaded tables per resolved path for the life of the process.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use once_cell::sync::{Lazy, OnceCell};
use tracing::debug;

use super::loader::{load_uncached, LoadError};
use super::model::TransactionTable;

type Slot = Arc<OnceCell<Arc<TransactionTable>>>;

/// Path-keyed table cache with single-flight loading.
///
/// Concurrent first calls for the same path parse the file once; the others
/// block on the same slot and receive the same `Arc`. A failed load is not
/// kept, so the next call retries.
#[derive(Debug, Default)]
pub struct TableCache {
    slots: Mutex<HashMap<PathBuf, Slot>>,
    loads: AtomicUsize,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `path`, loading it on first use.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Arc<TransactionTable>, LoadError> {
        let path = path.as_ref();
        let key = std::fs::canonicalize(path).map_err(|e| LoadError::from_io(path, e))?;

        let slot = Arc::clone(self.slots().entry(key.clone()).or_default());
        if let Some(table) = slot.get() {
            debug!(path = %key.display(), "Table cache hit");
            return Ok(Arc::clone(table));
        }

        let loaded = slot.get_or_try_init(|| {
            self.loads.fetch_add(1, Ordering::SeqCst);
            load_uncached(&key).map(Arc::new)
        });
        match loaded {
            Ok(table) => Ok(Arc::clone(table)),
            Err(err) => {
                self.discard_empty(&key, &slot);
                Err(err)
            }
        }
    }

    /// Drop the cached table for `path`. Returns whether anything was cached.
    pub fn invalidate(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let removed = self.slots().remove(&key).is_some();
        debug!(path = %key.display(), removed, "Table cache invalidated");
        removed
    }

    /// Forget every cached table.
    pub fn clear(&self) {
        self.slots().clear();
    }

    /// Number of distinct paths currently cached.
    pub fn len(&self) -> usize {
        self.slots().values().filter(|slot| slot.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many times a file has actually been read and parsed.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Drop `slot` after a failed load, unless another caller has since
    /// replaced or filled it.
    fn discard_empty(&self, key: &Path, slot: &Slot) {
        let mut slots = self.slots();
        if let Some(current) = slots.get(key) {
            if Arc::ptr_eq(current, slot) && current.get().is_none() {
                slots.remove(key);
            }
        }
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<PathBuf, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

static TABLES: Lazy<TableCache> = Lazy::new(TableCache::new);

/// The process-wide cache used by [`load`].
pub fn global_cache() -> &'static TableCache {
    &TABLES
}

/// Load a transaction table, reusing the process-wide cached copy when present.
pub fn load(path: impl AsRef<Path>) -> Result<Arc<TransactionTable>, LoadError> {
    TABLES.load(path)
}

/// Force the next [`load`] of `path` to re-read the file.
pub fn invalidate(path: impl AsRef<Path>) -> bool {
    TABLES.invalidate(path)
}

/// Empty the process-wide cache.
pub fn clear_cache() {
    TABLES.clear()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "DATE,SALES,PURCHASES,UTILITIES,TRANSPORT,TURNOVER\n";

    fn csv_file(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{HEADER}{body}").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn second_load_is_served_from_cache() {
        let file = csv_file("2024-01-01,1000,400,50,30,10\n");
        let cache = TableCache::new();

        let first = cache.load(file.path()).unwrap();
        std::fs::write(file.path(), format!("{HEADER}2024-01-01,1,1,1,1,1\n")).unwrap();
        let second = cache.load(file.path()).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.records()[0].sales, 1000.0);
        assert_eq!(cache.load_count(), 1);
    }

    #[test]
    fn invalidate_forces_reload() {
        let file = csv_file("2024-01-01,1000,400,50,30,10\n");
        let cache = TableCache::new();

        let first = cache.load(file.path()).unwrap();
        std::fs::write(file.path(), format!("{HEADER}2024-01-01,5,1,1,1,1\n")).unwrap();
        assert!(cache.invalidate(file.path()));
        let second = cache.load(file.path()).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.records()[0].sales, 5.0);
        assert_eq!(cache.load_count(), 2);
        assert!(!cache.invalidate("/no/such/file.csv"));
    }

    #[test]
    fn failed_load_is_not_cached() {
        let file = csv_file("garbage,1,1,1,1,1\n");
        let cache = TableCache::new();

        assert!(matches!(cache.load(file.path()), Err(LoadError::MalformedInput(_))));
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        std::fs::write(file.path(), format!("{HEADER}2024-01-01,1,1,1,1,1\n")).unwrap();
        assert_eq!(cache.load(file.path()).unwrap().len(), 1);
        assert_eq!(cache.load_count(), 2);
    }

    #[test]
    fn clear_forces_reload_of_every_path() {
        let a = csv_file("2024-01-01,1000,400,50,30,10\n");
        let b = csv_file("2024-01-02,800,300,40,20,8\n");
        let cache = TableCache::new();

        let first = cache.load(a.path()).unwrap();
        cache.load(b.path()).unwrap();
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.load_count(), 2);

        cache.clear();
        assert!(cache.is_empty());
        let again = cache.load(a.path()).unwrap();
        assert!(!Arc::ptr_eq(&first, &again));
        assert_eq!(cache.load_count(), 3);
    }

    #[test]
    fn missing_path_is_not_found() {
        let cache = TableCache::new();
        assert!(matches!(
            cache.load("/definitely/not/here.csv"),
            Err(LoadError::NotFound { .. })
        ));
        assert_eq!(cache.load_count(), 0);
    }

    #[test]
    fn concurrent_first_access_loads_once() {
        let file = csv_file("2024-01-01,1000,400,50,30,10\n2024-01-02,800,300,40,20,8\n");
        let cache = TableCache::new();

        let tables: Vec<Arc<TransactionTable>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| cache.load(file.path()).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(cache.load_count(), 1);
        assert!(tables.iter().all(|t| Arc::ptr_eq(t, &tables[0])));
        assert_eq!(cache.len(), 1);
    }
}
