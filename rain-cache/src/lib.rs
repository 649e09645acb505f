//! Persistent store for analysed rainfall datasets.
//!
//! A saved dataset is keyed by the file name of its source, so a file that
//! was analysed once can be charted again without re-parsing it. Saving under
//! an existing key replaces the previous entry.
//!
//! # Backends
//!
//! - [`FileStore`] - one CSV file per key inside a directory
//! - [`SqliteStore`] - `entries` and `summaries` tables in a SQLite database
//! - [`MemoryStore`] - in-process map, used by tests and embedders
//!
//! # Usage
//!
//! ```rust
//! use rain_cache::{CacheKey, CacheStore, MemoryStore};
//! use rain_core::Aggregator;
//!
//! let dataset = Aggregator::default()
//!     .aggregate_str("rain.csv", "date,rainfall\n2024-01-05,10.0\n")
//!     .unwrap();
//!
//! let store = MemoryStore::new();
//! let key = store.save(&dataset).unwrap().unwrap();
//! assert_eq!(store.load(&key).unwrap(), dataset);
//! assert_eq!(store.list_keys().unwrap(), vec![CacheKey::new("rain.csv").unwrap()]);
//! ```

pub mod codec;
mod file;
mod key;
mod memory;
pub mod schema;
mod sqlite;

pub use file::FileStore;
pub use key::CacheKey;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use rain_core::{MonthlySummary, RainfallDataset, RainfallError, Result};

/// A single namespace of saved datasets.
///
/// Backends implement the three `*_entry`/`entry_keys` primitives; callers use
/// [`save`](CacheStore::save), [`load`](CacheStore::load) and
/// [`list_keys`](CacheStore::list_keys). No operation retries.
pub trait CacheStore {
    /// Store `summaries` under `key`, replacing any previous entry.
    fn write_entry(&self, key: &CacheKey, summaries: &[MonthlySummary]) -> Result<()>;

    /// `Ok(None)` when there is no entry for `key`. Content that cannot be
    /// decoded is `RainfallError::CorruptEntry`.
    fn read_entry(&self, key: &CacheKey) -> Result<Option<Vec<MonthlySummary>>>;

    /// Every stored key, in any order.
    fn entry_keys(&self) -> Result<Vec<CacheKey>>;

    /// Save a dataset under the key derived from its source name.
    ///
    /// Returns `Ok(None)`, and stores nothing, when the dataset has no source
    /// name (nothing has been loaded).
    fn save(&self, dataset: &RainfallDataset) -> Result<Option<CacheKey>> {
        let Some(source_name) = dataset.source_name() else {
            log::info!("cache: nothing loaded, nothing to save");
            return Ok(None);
        };
        let key = CacheKey::new(source_name).ok_or_else(|| {
            RainfallError::Storage(format!("{source_name:?} cannot be used as a cache key"))
        })?;
        self.write_entry(&key, dataset.summaries())?;
        log::info!("cache: saved {} months under {}", dataset.len(), key);
        Ok(Some(key))
    }

    /// Load a saved dataset; its source name is the key.
    fn load(&self, key: &CacheKey) -> Result<RainfallDataset> {
        let summaries = self
            .read_entry(key)?
            .ok_or_else(|| RainfallError::NotFound {
                key: key.to_string(),
            })?;
        let dataset = RainfallDataset::new(Some(key.to_string()), summaries).map_err(|e| {
            RainfallError::CorruptEntry {
                key: key.to_string(),
                reason: e.to_string(),
            }
        })?;
        log::info!("cache: loaded {} months from {}", dataset.len(), key);
        Ok(dataset)
    }

    /// Stored keys in ascending order; empty when nothing is stored.
    fn list_keys(&self) -> Result<Vec<CacheKey>> {
        let mut keys = self.entry_keys()?;
        keys.sort();
        keys.dedup();
        Ok(keys)
    }
}
