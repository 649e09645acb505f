use crate::codec;
use crate::{CacheKey, CacheStore};
use rain_core::{MonthlySummary, RainfallError, Result};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// In-process store holding encoded entries, so it decodes exactly what a
/// persistent backend would.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<CacheKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put an already encoded entry in place, bypassing the codec.
    pub fn insert_raw(&self, key: CacheKey, blob: impl Into<String>) {
        self.entries.borrow_mut().insert(key, blob.into());
    }

    /// The encoded entry stored under `key`.
    pub fn raw(&self, key: &CacheKey) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl CacheStore for MemoryStore {
    fn write_entry(&self, key: &CacheKey, summaries: &[MonthlySummary]) -> Result<()> {
        let blob = codec::encode(summaries).map_err(RainfallError::Storage)?;
        self.entries.borrow_mut().insert(key.clone(), blob);
        Ok(())
    }

    fn read_entry(&self, key: &CacheKey) -> Result<Option<Vec<MonthlySummary>>> {
        let entries = self.entries.borrow();
        let Some(blob) = entries.get(key) else {
            return Ok(None);
        };
        codec::decode(blob)
            .map(Some)
            .map_err(|reason| RainfallError::CorruptEntry {
                key: key.to_string(),
                reason,
            })
    }

    fn entry_keys(&self) -> Result<Vec<CacheKey>> {
        Ok(self.entries.borrow().keys().cloned().collect())
    }
}
