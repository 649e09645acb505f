//! The dataset currently being looked at, and the store it is saved to.

use rain_cache::{CacheKey, CacheStore};
use rain_chart::{StackedChart, Stacking};
use rain_core::{Aggregator, RainfallDataset, Result};
use std::path::Path;
use std::sync::Arc;

/// Owns the current dataset as an immutable snapshot.
///
/// Opening a file or a saved key builds the complete dataset first and only
/// then swaps it in; a failed open leaves the previous snapshot current.
pub struct Session {
    aggregator: Aggregator,
    store: Box<dyn CacheStore>,
    current: Arc<RainfallDataset>,
}

impl Session {
    pub fn new(aggregator: Aggregator, store: Box<dyn CacheStore>) -> Self {
        Self {
            aggregator,
            store,
            current: Arc::new(RainfallDataset::empty()),
        }
    }

    /// Snapshot of the current dataset; later opens do not change it.
    pub fn current(&self) -> Arc<RainfallDataset> {
        Arc::clone(&self.current)
    }

    pub fn open_file(&mut self, path: impl AsRef<Path>) -> Result<Arc<RainfallDataset>> {
        let dataset = self.aggregator.aggregate_file(path)?;
        Ok(self.replace(dataset))
    }

    pub fn open_cached(&mut self, key: &CacheKey) -> Result<Arc<RainfallDataset>> {
        let dataset = self.store.load(key)?;
        Ok(self.replace(dataset))
    }

    /// `Ok(None)` when nothing has been loaded yet.
    pub fn save_current(&self) -> Result<Option<CacheKey>> {
        self.store.save(&self.current)
    }

    pub fn saved_keys(&self) -> Result<Vec<CacheKey>> {
        self.store.list_keys()
    }

    pub fn chart(&self, stacking: Stacking) -> StackedChart {
        StackedChart::from_dataset_with(&self.current, stacking)
    }

    fn replace(&mut self, dataset: RainfallDataset) -> Arc<RainfallDataset> {
        self.current = Arc::new(dataset);
        self.current()
    }
}
