use crate::codec;
use crate::{CacheKey, CacheStore};
use rain_core::{MonthlySummary, RainfallError, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Subdirectory holding in-progress writes. Listing only looks at regular
/// files, so nothing in here is ever a key.
pub const STAGING_DIR: &str = ".staging";

/// One CSV entry file per key inside a single directory.
///
/// Entries are written to a temporary file under [`STAGING_DIR`] and renamed
/// into place, so a reader sees either the old or the new entry. Every other
/// regular file in the directory is listed as a key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.as_str())
    }
}

impl CacheStore for FileStore {
    fn write_entry(&self, key: &CacheKey, summaries: &[MonthlySummary]) -> Result<()> {
        if key.as_str() == STAGING_DIR {
            return Err(RainfallError::Storage(format!(
                "{key:?} is reserved by the file store"
            )));
        }
        let staging = self.dir.join(STAGING_DIR);
        fs::create_dir_all(&staging).map_err(|e| RainfallError::io(&staging, e))?;
        let blob = codec::encode(summaries).map_err(RainfallError::Storage)?;

        let mut temp = NamedTempFile::new_in(&staging).map_err(|e| RainfallError::io(&staging, e))?;
        temp.write_all(blob.as_bytes())
            .map_err(|e| RainfallError::io(temp.path(), e))?;
        let target = self.path_for(key);
        temp.persist(&target)
            .map_err(|e| RainfallError::io(&target, e.error))?;
        log::debug!("cache: wrote {}", target.display());
        Ok(())
    }

    fn read_entry(&self, key: &CacheKey) -> Result<Option<Vec<MonthlySummary>>> {
        let path = self.path_for(key);
        let corrupt = |reason: String| RainfallError::CorruptEntry {
            key: key.to_string(),
            reason,
        };
        match fs::read_to_string(&path) {
            Ok(blob) => codec::decode(&blob).map(Some).map_err(corrupt),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == ErrorKind::InvalidData => Err(corrupt(e.to_string())),
            Err(e) => Err(RainfallError::io(path, e)),
        }
    }

    fn entry_keys(&self) -> Result<Vec<CacheKey>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RainfallError::io(&self.dir, e)),
        };

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| RainfallError::io(&self.dir, e))?;
            let file_type = entry.file_type().map_err(|e| RainfallError::io(entry.path(), e))?;
            if !file_type.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                log::warn!("cache: skipping non UTF-8 file name {:?}", entry.path());
                continue;
            };
            if let Some(key) = CacheKey::new(name) {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    fn store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("analysed"));
        (dir, store)
    }

    #[test]
    fn round_trip() {
        let (_dir, store) = store();
        test_support::round_trip(&store);
    }

    #[test]
    fn unnamed_dataset_is_not_saved() {
        let (_dir, store) = store();
        test_support::unnamed_dataset_is_not_saved(&store);
        assert!(!store.dir().exists());
    }

    #[test]
    fn missing_key_is_not_found() {
        let (_dir, store) = store();
        test_support::missing_key_is_not_found(&store);
    }

    #[test]
    fn last_write_wins() {
        let (_dir, store) = store();
        test_support::last_write_wins(&store);
    }

    #[test]
    fn lists_sorted_keys() {
        let (_dir, store) = store();
        test_support::lists_sorted_keys(&store);
    }

    #[test]
    fn empty_named_dataset_round_trips() {
        let (_dir, store) = store();
        test_support::empty_named_dataset_round_trips(&store);
    }

    #[test]
    fn saved_file_is_readable_csv() {
        let (_dir, store) = store();
        let key = store.save(&test_support::sample()).unwrap().unwrap();
        let text = fs::read_to_string(store.path_for(&key)).unwrap();
        assert!(text.starts_with("year,month,total,min,max,days\n2024,1,40.0,10.0,30.0,2\n"));
    }

    #[test]
    fn listing_ignores_directories_and_staged_writes() {
        let (_dir, store) = store();
        store.save(&test_support::sample()).unwrap();
        fs::create_dir(store.dir().join("nested")).unwrap();
        fs::write(store.dir().join(STAGING_DIR).join("half.csv"), "year").unwrap();
        let keys = store.list_keys().unwrap();
        assert_eq!(keys, vec![CacheKey::new("sample.csv").unwrap()]);
        assert_eq!(
            fs::read_dir(store.dir().join(STAGING_DIR)).unwrap().count(),
            1
        );
    }

    #[test]
    fn temp_like_names_are_listed() {
        let (_dir, store) = store();
        let dataset = rain_core::Aggregator::default()
            .aggregate_str(".tmp-station.csv", "date,rainfall\n2024-01-01,1\n")
            .unwrap();
        let key = store.save(&dataset).unwrap().unwrap();
        assert_eq!(store.list_keys().unwrap(), vec![key.clone()]);
        assert_eq!(store.load(&key).unwrap(), dataset);
    }

    #[test]
    fn staging_name_is_reserved() {
        let (_dir, store) = store();
        let dataset = rain_core::Aggregator::default()
            .aggregate_str(STAGING_DIR, "date,rainfall\n2024-01-01,1\n")
            .unwrap();
        assert!(matches!(
            store.save(&dataset),
            Err(RainfallError::Storage(_))
        ));
        assert!(store.list_keys().unwrap().is_empty());
    }

    #[test]
    fn unusable_directory_is_io_failure_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("cache");
        fs::write(&not_a_dir, "plain file").unwrap();
        let store = FileStore::new(&not_a_dir);

        match store.save(&test_support::sample()) {
            Err(RainfallError::Io { path, .. }) => assert!(path.starts_with(&not_a_dir)),
            other => panic!("expected io error, got {other:?}"),
        }
        match store.list_keys() {
            Err(RainfallError::Io { path, .. }) => assert_eq!(path, not_a_dir),
            other => panic!("expected io error, got {other:?}"),
        }
        let key = CacheKey::new("sample.csv").unwrap();
        match store.load(&key) {
            Err(RainfallError::Io { path, .. }) => assert_eq!(path, not_a_dir.join("sample.csv")),
            other => panic!("expected io error, got {other:?}"),
        }
        assert_eq!(fs::read_to_string(&not_a_dir).unwrap(), "plain file");
    }

    #[test]
    fn corrupt_file_is_reported_and_left_alone() {
        let (_dir, store) = store();
        fs::create_dir_all(store.dir()).unwrap();
        let key = CacheKey::new("garbage.csv").unwrap();
        fs::write(store.path_for(&key), "this is not a saved dataset").unwrap();
        assert!(matches!(
            store.load(&key),
            Err(RainfallError::CorruptEntry { .. })
        ));
        let invalid_utf8 = CacheKey::new("binary.csv").unwrap();
        fs::write(store.path_for(&invalid_utf8), [0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(
            store.load(&invalid_utf8),
            Err(RainfallError::CorruptEntry { .. })
        ));
        assert_eq!(
            fs::read_to_string(store.path_for(&key)).unwrap(),
            "this is not a saved dataset"
        );
    }
}
