use rain_utils::names;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Name a dataset is saved under: the source file name with any directories
/// removed, e.g. `rainfall_2019.csv`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CacheKey(String);

impl CacheKey {
    /// Returns `None` for names that cannot identify a file.
    pub fn new(name: &str) -> Option<Self> {
        let name = names::file_name(name);
        match name {
            "" | "." | ".." => None,
            _ => Some(CacheKey(name.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CacheKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CacheKey::new(s).ok_or_else(|| format!("{s:?} is not a valid cache key"))
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
