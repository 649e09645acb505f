//! Global options shared by every subcommand.

use anyhow::{bail, Context};
use clap::{Args, ValueEnum};
use rain_cache::{CacheStore, FileStore, SqliteStore};
use rain_core::InputFormat;
use std::path::PathBuf;

/// Where saved datasets live unless `--cache-dir` says otherwise.
pub const DEFAULT_CACHE_DIR: &str = "analysed-rainfall";

/// Directory of entry files inside the cache directory, used by `--store file`.
pub const ENTRIES_DIR_NAME: &str = "entries";

/// Database file used inside the cache directory by `--store sqlite`.
pub const SQLITE_FILE_NAME: &str = "rainfall.sqlite";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// One CSV file per saved dataset
    File,
    /// A single SQLite database
    Sqlite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    /// `date,amount[,...]`
    Date,
    /// Bureau of Meteorology export: year, month and day in columns 3-5, amount in column 6
    Bom,
}

#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Directory holding saved analysed rainfall data
    #[arg(long, global = true, default_value = DEFAULT_CACHE_DIR)]
    pub cache_dir: PathBuf,

    /// Storage backend for saved data
    #[arg(long, global = true, value_enum, default_value_t = StoreKind::File)]
    pub store: StoreKind,

    /// Column layout of the daily rainfall file
    #[arg(long, global = true, value_enum, default_value_t = Layout::Date)]
    pub layout: Layout,

    /// chrono format of the date column (date layout only)
    #[arg(long, global = true, default_value = rain_core::input_format::DEFAULT_DATE_FORMAT)]
    pub date_format: String,

    /// Field delimiter of the daily rainfall file
    #[arg(long, global = true, default_value_t = ',')]
    pub delimiter: char,

    /// The daily rainfall file has no header row
    #[arg(long, global = true)]
    pub no_headers: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            store: StoreKind::File,
            layout: Layout::Date,
            date_format: rain_core::input_format::DEFAULT_DATE_FORMAT.to_string(),
            delimiter: ',',
            no_headers: false,
        }
    }
}

impl Settings {
    pub fn input_format(&self) -> anyhow::Result<InputFormat> {
        if !self.delimiter.is_ascii() {
            bail!("delimiter {:?} must be a single ASCII character", self.delimiter);
        }
        let base = match self.layout {
            Layout::Date => InputFormat::default(),
            Layout::Bom => InputFormat::bom(),
        };
        Ok(InputFormat {
            delimiter: self.delimiter as u8,
            has_headers: !self.no_headers,
            date_format: self.date_format.clone(),
            ..base
        })
    }

    pub fn open_store(&self) -> anyhow::Result<Box<dyn CacheStore>> {
        match self.store {
            StoreKind::File => Ok(Box::new(FileStore::new(
                self.cache_dir.join(ENTRIES_DIR_NAME),
            ))),
            StoreKind::Sqlite => {
                std::fs::create_dir_all(&self.cache_dir).with_context(|| {
                    format!("Failed to create cache directory {}", self.cache_dir.display())
                })?;
                let store = SqliteStore::open(self.cache_dir.join(SQLITE_FILE_NAME))?;
                Ok(Box::new(store))
            }
        }
    }
}
