use crate::schema;
use crate::{CacheKey, CacheStore};
use chrono::{DateTime, Utc};
use rain_core::{MonthlySummary, RainfallError, Result, SummaryRow};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

fn storage(e: rusqlite::Error) -> RainfallError {
    RainfallError::Storage(e.to_string())
}

/// Saved datasets in a SQLite database.
///
/// Cheaply cloneable; clones share one connection.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Rc<RefCell<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a database file with the schema applied.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            RainfallError::Storage(format!("cannot open {}: {e}", path.display()))
        })?;
        Self::with_connection(conn)
    }

    /// A store that lives as long as this value.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory().map_err(storage)?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(schema::create_schema()).map_err(storage)?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }

    /// When the entry under `key` was last written.
    pub fn saved_at(&self, key: &CacheKey) -> Result<Option<DateTime<Utc>>> {
        let conn = self.conn.borrow();
        let saved_at: Option<String> = conn
            .query_row(
                "SELECT saved_at FROM entries WHERE key = ?1",
                params![key.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(storage)?;
        saved_at
            .map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|t| t.with_timezone(&Utc))
                    .map_err(|e| RainfallError::CorruptEntry {
                        key: key.to_string(),
                        reason: format!("bad saved_at {s:?}: {e}"),
                    })
            })
            .transpose()
    }
}

impl CacheStore for SqliteStore {
    fn write_entry(&self, key: &CacheKey, summaries: &[MonthlySummary]) -> Result<()> {
        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction().map_err(storage)?;
        tx.execute("DELETE FROM summaries WHERE key = ?1", params![key.as_str()])
            .map_err(storage)?;
        tx.execute(
            "INSERT OR REPLACE INTO entries (key, saved_at) VALUES (?1, ?2)",
            params![key.as_str(), Utc::now().to_rfc3339()],
        )
        .map_err(storage)?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO summaries (key, year, month, total, min, max, days)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                )
                .map_err(storage)?;
            for summary in summaries {
                stmt.execute(params![
                    key.as_str(),
                    summary.year(),
                    summary.month(),
                    summary.total(),
                    summary.min(),
                    summary.max(),
                    summary.days(),
                ])
                .map_err(storage)?;
            }
        }
        tx.commit().map_err(storage)?;
        log::debug!("cache: stored {} summaries for {}", summaries.len(), key);
        Ok(())
    }

    fn read_entry(&self, key: &CacheKey) -> Result<Option<Vec<MonthlySummary>>> {
        let conn = self.conn.borrow();
        let exists = conn
            .query_row(
                "SELECT 1 FROM entries WHERE key = ?1",
                params![key.as_str()],
                |_| Ok(()),
            )
            .optional()
            .map_err(storage)?
            .is_some();
        if !exists {
            return Ok(None);
        }

        let corrupt = |reason: String| RainfallError::CorruptEntry {
            key: key.to_string(),
            reason,
        };
        let mut stmt = conn
            .prepare(
                "SELECT year, month, total, min, max, days FROM summaries
                 WHERE key = ?1
                 ORDER BY year, month",
            )
            .map_err(storage)?;
        let rows = stmt
            .query_map(params![key.as_str()], |row| {
                Ok(SummaryRow {
                    year: row.get(0)?,
                    month: row.get(1)?,
                    total: row.get(2)?,
                    min: row.get(3)?,
                    max: row.get(4)?,
                    days: row.get(5)?,
                })
            })
            .map_err(storage)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| corrupt(e.to_string()))?;

        rows.into_iter()
            .map(|row| MonthlySummary::try_from(row).map_err(|e| corrupt(e.to_string())))
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    fn entry_keys(&self) -> Result<Vec<CacheKey>> {
        let conn = self.conn.borrow();
        let mut stmt = conn
            .prepare("SELECT key FROM entries ORDER BY key")
            .map_err(storage)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(storage)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(storage)?;
        Ok(names.iter().filter_map(|name| CacheKey::new(name)).collect())
    }
}
