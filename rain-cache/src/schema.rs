//! SQL schema of the SQLite cache backend.

/// Returns the full SQL schema as a single batch string.
///
/// - `entries` - one row per saved key, with the time it was written
/// - `summaries` - the monthly summaries of each entry
///
/// A key with an `entries` row and no `summaries` rows is a saved dataset
/// with no months.
pub fn create_schema() -> &'static str {
    r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS entries (
        key TEXT PRIMARY KEY,
        saved_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS summaries (
        key TEXT NOT NULL REFERENCES entries(key) ON DELETE CASCADE,
        year INTEGER NOT NULL,
        month INTEGER NOT NULL,
        total REAL NOT NULL,
        min REAL NOT NULL,
        max REAL NOT NULL,
        days INTEGER NOT NULL,
        PRIMARY KEY (key, year, month)
    );
    CREATE INDEX IF NOT EXISTS idx_summaries_key ON summaries(key);
    "#
}
