use super::{decode_history, encode_history, HistoryStore};
use crate::logger;
use crate::models::HistoryRecord;
use crate::utils::now;
use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

const HISTORY_KEY: &str = "history";

/// Key-value blob store backed by SQLite. The history list lives under a
/// single key and is replaced inside a transaction on every save.
pub struct SqliteStore {
    conn: Connection,
}

pub(crate) fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL
        )",
        [],
    )?;
    Ok(())
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating data directory {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("opening history database {}", path.display()))?;
        run_migrations(&conn).context("running history migrations")?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    fn read_blob(&self) -> rusqlite::Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?", [HISTORY_KEY], |row| {
                row.get(0)
            })
            .optional()
    }
}

impl HistoryStore for SqliteStore {
    fn load(&self) -> Vec<HistoryRecord> {
        match self.read_blob() {
            Ok(Some(blob)) => decode_history(&blob),
            Ok(None) => Vec::new(),
            Err(e) => {
                logger::log(&format!("Failed to read history: {}", e));
                Vec::new()
            }
        }
    }

    fn save(&mut self, records: &[HistoryRecord]) -> Result<()> {
        let blob = encode_history(records)?;
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![HISTORY_KEY, blob, now()],
        )?;
        tx.commit().context("committing history")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::History;
    use crate::models::{SearchRecord, SearchResult};
    use uuid::Uuid;

    fn record(query: &str) -> HistoryRecord {
        HistoryRecord::Search(SearchRecord {
            id: Uuid::new_v4(),
            query: query.to_string(),
            result: SearchResult::default(),
            timestamp: 7,
        })
    }

    #[test]
    fn test_migrations_create_kv_table() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();
        assert!(tables.contains(&"kv".to_string()));
    }

    #[test]
    fn test_history_survives_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("nested").join("study.db");

        {
            let mut history = History::new(SqliteStore::open(&db_path).unwrap());
            history.append(record("one")).unwrap();
            history.append(record("two")).unwrap();
        }

        let history = History::new(SqliteStore::open(&db_path).unwrap());
        let titles: Vec<String> = history.records().iter().map(|r| r.title()).collect();
        assert_eq!(titles, vec!["Search: two", "Search: one"]);
    }

    #[test]
    fn test_save_replaces_whole_list() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.save(&[record("a"), record("b")]).unwrap();
        store.save(&[record("c")]).unwrap();
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn test_corrupt_blob_loads_empty() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?, ?, 0)",
                [HISTORY_KEY, "[{\"type\": \"quiz\"}]"],
            )
            .unwrap();
        assert!(store.load().is_empty());
    }
}
