use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::annotations::AnnotationMap;
use crate::error::{Result, TaggerError};
#[cfg(test)]
use std::cell::RefCell;

/// Name of the single slot holding the serialized annotation map
pub const STORAGE_KEY: &str = "bjn-tagger-data";

/// Durable home of the annotation map.
///
/// `load` never fails: a missing or unreadable slot is an empty map.
pub trait AnnotationStore {
    fn load(&self) -> AnnotationMap;

    /// Overwrite the slot with `map`
    fn save(&self, map: &AnnotationMap) -> Result<()>;

    /// Clear the slot
    fn reset(&self) -> Result<()>;
}

/// Annotation store backed by a key/value table in SQLite.
pub struct SqliteStore {
    conn: Connection,
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open (or create) the store at `db_path`.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&db_path)?;
        let store = SqliteStore { conn, db_path };
        store.init_schema()?;

        info!(path = %store.db_path.display(), "annotation store opened");
        Ok(store)
    }

    /// Default location of the database file.
    ///
    /// - Linux: ~/.local/share/bjn-tagger/tagger.db
    /// - macOS: ~/Library/Application Support/bjn-tagger/tagger.db
    /// - Windows: %APPDATA%\bjn-tagger\tagger.db
    pub fn default_path() -> Result<PathBuf> {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or(TaggerError::NoDataDir)?;

        path.push("bjn-tagger");
        path.push("tagger.db");
        Ok(path)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key             TEXT PRIMARY KEY,
                value           TEXT NOT NULL,
                updated_at      INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    fn read_slot(&self) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [STORAGE_KEY], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    /// When the slot was last written, if ever
    pub fn updated_at(&self) -> Result<Option<DateTime<Utc>>> {
        let seconds: Option<i64> = self
            .conn
            .query_row("SELECT updated_at FROM kv WHERE key = ?1", [STORAGE_KEY], |row| row.get(0))
            .optional()?;
        Ok(seconds.and_then(|s| Utc.timestamp_opt(s, 0).single()))
    }
}

impl AnnotationStore for SqliteStore {
    fn load(&self) -> AnnotationMap {
        let raw = match self.read_slot() {
            Ok(Some(raw)) => raw,
            Ok(None) => return AnnotationMap::new(),
            Err(err) => {
                warn!(error = %err, "could not read annotation slot, starting empty");
                return AnnotationMap::new();
            }
        };

        match AnnotationMap::from_json(&raw) {
            Ok(map) => {
                info!(entries = map.len(), "annotations loaded");
                map
            }
            Err(err) => {
                warn!(error = %err, "stored annotations are malformed, starting empty");
                AnnotationMap::new()
            }
        }
    }

    fn save(&self, map: &AnnotationMap) -> Result<()> {
        let json = map.to_json()?;
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![STORAGE_KEY, json, Utc::now().timestamp()],
        )?;
        debug!(entries = map.len(), "annotations saved");
        Ok(())
    }

    fn reset(&self) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", [STORAGE_KEY])?;
        info!("annotation store reset");
        Ok(())
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("db_path", &self.db_path)
            .finish()
    }
}

/// In-process store, holding the same serialized blob SQLite would
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: RefCell<Option<String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with raw slot content, e.g. a corrupted blob
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self { slot: RefCell::new(Some(raw.into())) }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

#[cfg(test)]
impl AnnotationStore for MemoryStore {
    fn load(&self) -> AnnotationMap {
        self.slot
            .borrow()
            .as_deref()
            .and_then(|raw| AnnotationMap::from_json(raw).ok())
            .unwrap_or_default()
    }

    fn save(&self, map: &AnnotationMap) -> Result<()> {
        *self.slot.borrow_mut() = Some(map.to_json()?);
        Ok(())
    }

    fn reset(&self) -> Result<()> {
        *self.slot.borrow_mut() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::{AnnotationPatch, Category, ImageId};

    fn sample_map() -> AnnotationMap {
        AnnotationMap::new()
            .update(&ImageId::from("/portraits/PPGB0253.jpg"), AnnotationPatch::category(Some(Category::Portraits)))
            .update(&ImageId::from("/portraits/PPGB0253.jpg"), AnnotationPatch::cover(true))
    }

    #[test]
    fn test_sqlite_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("nested").join("tagger.db")).unwrap();

        assert!(store.load().is_empty());
        assert!(store.updated_at().unwrap().is_none());

        let map = sample_map();
        store.save(&map).unwrap();
        assert_eq!(store.load(), map);
        assert!(store.updated_at().unwrap().is_some());
    }

    #[test]
    fn test_sqlite_save_overwrites_and_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tagger.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.save(&sample_map()).unwrap();
            store.save(&AnnotationMap::new()).unwrap();
            store.save(&sample_map()).unwrap();
        }

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.load(), sample_map());
    }

    #[test]
    fn test_sqlite_corrupted_slot_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("tagger.db")).unwrap();
        store
            .conn
            .execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, 0)",
                rusqlite::params![STORAGE_KEY, "{not json"],
            )
            .unwrap();

        assert!(store.load().is_empty());
    }

    #[test]
    fn test_one_bad_entry_keeps_the_rest() {
        let raw = r#"{
            "/a/1.jpg": {"category": "Portraits", "size": "giant"},
            "/a/2.jpg": {"category": "Community", "title": "keep me"},
            "/a/3.jpg": 42
        }"#;

        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("tagger.db")).unwrap();
        store
            .conn
            .execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, 0)",
                rusqlite::params![STORAGE_KEY, raw],
            )
            .unwrap();

        let map = store.load();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("/a/1.jpg").category, Some(Category::Portraits));
        assert_eq!(map.get("/a/2.jpg").title, "keep me");
        assert_eq!(map.get("/a/2.jpg").category, Some(Category::Community));

        assert_eq!(MemoryStore::with_raw(raw).load(), map);
    }

    #[test]
    fn test_sqlite_reset_clears_slot() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("tagger.db")).unwrap();
        store.save(&sample_map()).unwrap();
        store.reset().unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_memory_store_fails_soft() {
        assert!(MemoryStore::with_raw("[1, 2, 3]").load().is_empty());
        assert!(MemoryStore::with_raw("").load().is_empty());

        let store = MemoryStore::new();
        store.save(&sample_map()).unwrap();
        assert_eq!(store.load(), sample_map());
    }
}
