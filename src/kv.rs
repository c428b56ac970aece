// Key-value slot backing the task store: SQLite on disk, HashMap in memory

use eyre::{Context, Result, eyre};
use fs2::FileExt;
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CURRENT_VERSION: u32 = 1;

/// String-keyed persistent slot, the local-storage equivalent
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Volatile slot, lost when dropped
#[derive(Debug, Default, Clone)]
pub struct MemoryKv {
    entries: HashMap<String, String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// SQLite-backed slot living in a store directory
///
/// The directory holds `tasklist.db`, a `.version` file and
/// `tasklist.lock`. The lock is held exclusively for the lifetime of the
/// value so a second process cannot write behind our back.
pub struct SqliteKv {
    base_path: PathBuf,
    db: Connection,
    _lock: File,
}

impl SqliteKv {
    /// Open or create a store at the given directory
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        fs::create_dir_all(&base_path).context("Failed to create store directory")?;

        let lock_path = base_path.join("tasklist.lock");
        let lock = File::create(&lock_path).context("Failed to create lock file")?;
        lock.try_lock_exclusive()
            .map_err(|e| eyre!("Store {} is in use by another process: {}", base_path.display(), e))?;

        let db_path = base_path.join("tasklist.db");
        let db = Connection::open(&db_path).context("Failed to open SQLite database")?;

        let store = Self {
            base_path,
            db,
            _lock: lock,
        };

        store.create_schema()?;
        store.write_version()?;

        info!(path = ?store.base_path, "Opened key-value store");
        Ok(store)
    }

    /// Get the base path of this store
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn create_schema(&self) -> Result<()> {
        debug!("Creating database schema");

        self.db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        Ok(())
    }

    fn write_version(&self) -> Result<()> {
        let version_path = self.base_path.join(".version");
        if !version_path.exists() {
            fs::write(version_path, CURRENT_VERSION.to_string())?;
        }
        Ok(())
    }

    fn validate_key(key: &str) -> Result<()> {
        if key.trim().is_empty() {
            return Err(eyre!("Key cannot be empty or whitespace-only"));
        }
        if key.len() > 256 {
            return Err(eyre!("Key too long: {} chars (max 256)", key.len()));
        }
        Ok(())
    }
}

impl KeyValueStore for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .db
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()
            .with_context(|| format!("Failed to read key {}", key))?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        Self::validate_key(key)?;

        self.db
            .execute(
                "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![key, value, crate::now_ms() as i64],
            )
            .with_context(|| format!("Failed to write key {}", key))?;

        debug!(key, bytes = value.len(), "Wrote key");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.db
            .execute("DELETE FROM kv WHERE key = ?1", [key])
            .with_context(|| format!("Failed to delete key {}", key))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_kv_roundtrip() {
        let mut kv = MemoryKv::new();
        assert_eq!(kv.get("todos").unwrap(), None);

        kv.set("todos", "[]").unwrap();
        assert_eq!(kv.get("todos").unwrap().as_deref(), Some("[]"));

        kv.remove("todos").unwrap();
        assert_eq!(kv.get("todos").unwrap(), None);
    }

    #[test]
    fn test_sqlite_kv_open_creates_layout() {
        let temp = TempDir::new().unwrap();
        let store_path = temp.path().join("store");

        let kv = SqliteKv::open(&store_path).unwrap();
        assert_eq!(kv.base_path(), store_path.as_path());
        assert!(store_path.join("tasklist.db").exists());
        assert!(store_path.join("tasklist.lock").exists());
        assert_eq!(fs::read_to_string(store_path.join(".version")).unwrap(), "1");
    }

    #[test]
    fn test_sqlite_kv_set_get_remove() {
        let temp = TempDir::new().unwrap();
        let mut kv = SqliteKv::open(temp.path()).unwrap();

        assert_eq!(kv.get("hasVisited").unwrap(), None);
        kv.set("hasVisited", "true").unwrap();
        assert_eq!(kv.get("hasVisited").unwrap().as_deref(), Some("true"));

        kv.set("hasVisited", "false").unwrap();
        assert_eq!(kv.get("hasVisited").unwrap().as_deref(), Some("false"));

        kv.remove("hasVisited").unwrap();
        assert_eq!(kv.get("hasVisited").unwrap(), None);
    }

    #[test]
    fn test_sqlite_kv_persists_across_reopen() {
        let temp = TempDir::new().unwrap();
        {
            let mut kv = SqliteKv::open(temp.path()).unwrap();
            kv.set("todos", r#"[{"id":1}]"#).unwrap();
        }

        let kv = SqliteKv::open(temp.path()).unwrap();
        assert_eq!(kv.get("todos").unwrap().as_deref(), Some(r#"[{"id":1}]"#));
    }

    #[test]
    fn test_sqlite_kv_rejects_second_open() {
        let temp = TempDir::new().unwrap();
        let _first = SqliteKv::open(temp.path()).unwrap();

        let second = SqliteKv::open(temp.path());
        assert!(second.is_err());
    }

    #[test]
    fn test_sqlite_kv_rejects_blank_key() {
        let temp = TempDir::new().unwrap();
        let mut kv = SqliteKv::open(temp.path()).unwrap();

        assert!(kv.set("  ", "x").is_err());
        assert!(kv.set(&"k".repeat(257), "x").is_err());
    }
}
