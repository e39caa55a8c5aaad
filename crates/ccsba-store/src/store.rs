//! Key-value store adapter.
//!
//! A thin wrapper over a single-table SQLite database: JSON-serializable
//! values under string keys, mirroring the localStorage layout existing
//! deployments already hold.  The [`Store`] owns its connection behind a
//! mutex; [`Store::update`] holds that lock for a full read-modify-write
//! cycle, which is what removes the lossy last-write-wins race the web
//! client had (see DESIGN.md).

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use directories::ProjectDirs;
use rusqlite::{Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StoreError};

/// Shared handle to the local key-value store.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (or create) the default platform database.
    ///
    /// The database file is placed in the platform-appropriate data
    /// directory, e.g. `~/.local/share/ccsba/ccsba.db` on Linux.
    pub fn new() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("org", "ctcannabisalliance", "ccsba").ok_or(StoreError::NoDataDir)?;

        let data_dir = project_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        let db_path = data_dir.join("ccsba.db");
        tracing::info!(path = %db_path.display(), "opening store");

        Self::open_at(&db_path)
    }

    /// Open (or create) a store at an explicit path.  Useful for tests and
    /// custom directory layouts.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::init(conn)
    }

    /// Fully in-memory store for unit tests.
    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // A poisoned lock only means another thread panicked mid-operation;
        // the connection itself is still usable.
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Read the value stored under `key`.  Returns `Ok(None)` on a missing
    /// key; never errors for absence.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let conn = self.lock();
        read_value(&conn, key)
    }

    /// Read the value stored under `key`, defaulting to `T::default()`
    /// (empty array / object) when the key is absent.
    pub fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        Ok(self.get(key)?.unwrap_or_default())
    }

    /// Persist `value` under `key`, replacing any prior contents in a single
    /// write.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let conn = self.lock();
        write_value(&conn, key, value)
    }

    /// Remove `key`.  Removing a missing key is not an error.
    pub fn remove(&self, key: &str) -> Result<()> {
        let conn = self.lock();
        conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }

    /// Atomic read-modify-write of the collection under `key`.
    ///
    /// Loads the current value (default when absent), applies `f`, and
    /// writes the result back, all while holding the store lock.  Every
    /// repository mutation goes through here.
    pub fn update<T, R, F>(&self, key: &str, f: F) -> Result<R>
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnOnce(&mut T) -> R,
    {
        let conn = self.lock();
        let mut value: T = read_value(&conn, key)?.unwrap_or_default();
        let out = f(&mut value);
        write_value(&conn, key, &value)?;
        Ok(out)
    }

    /// Filesystem path of the open database, if file-backed.
    pub fn path(&self) -> Option<PathBuf> {
        self.lock().path().map(PathBuf::from)
    }
}

fn read_value<T: DeserializeOwned>(conn: &Connection, key: &str) -> Result<Option<T>> {
    let raw: Option<String> = conn
        .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()?;

    match raw {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

fn write_value<T: Serialize>(conn: &Connection, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    conn.execute(
        "INSERT INTO kv (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        [key, json.as_str()],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_none() {
        let store = Store::in_memory().unwrap();
        let got: Option<Vec<String>> = store.get("nope").unwrap();
        assert!(got.is_none());
        let empty: Vec<String> = store.get_or_default("nope").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn set_get_remove_round_trip() {
        let store = Store::in_memory().unwrap();
        store.set("k", &vec!["a".to_string(), "b".to_string()]).unwrap();
        let got: Vec<String> = store.get("k").unwrap().unwrap();
        assert_eq!(got, vec!["a", "b"]);

        store.remove("k").unwrap();
        assert!(store.get::<Vec<String>>("k").unwrap().is_none());
        // removing again is fine
        store.remove("k").unwrap();
    }

    #[test]
    fn update_starts_from_default_and_persists() {
        let store = Store::in_memory().unwrap();
        let len = store
            .update::<Vec<u32>, _, _>("nums", |nums| {
                nums.push(7);
                nums.len()
            })
            .unwrap();
        assert_eq!(len, 1);

        let nums: Vec<u32> = store.get("nums").unwrap().unwrap();
        assert_eq!(nums, vec![7]);
    }

    #[test]
    fn open_at_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");

        {
            let store = Store::open_at(&path).unwrap();
            store.set("greeting", &"hello".to_string()).unwrap();
            assert!(store.path().is_some());
        }

        let store = Store::open_at(&path).unwrap();
        let got: String = store.get("greeting").unwrap().unwrap();
        assert_eq!(got, "hello");
    }
}
