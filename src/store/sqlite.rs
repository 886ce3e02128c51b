use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use rusqlite_migration::{Migrations, M};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::app::{Result, YomuError};
use crate::domain::{FavoriteEntry, ReadingProgress};
use crate::store::ProgressStore;

const FAVORITES_KEY: &str = "favorites";
const PROGRESS_KEY: &str = "reading_progress";

/// SQLite-backed [`ProgressStore`].
///
/// Each logical table is one JSON blob in the `kv_blobs` table: an ordered
/// array for favorites, a title-id map for progress. Every read deserializes
/// the whole blob and every write re-serializes it; read-modify-write cycles
/// are serialized by the connection mutex. O(n) per write, fine at the
/// hundreds-of-titles scale this store sees.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.lock_conn()?;
        migrations
            .to_latest(&mut conn)
            .map_err(|_| YomuError::Database(rusqlite::Error::InvalidQuery))?;

        Ok(())
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            YomuError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn read_blob<T: DeserializeOwned>(conn: &Connection, key: &str) -> Result<Option<T>> {
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM kv_blobs WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn write_blob<T: Serialize>(conn: &Connection, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        conn.execute(
            "INSERT INTO kv_blobs (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
            params![key, json, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Read path: any storage or decode failure degrades to the empty value.
    fn read_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let conn = match self.lock_conn() {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("Store read for {} failed: {}", key, e);
                return T::default();
            }
        };

        match Self::read_blob(&conn, key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!("Store read for {} failed: {}", key, e);
                T::default()
            }
        }
    }

    /// Write path: a corrupt existing blob is discarded so the write can
    /// proceed; storage errors still fail the write.
    fn read_for_update<T: DeserializeOwned + Default>(conn: &Connection, key: &str) -> Result<T> {
        match Self::read_blob(conn, key) {
            Ok(value) => Ok(value.unwrap_or_default()),
            Err(YomuError::Serialize(e)) => {
                tracing::warn!("Discarding corrupt {} blob: {}", key, e);
                Ok(T::default())
            }
            Err(e) => Err(e),
        }
    }
}

impl ProgressStore for SqliteStore {
    fn get_progress(&self, title_id: &str) -> Option<ReadingProgress> {
        let mut map: HashMap<String, ReadingProgress> = self.read_or_default(PROGRESS_KEY);
        map.remove(title_id)
    }

    fn put_progress(&self, progress: &ReadingProgress) -> Result<()> {
        let conn = self.lock_conn()?;
        let mut map: HashMap<String, ReadingProgress> =
            Self::read_for_update(&conn, PROGRESS_KEY)?;
        map.insert(progress.title_id.clone(), progress.clone());
        Self::write_blob(&conn, PROGRESS_KEY, &map)
    }

    fn recently_read(&self, limit: usize) -> Vec<ReadingProgress> {
        let map: HashMap<String, ReadingProgress> = self.read_or_default(PROGRESS_KEY);
        let mut entries: Vec<ReadingProgress> = map.into_values().collect();
        entries.sort_by(|a, b| b.last_read_at.cmp(&a.last_read_at));
        entries.truncate(limit);
        entries
    }

    fn list_favorites(&self) -> Vec<FavoriteEntry> {
        self.read_or_default(FAVORITES_KEY)
    }

    fn is_favorite(&self, title_id: &str) -> bool {
        self.list_favorites()
            .iter()
            .any(|f| f.title_id == title_id)
    }

    fn add_favorite(&self, entry: &FavoriteEntry) -> Result<()> {
        let conn = self.lock_conn()?;
        let mut favorites: Vec<FavoriteEntry> = Self::read_for_update(&conn, FAVORITES_KEY)?;
        favorites.retain(|f| f.title_id != entry.title_id);
        favorites.insert(0, entry.clone());
        Self::write_blob(&conn, FAVORITES_KEY, &favorites)
    }

    fn remove_favorite(&self, title_id: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        let mut favorites: Vec<FavoriteEntry> = Self::read_for_update(&conn, FAVORITES_KEY)?;
        favorites.retain(|f| f.title_id != title_id);
        Self::write_blob(&conn, FAVORITES_KEY, &favorites)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ReadingDirection, Title};
    use chrono::Duration;

    fn progress(title_id: &str, chapter_id: &str, page_index: usize) -> ReadingProgress {
        ReadingProgress {
            title_id: title_id.to_string(),
            chapter_id: chapter_id.to_string(),
            page_index,
            chapter_label: "1".to_string(),
            last_read_at: Utc::now(),
            direction: ReadingDirection::Ltr,
        }
    }

    fn favorite(title_id: &str, name: &str) -> FavoriteEntry {
        FavoriteEntry::snapshot(&Title::new(title_id.to_string(), name.to_string()))
    }

    #[test]
    fn test_put_and_get_progress() {
        let store = SqliteStore::in_memory().unwrap();
        store.put_progress(&progress("t1", "c1", 3)).unwrap();

        let loaded = store.get_progress("t1").unwrap();
        assert_eq!(loaded.chapter_id, "c1");
        assert_eq!(loaded.page_index, 3);
        assert_eq!(loaded.direction, ReadingDirection::Ltr);
    }

    #[test]
    fn test_get_progress_absent() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.get_progress("nope").is_none());
    }

    #[test]
    fn test_put_progress_last_write_wins() {
        let store = SqliteStore::in_memory().unwrap();
        store.put_progress(&progress("t1", "c1", 3)).unwrap();

        let mut update = progress("t1", "c2", 0);
        update.direction = ReadingDirection::Rtl;
        store.put_progress(&update).unwrap();

        let loaded = store.get_progress("t1").unwrap();
        assert_eq!(loaded.chapter_id, "c2");
        assert_eq!(loaded.page_index, 0);
        assert_eq!(loaded.direction, ReadingDirection::Rtl);
    }

    #[test]
    fn test_progress_is_per_title() {
        let store = SqliteStore::in_memory().unwrap();
        store.put_progress(&progress("t1", "c1", 3)).unwrap();
        store.put_progress(&progress("t2", "c9", 7)).unwrap();

        assert_eq!(store.get_progress("t1").unwrap().page_index, 3);
        assert_eq!(store.get_progress("t2").unwrap().page_index, 7);
    }

    #[test]
    fn test_recently_read_ordering_and_limit() {
        let store = SqliteStore::in_memory().unwrap();
        let base = Utc::now();

        for (i, title_id) in ["t1", "t2", "t3"].into_iter().enumerate() {
            let mut p = progress(title_id, "c1", 0);
            p.last_read_at = base + Duration::seconds(i as i64);
            store.put_progress(&p).unwrap();
        }

        let recent = store.recently_read(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].title_id, "t3");
        assert_eq!(recent[1].title_id, "t2");
    }

    #[test]
    fn test_add_and_list_favorites_most_recent_first() {
        let store = SqliteStore::in_memory().unwrap();
        store.add_favorite(&favorite("t1", "First")).unwrap();
        store.add_favorite(&favorite("t2", "Second")).unwrap();

        let favorites = store.list_favorites();
        assert_eq!(favorites.len(), 2);
        assert_eq!(favorites[0].title_id, "t2");
        assert_eq!(favorites[1].title_id, "t1");
    }

    #[test]
    fn test_refavoriting_replaces_snapshot() {
        let store = SqliteStore::in_memory().unwrap();
        store.add_favorite(&favorite("t1", "Old Name")).unwrap();
        store.add_favorite(&favorite("t2", "Other")).unwrap();
        store.add_favorite(&favorite("t1", "New Name")).unwrap();

        let favorites = store.list_favorites();
        assert_eq!(favorites.len(), 2);
        // Re-adding moves the entry back to the front with the new snapshot.
        assert_eq!(favorites[0].title_id, "t1");
        assert_eq!(favorites[0].name, "New Name");
    }

    #[test]
    fn test_remove_favorite_idempotent() {
        let store = SqliteStore::in_memory().unwrap();
        store.add_favorite(&favorite("t1", "Name")).unwrap();

        store.remove_favorite("t1").unwrap();
        assert!(!store.is_favorite("t1"));

        // Removing a non-member is a no-op.
        store.remove_favorite("t1").unwrap();
        store.remove_favorite("never-added").unwrap();
        assert!(store.list_favorites().is_empty());
    }

    #[test]
    fn test_is_favorite() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(!store.is_favorite("t1"));
        store.add_favorite(&favorite("t1", "Name")).unwrap();
        assert!(store.is_favorite("t1"));
    }

    #[test]
    fn test_corrupt_blob_degrades_to_empty_on_read() {
        let store = SqliteStore::in_memory().unwrap();
        store.put_progress(&progress("t1", "c1", 3)).unwrap();

        {
            let conn = store.lock_conn().unwrap();
            conn.execute(
                "UPDATE kv_blobs SET value = 'not json' WHERE key = ?1",
                params![PROGRESS_KEY],
            )
            .unwrap();
        }

        assert!(store.get_progress("t1").is_none());
        assert!(store.recently_read(10).is_empty());
    }

    #[test]
    fn test_corrupt_blob_is_replaced_on_write() {
        let store = SqliteStore::in_memory().unwrap();

        {
            let conn = store.lock_conn().unwrap();
            conn.execute(
                "INSERT INTO kv_blobs (key, value, updated_at) VALUES (?1, 'not json', ?2)",
                params![PROGRESS_KEY, Utc::now().to_rfc3339()],
            )
            .unwrap();
        }

        store.put_progress(&progress("t1", "c1", 0)).unwrap();
        assert_eq!(store.get_progress("t1").unwrap().chapter_id, "c1");
    }

    #[test]
    fn test_reopen_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("yomu.db");

        {
            let store = SqliteStore::new(&db_path).unwrap();
            store.put_progress(&progress("t1", "c1", 5)).unwrap();
            store.add_favorite(&favorite("t1", "Name")).unwrap();
        }

        let store = SqliteStore::new(&db_path).unwrap();
        assert_eq!(store.get_progress("t1").unwrap().page_index, 5);
        assert!(store.is_favorite("t1"));
    }
}
