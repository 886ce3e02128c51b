pub mod sqlite;

use crate::app::Result;
use crate::domain::{FavoriteEntry, ReadingProgress};

pub use sqlite::SqliteStore;

/// Local persistence for favorites and per-title reading progress.
///
/// Read operations never fail: storage errors degrade to the empty value so
/// callers don't special-case them. Write operations report failures; a
/// failed write leaves the previously stored value intact.
pub trait ProgressStore: Send + Sync {
    // Reading progress
    fn get_progress(&self, title_id: &str) -> Option<ReadingProgress>;
    /// Overwrites any existing entry for the same title. The whole record is
    /// written at once, so page index and direction are never persisted
    /// separately.
    fn put_progress(&self, progress: &ReadingProgress) -> Result<()>;
    /// Progress entries sorted by `last_read_at`, most recent first.
    fn recently_read(&self, limit: usize) -> Vec<ReadingProgress>;

    // Favorites
    /// Most-recently-added first.
    fn list_favorites(&self) -> Vec<FavoriteEntry>;
    fn is_favorite(&self, title_id: &str) -> bool;
    /// Re-adding an already-favorited title replaces its snapshot and
    /// refreshes `added_at`.
    fn add_favorite(&self, entry: &FavoriteEntry) -> Result<()>;
    /// Removing a non-member is a no-op.
    fn remove_favorite(&self, title_id: &str) -> Result<()>;
}
