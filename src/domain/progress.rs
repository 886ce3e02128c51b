use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Title;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingDirection {
    #[default]
    Ltr,
    Rtl,
}

impl ReadingDirection {
    pub fn flipped(self) -> Self {
        match self {
            ReadingDirection::Ltr => ReadingDirection::Rtl,
            ReadingDirection::Rtl => ReadingDirection::Ltr,
        }
    }
}

impl fmt::Display for ReadingDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadingDirection::Ltr => write!(f, "ltr"),
            ReadingDirection::Rtl => write!(f, "rtl"),
        }
    }
}

/// Last known reading position for one title. At most one entry per title;
/// every checkpoint overwrites the whole record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingProgress {
    pub title_id: String,
    pub chapter_id: String,
    /// Index into the page list in its visual order at the time of the save.
    /// May be stale if the chapter was re-paginated; clamped on load.
    pub page_index: usize,
    pub chapter_label: String,
    pub last_read_at: DateTime<Utc>,
    pub direction: ReadingDirection,
}

/// A favorited title with a denormalized metadata snapshot captured at
/// favorite time. Never re-fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub title_id: String,
    pub name: String,
    pub cover_url: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl FavoriteEntry {
    pub fn snapshot(title: &Title) -> Self {
        Self {
            title_id: title.id.clone(),
            name: title.name.clone(),
            cover_url: title.cover_url.clone(),
            added_at: Utc::now(),
        }
    }
}
