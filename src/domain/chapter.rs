use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub id: String,
    /// Owning title id, taken from the chapter's `manga` relationship.
    /// Absent when the catalog returned malformed chapter data.
    pub title_id: Option<String>,
    pub volume: Option<String>,
    /// Human-readable chapter number, e.g. "12" or "12.5".
    pub number: Option<String>,
    pub name: Option<String>,
    pub pages: u32,
    pub translated_language: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl Chapter {
    /// Chapter label used for progress checkpoints; "0" when unnumbered.
    pub fn label(&self) -> &str {
        self.number.as_deref().unwrap_or("0")
    }

    pub fn display_name(&self) -> String {
        match (self.number.as_deref(), self.name.as_deref()) {
            (Some(number), Some(name)) => format!("Chapter {}: {}", number, name),
            (Some(number), None) => format!("Chapter {}", number),
            (None, Some(name)) => name.to_string(),
            (None, None) => "Oneshot".to_string(),
        }
    }
}
