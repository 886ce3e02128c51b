use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Title {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub status: Option<String>,
    pub year: Option<i32>,
}

impl Title {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            description: None,
            cover_url: None,
            status: None,
            year: None,
        }
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "(Untitled)"
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_with_name() {
        let title = Title::new("abc".into(), "One Piece".into());
        assert_eq!(title.display_name(), "One Piece");
    }

    #[test]
    fn test_display_name_empty() {
        let title = Title::new("abc".into(), String::new());
        assert_eq!(title.display_name(), "(Untitled)");
    }
}
