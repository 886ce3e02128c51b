use thiserror::Error;

#[derive(Error, Debug)]
pub enum YomuError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Chapter {0} has no owning title relationship")]
    MissingRelationship(String),

    #[error("Chapter unavailable: {0}")]
    ChapterUnavailable(String),

    #[error("Title not found: {0}")]
    TitleNotFound(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, YomuError>;
