pub mod auth;
pub mod http_client;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{Chapter, Title};

pub use auth::AuthSession;
pub use http_client::HttpCatalog;

/// Read-only view of the manga catalog API.
///
/// Network resilience (retries, backoff) is the implementation's business;
/// callers see plain results and degrade where the contract says so.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn search_titles(&self, query: &str, limit: u32) -> Result<Vec<Title>>;
    async fn popular_titles(&self, limit: u32) -> Result<Vec<Title>>;
    async fn get_title(&self, title_id: &str) -> Result<Title>;
    async fn get_chapter(&self, chapter_id: &str) -> Result<Chapter>;
    /// Ordered page image URLs for a chapter.
    async fn get_chapter_pages(&self, chapter_id: &str) -> Result<Vec<String>>;
    /// All of a title's chapters, ascending by chapter number.
    async fn get_chapter_list(&self, title_id: &str) -> Result<Vec<Chapter>>;
}
