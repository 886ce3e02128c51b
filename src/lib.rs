//! # Yomu
//!
//! A manga catalog reading client with local reading progress.
//!
//! ## Architecture
//!
//! ```text
//! CatalogClient → ReaderSession → ProgressStore
//! ```
//!
//! - [`catalog`]: async client for the catalog REST API
//! - [`reader`]: the per-chapter reading session state machine
//! - [`store`]: SQLite persistence for favorites and reading progress
//!
//! A [`ReaderSession`](reader::ReaderSession) is opened per chapter: it pulls
//! chapter metadata and page URLs from the catalog, resumes from stored
//! progress, and checkpoints every page or direction change back to the
//! store in the background.
//!
//! ## Quick Start
//!
//! ```bash
//! # Find a title
//! yomu search "one piece"
//!
//! # List its chapters
//! yomu chapters <title-id>
//!
//! # Read a chapter, resuming where you left off
//! yomu read <chapter-id>
//!
//! # Favorites and history
//! yomu favorite <title-id>
//! yomu recent
//! ```
//!
//! ## Modules
//!
//! - [`app`]: Application context and error types
//! - [`catalog`]: Catalog API trait, HTTP implementation, bearer auth
//! - [`cli`]: Command-line interface definitions
//! - [`config`]: TOML configuration
//! - [`domain`]: Core domain models (Title, Chapter, ReadingProgress)
//! - [`reader`]: Reading session state machine
//! - [`store`]: Local persistence

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the catalog
/// client and the store.
pub mod app;

/// Catalog API access.
///
/// - [`CatalogClient`](catalog::CatalogClient): async trait over the REST API
/// - [`HttpCatalog`](catalog::HttpCatalog): reqwest-based implementation
/// - [`AuthSession`](catalog::AuthSession): bearer credentials, passed
///   explicitly instead of living in a global
pub mod catalog;

/// Command-line interface using clap.
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/yomu/config.toml`: API base URLs, preferred
/// language, default reading direction.
pub mod config;

/// Core domain models.
///
/// - [`Title`](domain::Title): a manga series
/// - [`Chapter`](domain::Chapter): an episode within a title
/// - [`ReadingProgress`](domain::ReadingProgress): last known position per title
/// - [`FavoriteEntry`](domain::FavoriteEntry): favorited title snapshot
pub mod domain;

/// The reading session state machine.
///
/// Page index tracking, reading-direction reversal, resume-from-progress,
/// chapter boundary detection, and background progress checkpoints.
pub mod reader;

/// SQLite persistence layer.
///
/// - [`ProgressStore`](store::ProgressStore): trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): whole-blob JSON records in SQLite
pub mod store;
