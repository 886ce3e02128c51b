pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "yomu")]
#[command(about = "A manga catalog reading client", long_about = None)]
pub struct Cli {
    /// Bearer token for the catalog API
    #[arg(long, global = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search the catalog for titles
    Search {
        query: String,
        /// Maximum number of results
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },
    /// List popular titles
    Popular {
        /// Maximum number of results
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },
    /// List a title's chapters
    Chapters {
        /// Title id
        title_id: String,
    },
    /// List favorite titles
    Favorites,
    /// Add a title to favorites
    Favorite {
        /// Title id
        title_id: String,
    },
    /// Remove a title from favorites
    Unfavorite {
        /// Title id
        title_id: String,
    },
    /// Show recently read titles
    Recent {
        /// Maximum number of entries
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Open a chapter, resuming from stored progress
    Read {
        /// Chapter id
        chapter_id: String,
        /// Jump to this page (0-based) instead of the stored position
        #[arg(short, long)]
        page: Option<usize>,
        /// Read right-to-left
        #[arg(long)]
        rtl: bool,
        /// Advance to the next chapter when on the last page
        #[arg(long)]
        next: bool,
        /// Open the current page image in the browser
        #[arg(long)]
        open: bool,
    },
}
