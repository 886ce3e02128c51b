use std::sync::Arc;

use chrono::Utc;

use crate::app::{Result, YomuError};
use crate::catalog::CatalogClient;
use crate::domain::{Chapter, FavoriteEntry, ReadingDirection, ReadingProgress, Title};
use crate::store::ProgressStore;

/// One in-flight reading session for a single chapter.
///
/// `pages` is kept in current visual order: under RTL the list is reversed in
/// place, so index 0 is always the first page a left-to-right swipe would
/// show. Every index or direction change fires a background checkpoint write;
/// rapid writes coalesce to whichever completes last.
pub struct ReaderSession {
    catalog: Arc<dyn CatalogClient>,
    store: Arc<dyn ProgressStore>,
    title: Title,
    chapter: Chapter,
    pages: Vec<String>,
    current_index: usize,
    direction: ReadingDirection,
    favorite: bool,
    next_chapter: Option<Chapter>,
    next_resolved: bool,
}

impl ReaderSession {
    /// Open a session for `chapter_id`.
    ///
    /// `preferred_direction` applies when no progress is stored for this exact
    /// chapter; stored progress wins. Fails with
    /// [`YomuError::MissingRelationship`] when the chapter has no owning
    /// title, and [`YomuError::ChapterUnavailable`] when no pages could be
    /// fetched.
    pub async fn open(
        catalog: Arc<dyn CatalogClient>,
        store: Arc<dyn ProgressStore>,
        chapter_id: &str,
        preferred_direction: Option<ReadingDirection>,
    ) -> Result<Self> {
        let chapter = catalog.get_chapter(chapter_id).await?;
        let title_id = chapter
            .title_id
            .clone()
            .ok_or_else(|| YomuError::MissingRelationship(chapter.id.clone()))?;

        // Title metadata and stored progress are independent fetches, but
        // both must land before the initial index is computed.
        let title_fut = catalog.get_title(&title_id);
        let progress_store = store.clone();
        let progress_title = title_id.clone();
        let progress_fut =
            tokio::task::spawn_blocking(move || progress_store.get_progress(&progress_title));
        let (title, progress) = futures::future::join(title_fut, progress_fut).await;

        let title = title?;
        let progress = progress.unwrap_or_else(|e| {
            tracing::warn!("Progress lookup for {} failed: {}", title_id, e);
            None
        });

        let same_chapter = progress.filter(|p| p.chapter_id == chapter.id);

        let direction = same_chapter
            .as_ref()
            .map(|p| p.direction)
            .or(preferred_direction)
            .unwrap_or_default();

        let mut pages = match catalog.get_chapter_pages(chapter_id).await {
            Ok(pages) => pages,
            Err(e) => {
                tracing::warn!("Page list fetch for {} failed: {}", chapter_id, e);
                Vec::new()
            }
        };
        if pages.is_empty() {
            return Err(YomuError::ChapterUnavailable(chapter.id));
        }
        if direction == ReadingDirection::Rtl {
            pages.reverse();
        }

        // Resume within the same chapter, clamping a stale index; otherwise
        // start on the first page in the current visual direction.
        let current_index = match same_chapter {
            Some(p) => p.page_index.min(pages.len() - 1),
            None => match direction {
                ReadingDirection::Ltr => 0,
                ReadingDirection::Rtl => pages.len() - 1,
            },
        };

        let favorite = store.is_favorite(&title_id);

        Ok(Self {
            catalog,
            store,
            title,
            chapter,
            pages,
            current_index,
            direction,
            favorite,
            next_chapter: None,
            next_resolved: false,
        })
    }

    pub fn title(&self) -> &Title {
        &self.title
    }

    pub fn chapter(&self) -> &Chapter {
        &self.chapter
    }

    /// Page URLs in current visual order.
    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_page(&self) -> &str {
        &self.pages[self.current_index]
    }

    pub fn direction(&self) -> ReadingDirection {
        self.direction
    }

    pub fn is_favorite(&self) -> bool {
        self.favorite
    }

    /// Move to `index`, clamped into the page range. Repeated calls with the
    /// same index still rewrite the checkpoint timestamp.
    pub fn advance_to(&mut self, index: usize) {
        self.current_index = index.min(self.pages.len() - 1);
        self.checkpoint();
    }

    /// Flip the reading direction, reversing the page order and mirroring the
    /// index across the reversal so the visible page does not change.
    pub fn toggle_direction(&mut self) {
        self.direction = self.direction.flipped();
        self.pages.reverse();
        self.current_index = self.pages.len() - 1 - self.current_index;
        self.checkpoint();
    }

    /// Toggle the favorite status of the session's title.
    ///
    /// The in-memory flag flips optimistically; a failed write rolls it back
    /// and returns the error. Returns the new status.
    pub fn toggle_favorite(&mut self) -> Result<bool> {
        let was_favorite = self.favorite;
        self.favorite = !was_favorite;

        let result = if was_favorite {
            self.store.remove_favorite(&self.title.id)
        } else {
            self.store.add_favorite(&FavoriteEntry::snapshot(&self.title))
        };

        if let Err(e) = result {
            self.favorite = was_favorite;
            return Err(e);
        }
        Ok(self.favorite)
    }

    /// True on the last visually-displayed page of the chapter. Does not
    /// imply a next chapter exists.
    pub fn is_at_boundary(&self) -> bool {
        match self.direction {
            ReadingDirection::Ltr => self.current_index == self.pages.len() - 1,
            ReadingDirection::Rtl => self.current_index == 0,
        }
    }

    /// Find the chapter following this one in the title's chapter list.
    ///
    /// The list is fetched at most once per session. A missing successor is a
    /// normal outcome, not an error.
    pub async fn resolve_next_chapter(&mut self) -> Result<Option<&Chapter>> {
        if !self.next_resolved {
            let chapters = self.catalog.get_chapter_list(&self.title.id).await?;
            let position = chapters.iter().position(|c| c.id == self.chapter.id);
            self.next_chapter = position.and_then(|i| chapters.into_iter().nth(i + 1));
            self.next_resolved = true;
        }
        Ok(self.next_chapter.as_ref())
    }

    /// Replace this session with one for the resolved next chapter, carrying
    /// the current direction as the preference. Stored progress for the new
    /// chapter still wins over the carried direction.
    ///
    /// Only valid after [`Self::resolve_next_chapter`] returned a chapter.
    pub async fn advance_to_next_chapter(&mut self) -> Result<()> {
        let next = self
            .next_chapter
            .take()
            .ok_or_else(|| YomuError::Other("No next chapter resolved".into()))?;

        *self = Self::open(
            self.catalog.clone(),
            self.store.clone(),
            &next.id,
            Some(self.direction),
        )
        .await?;
        Ok(())
    }

    /// Synchronously persist the current position.
    ///
    /// Transitions checkpoint in the background; call this before dropping
    /// the session when the write must be on disk, e.g. at process exit.
    pub fn flush(&self) -> Result<()> {
        self.store.put_progress(&self.snapshot_progress())
    }

    fn snapshot_progress(&self) -> ReadingProgress {
        ReadingProgress {
            title_id: self.title.id.clone(),
            chapter_id: self.chapter.id.clone(),
            page_index: self.current_index,
            chapter_label: self.chapter.label().to_string(),
            last_read_at: Utc::now(),
            direction: self.direction,
        }
    }

    /// Fire-and-forget checkpoint write. Failures are logged and never
    /// interrupt reading.
    fn checkpoint(&self) {
        let progress = self.snapshot_progress();
        let store = self.store.clone();
        tokio::spawn(async move {
            if let Err(e) = store.put_progress(&progress) {
                tracing::warn!("Checkpoint for {} failed: {}", progress.title_id, e);
            }
        });
    }
}
