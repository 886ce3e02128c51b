use crate::app::{AppContext, Result};
use crate::domain::{FavoriteEntry, ReadingDirection, Title};
use crate::reader::ReaderSession;

pub async fn search(ctx: &AppContext, query: &str, limit: u32) -> Result<()> {
    let titles = ctx.catalog.search_titles(query, limit).await?;
    print_titles(&titles);
    Ok(())
}

pub async fn popular(ctx: &AppContext, limit: u32) -> Result<()> {
    let titles = ctx.catalog.popular_titles(limit).await?;
    print_titles(&titles);
    Ok(())
}

fn print_titles(titles: &[Title]) {
    if titles.is_empty() {
        println!("No titles found");
        return;
    }

    for title in titles {
        let year = title
            .year
            .map(|y| format!(" ({})", y))
            .unwrap_or_default();
        let status = title.status.as_deref().unwrap_or("unknown");
        println!("{}{} [{}]\n  {}", title.display_name(), year, status, title.id);
    }
}

pub async fn chapters(ctx: &AppContext, title_id: &str) -> Result<()> {
    let chapters = ctx.catalog.get_chapter_list(title_id).await?;

    if chapters.is_empty() {
        println!("No chapters found");
        return Ok(());
    }

    for chapter in chapters {
        let date = chapter
            .published_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "          ".to_string());
        println!(
            "{} {} ({} pages)\n  {}",
            date,
            chapter.display_name(),
            chapter.pages,
            chapter.id
        );
    }

    Ok(())
}

pub fn favorites(ctx: &AppContext) -> Result<()> {
    let favorites = ctx.store.list_favorites();

    if favorites.is_empty() {
        println!("No favorites");
        return Ok(());
    }

    for entry in favorites {
        println!(
            "{} (added {})\n  {}",
            entry.name,
            entry.added_at.format("%Y-%m-%d"),
            entry.title_id
        );
    }

    Ok(())
}

pub async fn favorite(ctx: &AppContext, title_id: &str) -> Result<()> {
    let title = ctx.catalog.get_title(title_id).await?;
    ctx.store.add_favorite(&FavoriteEntry::snapshot(&title))?;
    println!("Added favorite: {}", title.display_name());
    Ok(())
}

pub fn unfavorite(ctx: &AppContext, title_id: &str) -> Result<()> {
    ctx.store.remove_favorite(title_id)?;
    println!("Removed favorite: {}", title_id);
    Ok(())
}

pub fn recent(ctx: &AppContext, limit: usize) -> Result<()> {
    let entries = ctx.store.recently_read(limit);

    if entries.is_empty() {
        println!("Nothing read yet");
        return Ok(());
    }

    for progress in entries {
        println!(
            "{} chapter {} page {} ({})\n  {}",
            progress.last_read_at.format("%Y-%m-%d %H:%M"),
            progress.chapter_label,
            progress.page_index + 1,
            progress.direction,
            progress.title_id
        );
    }

    Ok(())
}

pub async fn read(
    ctx: &AppContext,
    chapter_id: &str,
    page: Option<usize>,
    rtl: bool,
    next: bool,
    open_page: bool,
) -> Result<()> {
    let preferred = if rtl {
        ReadingDirection::Rtl
    } else {
        ctx.config.reader.default_direction
    };

    let mut session = ReaderSession::open(
        ctx.catalog.clone(),
        ctx.store.clone(),
        chapter_id,
        Some(preferred),
    )
    .await?;

    if let Some(page) = page {
        session.advance_to(page);
    }

    print_session(&session);

    if open_page {
        open::that(session.current_page())?;
    }

    if session.is_at_boundary() {
        match session.resolve_next_chapter().await? {
            Some(next_chapter) => {
                println!("Next: {}\n  {}", next_chapter.display_name(), next_chapter.id);
                if next {
                    session.advance_to_next_chapter().await?;
                    println!();
                    print_session(&session);
                }
            }
            None => println!("No next chapter"),
        }
    }

    // Background checkpoints may still be in flight; make sure the final
    // position is on disk before the process exits.
    session.flush()?;

    Ok(())
}

fn print_session(session: &ReaderSession) {
    println!("{}", session.title().display_name());
    println!(
        "{} ({} pages, {})",
        session.chapter().display_name(),
        session.pages().len(),
        session.direction()
    );
    println!(
        "Page {}/{}: {}",
        session.current_index() + 1,
        session.pages().len(),
        session.current_page()
    );
}
