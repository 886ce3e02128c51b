use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use yomu::app::AppContext;
use yomu::catalog::AuthSession;
use yomu::cli::{commands, Cli, Commands};
use yomu::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let auth = cli.token.clone().map(AuthSession::new);
    let ctx = AppContext::new(config, auth, None)?;

    match cli.command {
        Commands::Search { query, limit } => {
            commands::search(&ctx, &query, limit).await?;
        }
        Commands::Popular { limit } => {
            commands::popular(&ctx, limit).await?;
        }
        Commands::Chapters { title_id } => {
            commands::chapters(&ctx, &title_id).await?;
        }
        Commands::Favorites => {
            commands::favorites(&ctx)?;
        }
        Commands::Favorite { title_id } => {
            commands::favorite(&ctx, &title_id).await?;
        }
        Commands::Unfavorite { title_id } => {
            commands::unfavorite(&ctx, &title_id)?;
        }
        Commands::Recent { limit } => {
            commands::recent(&ctx, limit)?;
        }
        Commands::Read {
            chapter_id,
            page,
            rtl,
            next,
            open,
        } => {
            commands::read(&ctx, &chapter_id, page, rtl, next, open).await?;
        }
    }

    Ok(())
}
