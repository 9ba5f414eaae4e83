//! MAL Scraper CLI application.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mal_scraper::MalScraper;
use shared::{AnimeRecord, Config};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Clear cache before running
    #[arg(long)]
    clear_cache: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show an anime record, optionally with a user's progress
    Anime {
        /// MyAnimeList id or detail page URL
        target: String,

        /// Username whose list is cross-referenced
        #[arg(short, long)]
        user: Option<String>,

        /// Also load the user's progress on related anime
        #[arg(long, requires = "user")]
        related: bool,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show every entry of a user's list
    UserList {
        username: String,
    },

    /// Show cache statistics
    CacheStats,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.verbose {
        config.logging.default_level = "debug".to_string();
    }

    shared::logging::init(shared::LogConfig::from_config(&config, "mal-scraper")?)?;

    info!("MAL Scraper starting");
    info!(config_file = %args.config.display(), "Loaded configuration");

    let mut scraper = MalScraper::from_config(&config).context("Failed to initialize scraper")?;

    if args.clear_cache {
        info!("Clearing cache");
        scraper.cache_mut().clear().context("Failed to clear cache")?;
    }

    match args.command {
        Command::Anime {
            target,
            user,
            related,
            json,
        } => {
            let anime = load_anime(&mut scraper, &target)?;

            match user {
                Some(username) => {
                    let record = scraper
                        .with_user_progress(anime.clone(), &username)
                        .with_context(|| format!("Failed to load list of {}", username))?;

                    if json {
                        println!("{}", serde_json::to_string_pretty(&record)?);
                    } else {
                        info!(
                            mal_id = record.anime.mal_id,
                            name = %record.name(),
                            watch_state = %record.watch_state,
                            episodes_watched = record.episodes_watched,
                            tags = ?record.tags,
                            start_date = ?record.start_date.map(|d| d.to_string()),
                            finish_date = ?record.finish_date.map(|d| d.to_string()),
                            "User progress"
                        );
                    }

                    if related {
                        for (mal_id, result) in scraper.related_user_anime(&anime, &username) {
                            match result {
                                Ok(related) => info!(
                                    mal_id,
                                    name = %related.name(),
                                    watch_state = %related.watch_state,
                                    airing_state = %related.anime.airing_state,
                                    "Related anime"
                                ),
                                Err(e) => error!(mal_id, error = %e, "Failed to load related anime"),
                            }
                        }
                    }
                }
                None if json => println!("{}", serde_json::to_string_pretty(&anime)?),
                None => info!(
                    mal_id = anime.mal_id,
                    name = %anime.name,
                    airing_state = %anime.airing_state,
                    episodes = ?anime.episodes,
                    related_anime = ?anime.related_anime,
                    related_manga = ?anime.related_manga,
                    "Anime"
                ),
            }
        }

        Command::UserList { username } => {
            let items = scraper
                .user_list(&username)
                .with_context(|| format!("Failed to load list of {}", username))?;

            let mut failed = 0;
            for (title, item) in &items {
                match item {
                    Ok(item) => info!(
                        mal_id = ?item.mal_id,
                        title = %item.title,
                        watch_state = %item.progress.watch_state,
                        episodes_watched = item.progress.episodes_watched,
                        "List entry"
                    ),
                    Err(e) => {
                        failed += 1;
                        error!(title = %title, error = %e, "Failed to parse list entry");
                    }
                }
            }
            info!(
                username = %username,
                entries = items.len(),
                failed,
                "User list loaded"
            );
        }

        Command::CacheStats => {
            let stats = scraper.cache().stats().context("Failed to get cache stats")?;
            info!("=== Cache Statistics ===");
            info!("Anime pages: {}", stats.anime_files);
            info!("Manga pages: {}", stats.manga_files);
            info!("User lists: {}", stats.user_files);
            info!("Total size: {} KB", stats.total_size_bytes / 1000);
            info!("Flush time: {}s", scraper.cache().flush_time().as_secs());
        }
    }

    info!("MAL Scraper finished successfully");

    Ok(())
}

fn load_anime(scraper: &mut MalScraper, target: &str) -> Result<AnimeRecord> {
    let record = match target.parse::<u32>() {
        Ok(mal_id) => scraper.anime(mal_id),
        Err(_) => scraper.anime_from_url(target),
    };

    record.with_context(|| format!("Failed to load anime {}", target))
}
