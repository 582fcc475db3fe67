//! CLI administration tool for click-tracker.
//!
//! Manages links, prints click reports and performs database operations
//! directly against the database, without going through the HTTP admin
//! surface.
//!
//! # Usage
//!
//! ```bash
//! # Create or update a link
//! cargo run --bin admin -- link add promo https://example.com/spring -d "Spring sale"
//!
//! # List links
//! cargo run --bin admin -- link list
//!
//! # Remove a link (clicks are kept)
//! cargo run --bin admin -- link remove promo
//!
//! # Per-link click totals and recent clicks
//! cargo run --bin admin -- stats
//! cargo run --bin admin -- stats --slug promo
//! cargo run --bin admin -- recent --limit 20
//!
//! # Database tools
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (default `sqlite://clicks.db`): SQLite connection string

use click_tracker::application::services::{ClickService, LinkService};
use click_tracker::domain::repositories::{ClickRepository, LinkRepository};
use click_tracker::infrastructure::persistence::{
    PoolSettings, SqliteClickRepository, SqliteLinkRepository, connect, run_migrations,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;

/// CLI tool for managing click-tracker.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL (overrides `DATABASE_URL`)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show click totals per link
    Stats {
        /// Only show the count for this slug
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Show the most recent clicks
    Recent {
        /// Number of clicks to show (1-1000)
        #[arg(short, long, default_value_t = 20)]
        limit: i64,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Create a link or replace its destination
    Add {
        slug: String,

        /// Absolute http(s) URL
        destination: String,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// List all links
    List,

    /// Remove a link; its clicks are kept
    Remove {
        slug: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,
}

/// Services over one pool, mirroring the server wiring.
struct Services {
    links: LinkService<dyn LinkRepository>,
    clicks: ClickService<dyn ClickRepository>,
}

impl Services {
    fn new(pool: &SqlitePool) -> Self {
        let pool = Arc::new(pool.clone());
        let link_repository: Arc<dyn LinkRepository> =
            Arc::new(SqliteLinkRepository::new(pool.clone()));
        let click_repository: Arc<dyn ClickRepository> =
            Arc::new(SqliteClickRepository::new(pool));

        Self {
            links: LinkService::new(link_repository),
            clicks: ClickService::new(click_repository, Duration::from_secs(5)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = cli
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite://clicks.db".to_string());

    let pool = connect(&database_url, &PoolSettings::default())
        .await
        .context("Failed to connect to database")?;

    let result = match cli.command {
        Commands::Db { action } => handle_db_action(action, &pool, &database_url).await,
        command => {
            run_migrations(&pool)
                .await
                .context("Failed to apply migrations")?;
            let services = Services::new(&pool);

            match command {
                Commands::Link { action } => handle_link_action(action, &services).await,
                Commands::Stats { slug } => handle_stats(&services, slug).await,
                Commands::Recent { limit } => handle_recent(&services, limit).await,
                Commands::Db { .. } => Ok(()),
            }
        }
    };

    pool.close().await;
    result
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, services: &Services) -> Result<()> {
    match action {
        LinkAction::Add {
            slug,
            destination,
            description,
        } => add_link(services, slug, destination, description).await,
        LinkAction::List => list_links(services).await,
        LinkAction::Remove { slug, yes } => remove_link(services, slug, yes).await,
    }
}

async fn add_link(
    services: &Services,
    slug: String,
    destination: String,
    description: Option<String>,
) -> Result<()> {
    let link = services
        .links
        .upsert(&slug, &destination, description.as_deref())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to save link: {}", e))?;

    let verb = if link.was_updated() {
        "Updated"
    } else {
        "Added"
    };

    println!(
        "{} {} {} {}",
        format!("✅ {}", verb).green().bold(),
        link.slug.cyan(),
        "->".bright_black(),
        link.destination.bright_white()
    );

    Ok(())
}

/// Lists all links.
///
/// # Output Format
///
/// ```text
/// 🔗 Links
///
///   Slug                 Destination                                   Updated
///   ───────────────────────────────────────────────────────────────────────────
///   promo                https://example.com/spring                    2025-01-15 10:30
/// ```
async fn list_links(services: &Services) -> Result<()> {
    println!("{}", "🔗 Links".bright_blue().bold());
    println!();

    let links = services
        .links
        .list_all()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        println!();
        println!(
            "  Create one with: {} admin link add <slug> <url>",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<20} {:<45} {:<16}",
        "Slug".bright_white().bold(),
        "Destination".bright_white().bold(),
        "Updated".bright_white().bold()
    );
    println!("  {}", "─".repeat(83).bright_black());

    for link in &links {
        println!(
            "  {:<20} {:<45} {}",
            link.slug.cyan(),
            link.destination,
            link.updated_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
        if let Some(description) = &link.description {
            println!("  {:<20} {}", "", description.bright_black());
        }
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Removes a link with confirmation prompt (default: No).
async fn remove_link(services: &Services, slug: String, skip_confirm: bool) -> Result<()> {
    let link = services
        .links
        .resolve(&slug)
        .await
        .map_err(|e| anyhow::anyhow!("{}: {}", slug, e))?;

    println!("  Slug:        {}", link.slug.cyan());
    println!("  Destination: {}", link.destination);
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Remove this link? Recorded clicks are kept.")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    services
        .links
        .remove(&slug)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to remove link: {}", e))?;

    println!("{}", "✅ Link removed".green().bold());

    Ok(())
}

/// Displays click totals for every link, busiest first, or the count for a
/// single slug.
async fn handle_stats(services: &Services, slug: Option<String>) -> Result<()> {
    if let Some(slug) = slug {
        return handle_slug_stats(services, &slug).await;
    }

    println!("{}", "📊 Click totals".bright_blue().bold());
    println!();

    let totals = services
        .clicks
        .totals()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load totals: {}", e))?;
    let total_clicks = services
        .clicks
        .count_all()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count clicks: {}", e))?;

    println!(
        "  {:<20} {:>8}  {}",
        "Slug".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Destination".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for row in &totals {
        println!(
            "  {:<20} {:>8}  {}",
            row.slug.cyan(),
            row.clicks.to_string().bright_white(),
            row.destination.bright_black()
        );
    }

    println!();
    println!("  Links:        {}", totals.len().to_string().bright_white().bold());
    println!("  Total clicks: {}", total_clicks.to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn handle_slug_stats(services: &Services, slug: &str) -> Result<()> {
    let counts = services
        .clicks
        .counts_by_slug()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load counts: {}", e))?;

    match counts.get(slug) {
        Some(clicks) => {
            println!(
                "  {} {}",
                slug.cyan(),
                format!("{} clicks", clicks).bright_white().bold()
            );
            Ok(())
        }
        None => anyhow::bail!("Link '{}' is not registered", slug),
    }
}

/// Displays the most recent clicks, newest first.
async fn handle_recent(services: &Services, limit: i64) -> Result<()> {
    println!("{}", "🕒 Recent clicks".bright_blue().bold());
    println!();

    let clicks = services
        .clicks
        .recent(limit)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load recent clicks: {}", e))?;

    if clicks.is_empty() {
        println!("{}", "  No clicks recorded yet".yellow());
        return Ok(());
    }

    for click in &clicks {
        println!(
            "  {:>6}  {}  {:<20} {:<16} {}",
            click.id.to_string().bright_black(),
            click.clicked_at.format("%Y-%m-%d %H:%M:%S"),
            click.slug.cyan(),
            click.ip.as_deref().unwrap_or("-"),
            click.campaign.as_deref().unwrap_or("-").bright_black()
        );
    }
    println!();

    Ok(())
}

/// Dispatches database operations.
async fn handle_db_action(action: DbAction, pool: &SqlitePool, database_url: &str) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            let version: String = sqlx::query_scalar("SELECT sqlite_version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  URL:     {}", database_url.bright_black());
            println!("  SQLite:  {}", version.bright_black());
        }
        DbAction::Migrate => {
            println!("{}", "🛠  Applying migrations...".bright_blue());

            run_migrations(pool)
                .await
                .context("Failed to apply migrations")?;

            println!("{}", "✅ Database is up to date".green().bold());
        }
    }

    Ok(())
}
