//! CLI administration tool for offer-click-tracker.
//!
//! Inspects click totals, repairs counter drift, and performs database
//! diagnostics without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Totals for every offer
//! cargo run --bin admin -- stats
//!
//! # Totals for one landing page
//! cargo run --bin admin -- stats --page landing-a
//!
//! # Rebuild counters from the click ledger
//! cargo run --bin admin -- reconcile
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server, see [`offer_click_tracker::config`]. Only the database
//! settings are used.

use offer_click_tracker::application::services::{StatsService, TrackingService};
use offer_click_tracker::config;
use offer_click_tracker::domain::entities::ClickCounter;
use offer_click_tracker::infrastructure::database;
use offer_click_tracker::infrastructure::persistence::PgClickRepository;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing offer-click-tracker.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Show click totals
    Stats {
        /// Only show offers on this landing page
        #[arg(short, long)]
        page: Option<String>,
    },

    /// Rebuild counters from click logs and report drift
    Reconcile {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let pool = database::connect(&config).await?;
    let repository = Arc::new(PgClickRepository::new(Arc::new(pool.clone())));

    match cli.command {
        Commands::Stats { page } => {
            handle_stats(StatsService::new(repository), page.as_deref()).await?
        }
        Commands::Reconcile { yes } => {
            let service = TrackingService::new(repository, Arc::new(config.geo_policy));
            handle_reconcile(service, yes).await?
        }
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Prints counters, for one page or for all of them.
async fn handle_stats(service: StatsService<PgClickRepository>, page: Option<&str>) -> Result<()> {
    println!("{}", "📊 Click Totals".bright_blue().bold());
    println!();

    let counters = match page {
        Some(page) => service.page_stats(page).await?,
        None => service.all_stats().await?,
    };

    if counters.is_empty() {
        println!("{}", "  No clicks recorded yet".bright_black());
        println!();
        return Ok(());
    }

    println!(
        "  {:<24} {:<24} {:>8}  {:<16} {}",
        "PAGE".bold(),
        "TAG".bold(),
        "COUNT".bold(),
        "COUNTRY".bold(),
        "LAST CLICK".bold()
    );
    for counter in &counters {
        print_counter(counter);
    }

    let total: i64 = counters.iter().map(|c| c.count).sum();
    println!();
    println!(
        "  Offers: {}  Clicks: {}",
        counters.len().to_string().bright_white().bold(),
        total.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

fn print_counter(counter: &ClickCounter) {
    println!(
        "  {:<24} {:<24} {:>8}  {:<16} {}",
        counter.page.cyan(),
        counter.tag,
        counter.count.to_string().bright_green(),
        counter.country,
        counter
            .last_click_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
}

/// Rebuilds every counter from the click ledger.
///
/// Requires confirmation unless `--yes` is given. Counters are locked against
/// concurrent claims for the duration of the rebuild.
async fn handle_reconcile(service: TrackingService<PgClickRepository>, skip_confirm: bool) -> Result<()> {
    println!("{}", "🛠  Reconcile Counters".bright_blue().bold());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Rebuild all counters from click logs? Claims wait while this runs")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let drifts = service.reconcile_counters().await?;

    if drifts.is_empty() {
        println!("{}", "✅ All counters match the click logs".green().bold());
        println!();
        return Ok(());
    }

    for drift in &drifts {
        let delta = drift.delta();
        let delta = if delta > 0 {
            format!("+{}", delta).yellow()
        } else {
            delta.to_string().red()
        };

        println!(
            "  {:<24} {:<24} {:>8} -> {:<8} ({})",
            drift.page.cyan(),
            drift.tag,
            drift.recorded,
            drift.actual.to_string().bright_green(),
            delta
        );
    }

    println!();
    println!(
        "{}",
        format!("✅ Repaired {} counter(s)", drifts.len())
            .green()
            .bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let logs_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM click_logs")
                .fetch_one(pool)
                .await?;

            let counters_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM click_counters")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!(
                "  Click logs: {}",
                logs_count.to_string().bright_green().bold()
            );
            println!(
                "  Counters:   {}",
                counters_count.to_string().bright_green().bold()
            );
            println!();
        }
    }

    Ok(())
}
