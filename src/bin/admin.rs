//! CLI administration tool for course-landing.
//!
//! Manages rates, the sale flag and the order log directly in PostgreSQL,
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Seed a rate priced at 1500.00 with 30 seats
//! cargo run --bin admin -- rates create 1 --price 150000 --limit 30
//!
//! # List rates with their current status
//! cargo run --bin admin -- rates list
//!
//! # Open or close the sale
//! cargo run --bin admin -- sale toggle
//!
//! # Show the latest orders
//! cargo run --bin admin -- orders list --limit 20
//!
//! # Generate a value for ADMIN_TOKEN
//! cargo run --bin admin -- token generate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_HOST`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`
//!
//! The sale commands always use the PostgreSQL flag; with `FLAG_STORE=redis`
//! toggle through `/enable` instead.

use course_landing::application::services::StatusService;
use course_landing::config::Config;
use course_landing::domain::entities::{Money, Rate, RateStatus};
use course_landing::domain::repositories::{OrderRepository, RateRepository};
use course_landing::infrastructure::persistence::{
    PgOrderRepository, PgRateRepository, PgSaleFlagStore,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing course-landing.
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
    /// Manage rates
    Rates {
        #[command(subcommand)]
        action: RateAction,
    },

    /// Inspect or toggle the global sale flag
    Sale {
        #[command(subcommand)]
        action: SaleAction,
    },

    /// Inspect recorded orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },

    /// Admin token helpers
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum RateAction {
    /// List all rates with their status
    List,

    /// Create a rate
    Create {
        /// Rate identifier used by the landing page
        id: i64,

        /// Price in minor units (kopecks)
        #[arg(short, long)]
        price: i64,

        /// Number of seats
        #[arg(short, long)]
        limit: i64,
    },

    /// Set the click limit of a rate
    Limit {
        id: i64,
        count: i64,
    },
}

#[derive(Subcommand)]
enum SaleAction {
    /// Show whether the sale is open
    Status,

    /// Open or close the sale
    Toggle {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// List the newest orders
    List {
        #[arg(short, long, default_value_t = 50)]
        limit: i64,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Generate a random admin token
    Generate,
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
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Commands::Token {
        action: TokenAction::Generate,
    } = cli.command
    {
        print_generated_token();
        return Ok(());
    }

    let database_url = Config::load_database_url()?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;
    let pool = Arc::new(pool);

    match cli.command {
        Commands::Rates { action } => handle_rate_action(action, pool).await?,
        Commands::Sale { action } => handle_sale_action(action, pool).await?,
        Commands::Orders { action } => handle_order_action(action, pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
        Commands::Token { .. } => {}
    }

    Ok(())
}

fn status_service(pool: Arc<PgPool>) -> StatusService {
    StatusService::new(
        Arc::new(PgRateRepository::new(pool.clone())),
        Arc::new(PgSaleFlagStore::new(pool)),
    )
}

/// Dispatches rate commands.
async fn handle_rate_action(action: RateAction, pool: Arc<PgPool>) -> Result<()> {
    match action {
        RateAction::List => list_rates(pool).await?,
        RateAction::Create { id, price, limit } => {
            let repo = PgRateRepository::new(pool);
            let rate = repo
                .create(Rate::new(id, Money::from_minor(price), 0, limit))
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create rate: {}", e))?;

            println!(
                "{} Rate {} created: price {}, limit {}",
                "✅".green(),
                rate.id.to_string().cyan(),
                rate.price.to_string().bright_white(),
                rate.click_limit
            );
        }
        RateAction::Limit { id, count } => {
            status_service(pool)
                .set_limit(id, count)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to update limit: {}", e))?;

            println!(
                "{} Limit for rate {} set to {}",
                "✅".green(),
                id.to_string().cyan(),
                count.to_string().bright_white().bold()
            );
        }
    }

    Ok(())
}

/// Lists rates with inventory and derived status.
///
/// # Output Format
///
/// ```text
/// 📋 Rates (sale: OPEN)
///
///   ID   Price        Clicks   Limit    Status
///   ──────────────────────────────────────────────
///   1    1500.00      12       30       start
///   2    4900.00      10       10       stop
/// ```
async fn list_rates(pool: Arc<PgPool>) -> Result<()> {
    let service = status_service(pool);

    let sale_enabled = service
        .sale_enabled()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read sale flag: {}", e))?;
    let rates = service
        .rates_with_status()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list rates: {}", e))?;

    let sale = if sale_enabled {
        "OPEN".green().bold()
    } else {
        "CLOSED".red().bold()
    };
    println!("{} (sale: {})", "📋 Rates".bright_blue().bold(), sale);
    println!();

    if rates.is_empty() {
        println!("{}", "  No rates found".yellow());
        println!();
        println!(
            "  Create one with: {} admin rates create <id> --price <kopecks> --limit <n>",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<4} {:<12} {:<8} {:<8} {}",
        "ID".bright_white().bold(),
        "Price".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Limit".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(46).bright_black());

    for (rate, status) in &rates {
        let status = match status {
            RateStatus::Start => status.as_str().green(),
            RateStatus::Stop => status.as_str().red(),
            RateStatus::Off => status.as_str().bright_black(),
        };

        println!(
            "  {:<4} {:<12} {:<8} {:<8} {}",
            rate.id.to_string().cyan(),
            rate.price.to_string(),
            rate.clicks,
            rate.click_limit,
            status
        );
    }
    println!();

    Ok(())
}

/// Dispatches sale flag commands.
async fn handle_sale_action(action: SaleAction, pool: Arc<PgPool>) -> Result<()> {
    let service = status_service(pool);

    let enabled = service
        .sale_enabled()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read sale flag: {}", e))?;

    match action {
        SaleAction::Status => {
            if enabled {
                println!("{}", "🟢 Sale is OPEN".green().bold());
            } else {
                println!("{}", "🔴 Sale is CLOSED".red().bold());
            }
        }
        SaleAction::Toggle { yes } => {
            let prompt = if enabled {
                "Close the sale?"
            } else {
                "Open the sale?"
            };

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(prompt)
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            let enabled = service
                .toggle_sale()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to toggle sale: {}", e))?;

            if enabled {
                println!("{}", "✅ Sale opened".green().bold());
            } else {
                println!("{}", "✅ Sale closed".yellow().bold());
            }
        }
    }

    Ok(())
}

/// Dispatches order commands.
async fn handle_order_action(action: OrderAction, pool: Arc<PgPool>) -> Result<()> {
    match action {
        OrderAction::List { limit } => {
            let repo = PgOrderRepository::new(pool);
            let orders = repo
                .list_recent(limit)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list orders: {}", e))?;

            println!("{}", "🧾 Orders".bright_blue().bold());
            println!();

            if orders.is_empty() {
                println!("{}", "  No orders yet".yellow());
                return Ok(());
            }

            println!(
                "  {:<18} {:<6} {:<38} {}",
                "Created".bright_white().bold(),
                "Rate".bright_white().bold(),
                "Payment".bright_white().bold(),
                "Email".bright_white().bold()
            );
            println!("  {}", "─".repeat(90).bright_black());

            for order in &orders {
                let rate = order
                    .rate_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "-".to_string());

                println!(
                    "  {:<18} {:<6} {:<38} {}",
                    order
                        .created_at
                        .format("%Y-%m-%d %H:%M")
                        .to_string()
                        .bright_black(),
                    rate,
                    order.payment_id,
                    order.email.cyan()
                );
            }

            println!();
            println!(
                "  Shown: {}",
                orders.len().to_string().bright_white().bold()
            );
            println!();
        }
    }

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
            let rates: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rates")
                .fetch_one(pool)
                .await?;
            let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Rates:      {}", rates.to_string().bright_green().bold());
            println!("  Orders:     {}", orders.to_string().bright_green().bold());
            println!();
        }
    }

    Ok(())
}

/// Prints a fresh admin token and its SHA-256 fingerprint.
fn print_generated_token() {
    let token = generate_token();

    println!("{}", "🔑 Admin token".bright_blue().bold());
    println!();
    println!("  ADMIN_TOKEN={}", token.bright_yellow().bold());
    println!("  Fingerprint: {}", fingerprint(&token).bright_black());
    println!();
    println!("{}", "Use it as:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/enable",
        token.bright_yellow()
    );
    println!();
}

/// Generates a cryptographically random token.
///
/// # Format
///
/// - Length: 48 characters
/// - Character set: A-Z, a-z, 0-9
/// - Entropy: ~286 bits
fn generate_token() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const TOKEN_LEN: usize = 48;

    let mut rng = rand::rng();

    (0..TOKEN_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// First 8 bytes of the token's SHA-256, hex encoded. Safe to share in logs.
fn fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    hex::encode(&digest[..8])
}
