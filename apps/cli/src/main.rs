//! # pizzaria: Command-Line Order Terminal
//!
//! Operator-facing CLI over the pizzeria database: catalog management,
//! checkout, order lifecycle and receipt files.
//!
//! ## Usage
//! ```bash
//! pizzaria customer add --name "Maria Silva" --phone "11 99999-0000" \
//!     --postal-code 01310-100 --address "Av. Paulista, 1000"
//!
//! pizzaria order create --customer <id> --payment pix --fulfillment delivery \
//!     --item "product=<pizza-id>,qty=1,size=G,crust=<crust-id>,extras=<extra-id>"
//!
//! pizzaria order advance <order-id>
//! ```
//!
//! Database path comes from `--db` / `PIZZARIA_DB`; receipt files land in
//! `--receipts-dir` / `PIZZARIA_RECEIPTS`.

mod commands;
mod item_spec;
mod receipts;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pizzaria_db::{Database, DbConfig};

#[derive(Debug, Parser)]
#[command(name = "pizzaria", version, about = "Pizzeria order terminal")]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "PIZZARIA_DB", default_value = "./pizzaria.db", global = true)]
    db: PathBuf,

    /// Directory for receipt files
    #[arg(
        long,
        env = "PIZZARIA_RECEIPTS",
        default_value = "./receipts",
        global = true
    )]
    receipts_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Manage customers
    Customer {
        #[command(subcommand)]
        action: commands::customer::CustomerAction,
    },
    /// Manage the menu
    Product {
        #[command(subcommand)]
        action: commands::product::ProductAction,
    },
    /// Create and manage orders
    Order {
        #[command(subcommand)]
        action: commands::order::OrderAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let db = Database::new(DbConfig::new(&cli.db)).await?;

    let result = match cli.command {
        Command::Customer { action } => commands::customer::run(&db, action).await,
        Command::Product { action } => commands::product::run(&db, action).await,
        Command::Order { action } => commands::order::run(&db, &cli.receipts_dir, action).await,
    };

    db.close().await;
    result
}
