//! `harvest` - scan, list and reset stored order history.
//!
//! # Usage
//!
//! ```bash
//! # Discover new orders for the signed-in account
//! harvest scan
//!
//! # Same, for an explicit owner with bigger batches
//! harvest scan --owner 1234567 --batch-size 10
//!
//! # Show what is stored
//! harvest list --owner 1234567
//!
//! # Print the owner id of the session in HARVEST_COOKIE
//! harvest whoami
//!
//! # Delete the database
//! harvest reset
//! ```

use clap::{Parser, Subcommand};
use order_harvest::config::HarvestConfig;
use order_harvest::discovery::LogProgress;
use order_harvest::lifecycle::{setup_tracing, HarvestSystem};
use order_harvest::source::{HttpOrderSource, StaticCookies};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "harvest")]
#[command(author, version, about = "Discover and store purchase-order history")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch orders newer than the stored ones
    Scan {
        /// Owner id; resolved from the session when omitted
        #[arg(short, long)]
        owner: Option<String>,

        /// Concurrent fetches per batch (overrides HARVEST_BATCH_SIZE)
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        batch_size: Option<u64>,
    },
    /// List stored line items
    List {
        #[arg(short, long)]
        owner: String,
    },
    /// Print the owner id of the current session
    Whoami,
    /// Delete all stored orders
    Reset,
}

#[tokio::main]
async fn main() {
    setup_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = HarvestConfig::from_env()?;
    let credentials = Arc::new(StaticCookies::new(config.cookie.clone()));
    let source = HttpOrderSource::new(config.source_config(), credentials)?;

    let batch_size = match &cli.command {
        Commands::Scan { batch_size: Some(n), .. } => *n,
        _ => config.batch_size,
    };
    let system = HarvestSystem::new(config.store_location(), source, batch_size);

    let result = dispatch(&system, cli.command).await;
    system.shutdown().await?;
    result
}

async fn dispatch(
    system: &HarvestSystem<HttpOrderSource>,
    command: Commands,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Scan { owner, .. } => {
            let owner = match owner {
                Some(owner) => owner,
                None => system
                    .source()
                    .current_owner_id()
                    .await?
                    .ok_or("could not determine the owner id; pass --owner")?,
            };
            let summary = system.scan(&owner, Some(&LogProgress)).await?;
            info!(owner = %owner, total = summary.total, last_order = summary.last_order, "Done");
            println!("{} new items, scanned through order {}", summary.total, summary.last_order);
        }
        Commands::List { owner } => {
            let mut items = system.items(&owner).await?;
            items.sort_by(|a, b| {
                (a.order_number_value(), &a.product_sku).cmp(&(b.order_number_value(), &b.product_sku))
            });
            for item in items {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    item.order_number,
                    item.product_sku,
                    item.quantity,
                    item.product_price,
                    item.seller_name,
                    item.product_name
                );
            }
        }
        Commands::Whoami => match system.source().current_owner_id().await? {
            Some(owner) => println!("{owner}"),
            None => return Err("no numbered orders found for this session".into()),
        },
        Commands::Reset => {
            system.reset().await?;
            info!("All stored orders deleted");
        }
    }
    Ok(())
}
