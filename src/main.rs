//! reichelt-api main entry point
//!
//! Serves the product dispatcher, or runs a single lookup and prints the
//! result as JSON.

use clap::{Parser, Subcommand};
use reichelt_api::cache::MemoStore;
use reichelt_api::catalog::Catalog;
use reichelt_api::client::VendorSession;
use reichelt_api::config::{load_config_or_default, Config};
use reichelt_api::extract::{compile_selectors, ProductIdentity};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// reichelt-api: search, price, metadata and images for reichelt.de parts
#[derive(Parser, Debug)]
#[command(name = "reichelt-api")]
#[command(version)]
#[command(about = "Product data lookups for reichelt.de", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP dispatcher
    Serve {
        /// Address to bind, overrides the config file
        #[arg(long)]
        addr: Option<String>,
    },

    /// Search the catalog and print matching parts
    Search {
        /// Free-text query, e.g. a manufacturer part number
        query: String,
    },

    /// Print the current price of an article
    Price {
        /// Vendor article number
        id: u64,
    },

    /// Print the specification table of an article
    Meta {
        /// Vendor article number
        id: u64,
    },

    /// Download the product image of an article as PNG
    Image {
        /// Vendor article number
        id: u64,

        #[arg(long, default_value_t = 1000)]
        width: u32,

        #[arg(long, default_value_t = 1000)]
        height: u32,

        /// Where to write the PNG
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);
    compile_selectors();

    let config = match load_config_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let catalog = open_catalog(&config).await?;

    match cli.command {
        Command::Serve { addr } => {
            let addr = addr.unwrap_or_else(|| config.server.addr.clone());
            reichelt_api::server::serve(&addr, catalog).await?;
        }
        Command::Search { query } => {
            let parts = catalog.find_identities(&query).await?;
            println!("{}", serde_json::to_string_pretty(&parts)?);
        }
        Command::Price { id } => {
            let price = catalog.get_price(&ProductIdentity::from_number(id)).await;
            println!("{}", serde_json::to_string(&price)?);
        }
        Command::Meta { id } => {
            let table = catalog
                .get_specifications(&ProductIdentity::from_number(id))
                .await?;
            println!("{}", serde_json::to_string_pretty(&*table)?);
        }
        Command::Image {
            id,
            width,
            height,
            output,
        } => {
            let blob = catalog
                .get_image(&ProductIdentity::from_number(id), width, height)
                .await?;
            std::fs::write(&output, blob.to_png()?)?;
            tracing::info!(
                "Wrote {}x{} image to {}",
                blob.width(),
                blob.height(),
                output.display()
            );
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("reichelt_api=info,warn"),
            1 => EnvFilter::new("reichelt_api=debug,tower_http=debug,info"),
            2 => EnvFilter::new("reichelt_api=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Opens the vendor session and the process-wide cache
async fn open_catalog(config: &Config) -> Result<Catalog, Box<dyn std::error::Error>> {
    let session = match VendorSession::connect(&config.vendor, &config.http).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Could not open session with {}: {}", config.vendor.base_url, e);
            return Err(e.into());
        }
    };

    Ok(Catalog::new(session, Arc::new(MemoStore::new())))
}
