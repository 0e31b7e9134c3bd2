//! Storefront CLI - Command line client for the storefront API.
//!
//! Commands:
//! - `storefront products` - List or search products
//! - `storefront product` - Show a product and pick a variant
//! - `storefront cart` - Show and edit the cart
//! - `storefront config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use storefront_observability::{init_logging, LogLevel};

use commands::{CartArgs, ConfigArgs, ProductArgs, ProductsArgs};

/// Storefront CLI - Browse products and manage your cart
#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List or search products
    Products(ProductsArgs),

    /// Show a product and choose a variant
    Product(ProductArgs),

    /// Show and edit the cart
    Cart(CartArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);
    let ctx = context::Context::load(cli.config.as_deref(), output)?;

    let mut logging = ctx.config.logging.clone();
    if cli.verbose {
        logging.level = LogLevel::Debug;
    }
    init_logging(&logging).context("Failed to initialize logging")?;

    let result = match cli.command {
        Commands::Products(args) => commands::products::run(args, &ctx).await,
        Commands::Product(args) => commands::product::run(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
