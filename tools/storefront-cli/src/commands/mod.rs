//! CLI command implementations.

pub mod cart;
pub mod config;
pub mod product;
pub mod products;

use clap::{Args, Subcommand};

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    /// Search query; lists every product when omitted.
    #[arg(short, long)]
    pub query: Option<String>,
}

/// Arguments for the product command.
#[derive(Args)]
pub struct ProductArgs {
    /// Product id.
    pub id: String,

    /// Choose an option value, e.g. `--select color=black`. Repeat for
    /// each axis, first axis first.
    #[arg(short, long, value_name = "OPTION=VALUE")]
    pub select: Vec<String>,

    /// Quantity to add.
    #[arg(short = 'n', long, default_value_t = 1)]
    pub quantity: u32,

    /// Add the chosen variant to the cart.
    #[arg(long)]
    pub add: bool,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart
    Show {
        /// Variant ids to include in the subtotal.
        #[arg(long = "check", value_name = "VARIANT")]
        checked: Vec<String>,
    },

    /// Set a line's quantity
    Set {
        /// Variant id of the line.
        variant: String,
        /// New quantity.
        quantity: u32,
    },

    /// Remove a line
    Remove {
        /// Variant id of the line.
        variant: String,
    },

    /// Check out the selected lines
    Checkout {
        /// Variant ids to check out.
        #[arg(long = "check", value_name = "VARIANT")]
        checked: Vec<String>,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Write a default storefront.toml
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}
