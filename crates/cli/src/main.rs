//! Cartwheel CLI - Demo driver for the rules engine.
//!
//! # Usage
//!
//! ```bash
//! # Run the scripted catalog / cart / checkout walkthrough
//! cartwheel demo
//!
//! # Same, with the order summary as JSON and the dark theme applied
//! cartwheel demo --json --theme dark
//!
//! # Price one line
//! cartwheel quote --price 9.99 --quantity 2 --shipping Express --payment PayPal
//! ```
//!
//! # Commands
//!
//! - `demo` - Walk through the engine against an in-memory store
//! - `quote` - Price a single cart line
//!
//! Logging goes to stderr and honors `RUST_LOG` (default `info`). Engine
//! settings come from `CARTWHEEL_*` variables, see [`EngineConfig`]; a
//! `.env` file in the working directory is loaded first.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cartwheel_core::Theme;
use cartwheel_engine::EngineConfig;

mod commands;

use commands::quote::QuoteRequest;

#[derive(Parser)]
#[command(name = "cartwheel")]
#[command(author, version, about = "Cartwheel rules engine demo")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed a catalog, fill a cart and place an order
    Demo {
        /// Print the order summary as JSON
        #[arg(long)]
        json: bool,

        /// Theme to apply to the session (`light`, `dark`)
        #[arg(long, default_value = "light")]
        theme: Theme,
    },
    /// Price a single cart line
    Quote {
        /// Unit price
        #[arg(long)]
        price: f64,

        #[arg(long, default_value_t = 1)]
        quantity: u32,

        /// Shipping method label
        #[arg(long, default_value = "Standard")]
        shipping: String,

        /// Payment method label
        #[arg(long, default_value = "CreditCard")]
        payment: String,

        /// Shipping distance (defaults to `CARTWHEEL_CHECKOUT_DISTANCE`)
        #[arg(long)]
        distance: Option<f64>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = EngineConfig::from_env()?;
    match cli.command {
        Commands::Demo { json, theme } => commands::demo::run(config, theme, json).await?,
        Commands::Quote {
            price,
            quantity,
            shipping,
            payment,
            distance,
            json,
        } => commands::quote::run(
            QuoteRequest {
                price,
                quantity,
                shipping,
                payment,
                distance: distance.unwrap_or(config.checkout_distance),
            },
            json,
        )?,
    }
    Ok(())
}
