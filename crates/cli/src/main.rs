//! Ammonader CLI - cart inspection and storefront tooling.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart of an existing session
//! ammo-cli --cart c1-7a0c1f cart show
//!
//! # Add two units of a variant
//! ammo-cli cart add --variant 39897499729985 --quantity 2
//!
//! # Set a line's quantity through the debounced synchronizer
//! ammo-cli --cart c1-7a0c1f cart set --key 39897499729985:7a0c1f --quantity 3
//!
//! # Format minor units with the store's money template
//! ammo-cli money 150000 --format "{{amount_no_decimals}} ج.م"
//! ```
//!
//! # Commands
//!
//! - `cart show` - Print the current cart
//! - `cart add` - Add a variant to the cart
//! - `cart set` - Commit a typed quantity for one line
//! - `money` - Format an amount

#![cfg_attr(not(test), forbid(unsafe_code))]

use ammonader_storefront::config::StorefrontConfig;
use ammonader_storefront::error::{AppError, Result};
use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "ammo-cli")]
#[command(author, version, about = "Ammonader storefront CLI tools")]
struct Cli {
    /// Value of the store's `cart` cookie, to act on an existing cart
    #[arg(long, global = true, env = "STOREFRONT_CART_TOKEN")]
    cart: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Format an amount in minor units
    Money {
        /// Amount in minor units (e.g., 150000 for LE 1,500.00)
        #[arg(allow_negative_numbers = true)]
        cents: i64,

        /// Money template (defaults to `STOREFRONT_MONEY_FORMAT` or `LE {{amount}}`)
        #[arg(short, long)]
        format: Option<String>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the current cart
    Show,
    /// Add a variant to the cart
    Add {
        /// Variant ID
        #[arg(short, long)]
        variant: String,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Commit a typed quantity for one cart line
    Set {
        /// Line key
        #[arg(short, long)]
        key: String,

        /// Quantity as typed (validated like the cart page input)
        #[arg(short, long, allow_hyphen_values = true)]
        quantity: String,

        /// Inventory limit of the line, if known
        #[arg(long)]
        max: Option<u32>,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // `money` works without a store; everything else needs the config
    let config = StorefrontConfig::from_env();

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ammo_cli=info,ammonader_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, config.map_err(AppError::from)).await {
        e.report();
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: Result<StorefrontConfig>) -> Result<()> {
    match cli.command {
        Commands::Cart { action } => {
            let config = config?;
            let cart = cli.cart.as_deref();
            match action {
                CartAction::Show => {
                    commands::cart::show(&config, cart).await?;
                }
                CartAction::Add { variant, quantity } => {
                    commands::cart::add(&config, cart, &variant, quantity).await?;
                }
                CartAction::Set { key, quantity, max } => {
                    commands::cart::set(&config, cart, &key, &quantity, max).await?;
                }
            }
        }
        Commands::Money { cents, format } => {
            let configured = config.ok().map(|c| c.money_format);
            commands::money::format(cents, format.as_deref(), configured)?;
        }
    }
    Ok(())
}
