//! Chickyen CLI - terminal front end for the storefront and the admin console.
//!
//! # Usage
//!
//! ```bash
//! # Browse the menu and fill the cart
//! chickyen shop products
//! chickyen shop cart add 65f0c2
//!
//! # Run the orders board
//! chickyen admin login -e owner@example.com -p secret
//! chickyen admin orders
//! chickyen admin advance 65f0c2 verified
//! ```
//!
//! # Commands
//!
//! - `shop` - Menu, cart and customer account
//! - `admin` - Orders, menu, customers, sales, pickup points, staff and logs
//!
//! Logs go to stderr; set `RUST_LOG` to change the level and
//! `CHICKYEN_LOG_FORMAT=json` for structured output.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "chickyen")]
#[command(author, version, about = "Chickyen storefront and admin console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the menu, manage the cart, sign in as a customer
    Shop {
        #[command(subcommand)]
        action: commands::shop::ShopAction,
    },
    /// Staff console
    Admin {
        #[command(subcommand)]
        action: commands::admin::AdminAction,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN")
        .ok()
        .filter(|dsn| !dsn.trim().is_empty())?;
    let environment = std::env::var("SENTRY_ENVIRONMENT").ok();

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: environment.map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    if guard.is_enabled() {
        tracing::info!("Sentry error tracking initialized");
    }

    Some(guard)
}

/// Map tracing levels to Sentry: errors and warnings become events, the rest
/// breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "chickyen=info,chickyen_core=info,chickyen_storefront=info,chickyen_admin=info".into()
    });

    let json = std::env::var("CHICKYEN_LOG_FORMAT").is_ok_and(|format| format == "json");
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    let _sentry_guard = init_sentry();
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = err.report();
            let _ = writeln!(std::io::stderr().lock(), "{message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> commands::Result<()> {
    match cli.command {
        Commands::Shop { action } => commands::shop::run(action).await,
        Commands::Admin { action } => commands::admin::run(action).await,
    }
}
