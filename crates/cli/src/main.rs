//! Sungrove CLI - drive the client core against a live backend.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (sends an OTP and prompts for the code)
//! sungrove auth login -e customer@example.com
//!
//! # Inspect and edit the cart
//! sungrove cart add --id prod-1 --name "Candle" --price 18.00 -q 2
//! sungrove cart show
//!
//! # Admin session
//! sungrove admin login -e ops@example.com
//! sungrove admin status
//! ```
//!
//! # Commands
//!
//! - `auth` - OTP sign-in, status, logout
//! - `admin` - admin login, guard check, logout
//! - `cart` - add/update/remove/show/clear
//! - `wishlist` - toggle/show
//!
//! Configuration comes from the environment (`SUNGROVE_API_URL`,
//! `SUNGROVE_DATA_DIR`, `SUNGROVE_MAX_OTP_ATTEMPTS`); a `.env` file is
//! honored. State persists under the data directory, so carts and sessions
//! survive between invocations. OTP challenges do not - they live only in
//! memory, which is why `auth login` is a single interactive command.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)] // a CLI's output is stdout

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use sungrove_client::{ClientConfig, ClientSession, HttpApi};

mod commands;

use commands::{admin, auth, cart, wishlist};

#[derive(Parser)]
#[command(name = "sungrove")]
#[command(author, version, about = "Sungrove storefront client CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Customer sign-in and session management
    Auth {
        #[command(subcommand)]
        action: auth::AuthAction,
    },
    /// Admin session management
    Admin {
        #[command(subcommand)]
        action: admin::AdminAction,
    },
    /// Shopping cart operations
    Cart {
        #[command(subcommand)]
        action: cart::CartAction,
    },
    /// Wishlist operations
    Wishlist {
        #[command(subcommand)]
        action: wishlist::WishlistAction,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => ensure_data_dir(config),
        Err(err) => {
            tracing::error!(error = %err, "configuration error");
            return ExitCode::FAILURE;
        }
    };

    let api = HttpApi::new(&config.api_url);
    let mut session = ClientSession::new(&config, api, commands::TraceSink);

    let result = match cli.command {
        Commands::Auth { action } => auth::run(&mut session, action).await,
        Commands::Admin { action } => admin::run(&mut session, action).await,
        Commands::Cart { action } => cart::run(&mut session, &action),
        Commands::Wishlist { action } => wishlist::run(&mut session, &action),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            ExitCode::FAILURE
        }
    }
}

/// The CLI always persists: default the data directory when unset so carts
/// and sessions survive between invocations.
fn ensure_data_dir(mut config: ClientConfig) -> ClientConfig {
    if config.data_dir.is_none() {
        let base = std::env::var("HOME").map_or_else(|_| PathBuf::from("."), PathBuf::from);
        config.data_dir = Some(base.join(".sungrove"));
    }
    config
}
