//! Dialout CLI - Database migrations and notification tools.
//!
//! # Usage
//!
//! ```bash
//! # Run notifier database migrations
//! dialout migrate
//!
//! # Re-run the notification dispatch for an order
//! dialout notify 1001
//!
//! # Resolve recipients without sending anything
//! dialout notify 1001 --dry-run
//!
//! # Send a canary message through the configured Twilio account
//! dialout sms-test --to +15550100199
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `notify` - Dispatch order confirmations manually
//! - `sms-test` - Verify Twilio credentials with a single message

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "dialout")]
#[command(author, version, about = "Dialout CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run notifier database migrations
    Migrate,
    /// Dispatch order confirmation SMS for one order
    Notify {
        /// Host order identifier
        order_id: i64,

        /// Resolve recipients and log them instead of sending
        #[arg(long)]
        dry_run: bool,
    },
    /// Send a test SMS to verify Twilio credentials
    SmsTest {
        /// Destination phone number
        #[arg(long)]
        to: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Notify { order_id, dry_run } => {
            commands::notify::run(order_id, dry_run).await?;
        }
        Commands::SmsTest { to } => commands::sms::run(&to).await?,
    }
    Ok(())
}
