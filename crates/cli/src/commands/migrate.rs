//! Database migration commands.
//!
//! Applies the notifier's own migrations (the `notifier.entity_meta` table).
//! The host platform's order tables are not touched - they belong to the
//! host and are read-only from this workspace.
//!
//! # Environment Variables
//!
//! - `DIALOUT_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)

use dialout_notifier::config::database_url_from_env;
use dialout_notifier::store::{MIGRATOR, create_pool};

/// Run notifier database migrations.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = database_url_from_env()?;

    tracing::info!("Connecting to notifier database...");
    let pool = create_pool(&database_url).await?;

    tracing::info!("Running notifier migrations...");
    MIGRATOR.run(&pool).await?;

    tracing::info!("Notifier migrations complete!");
    Ok(())
}
