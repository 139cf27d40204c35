//! Database connection pool management

use anyhow::{Context, Result};
use backoff::ExponentialBackoffBuilder;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use std::str::FromStr;
use std::time::Duration;

/// Give up on the initial connection after this long
const CONNECT_MAX_ELAPSED: Duration = Duration::from_secs(30);

/// Create a PostgreSQL connection pool and apply pending migrations.
///
/// The first connection is retried with exponential backoff so the service
/// can start alongside its database.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    let connect_options = PgConnectOptions::from_str(database_url)
        .context("Invalid DATABASE_URL")?
        .application_name("qatar-tenders-backend");

    let policy = ExponentialBackoffBuilder::new()
        .with_initial_interval(Duration::from_millis(250))
        .with_max_interval(Duration::from_secs(5))
        .with_max_elapsed_time(Some(CONNECT_MAX_ELAPSED))
        .build();

    let pool = backoff::future::retry_notify(
        policy,
        || {
            let connect_options = connect_options.clone();
            async move {
                PgPoolOptions::new()
                    .max_connections(max_connections)
                    .min_connections(1)
                    .acquire_timeout(Duration::from_secs(5))
                    .idle_timeout(Duration::from_secs(300))
                    .max_lifetime(Duration::from_secs(1800))
                    .connect_with(connect_options)
                    .await
                    .map_err(backoff::Error::transient)
            }
        },
        |e: sqlx::Error, wait: Duration| {
            tracing::warn!(error = %e, retry_in_ms = wait.as_millis() as u64, "PostgreSQL not ready");
        },
    )
    .await
    .context("Failed to connect to PostgreSQL")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!(max_connections, "Database connection pool established");

    Ok(pool)
}
