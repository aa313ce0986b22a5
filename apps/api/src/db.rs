use std::time::Duration;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
}

/// Creates a PostgreSQL pool and verifies the first connection.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = pool_options().connect(database_url).await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Pool that connects on first use. Lets routes that never touch the
/// database run without one.
#[cfg(test)]
pub fn lazy_pool(database_url: &str) -> Result<PgPool> {
    Ok(pool_options().connect_lazy(database_url)?)
}
