//! Database connection management.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::secrets::DatabaseCredentials;
use crate::{Error, Result};

/// Create a database connection pool.
///
/// Host, port and database name from the secret win over the environment,
/// matching how RDS-managed secrets are rotated.
pub async fn create_pool(config: &DatabaseConfig, credentials: &DatabaseCredentials) -> Result<PgPool> {
    let database_url = database_url(config, credentials);

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&database_url)
        .await
        .map_err(Error::Database)?;

    Ok(pool)
}

fn database_url(config: &DatabaseConfig, credentials: &DatabaseCredentials) -> String {
    format!(
        "postgres://{}:{}@{}:{}/{}",
        credentials.username,
        credentials.password,
        credentials.host.as_deref().unwrap_or(&config.host),
        credentials.port.unwrap_or(config.port),
        credentials.dbname.as_deref().unwrap_or(&config.name),
    )
}
