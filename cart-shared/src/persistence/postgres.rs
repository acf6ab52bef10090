//! Postgres-backed attribute storage (one JSONB row per user).

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::PgPool;
use tracing::{info, warn};

use super::PersistenceAdapter;
use crate::Result;

pub struct PgPersistenceAdapter {
    pool: PgPool,
    table: String,
}

impl PgPersistenceAdapter {
    /// `table` must already be a validated identifier (see `Config`).
    pub fn new(pool: PgPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }

    /// Create the attributes table if it does not exist yet.
    pub async fn ensure_table(&self) -> Result<()> {
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                user_id TEXT PRIMARY KEY,
                attributes JSONB NOT NULL DEFAULT '{{}}'::jsonb,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )",
            self.table
        ))
        .execute(&self.pool)
        .await?;

        info!(table = %self.table, "Attributes table ready");
        Ok(())
    }
}

#[async_trait]
impl PersistenceAdapter for PgPersistenceAdapter {
    async fn get_attributes(&self, user_id: &str) -> Result<Map<String, Value>> {
        let stored: Option<Value> = sqlx::query_scalar(&format!(
            "SELECT attributes FROM {} WHERE user_id = $1",
            self.table
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match stored {
            Some(Value::Object(map)) => map,
            Some(other) => {
                warn!(user_id, stored = %other, "Ignoring non-object attributes");
                Map::new()
            }
            None => Map::new(),
        })
    }

    async fn save_attributes(&self, user_id: &str, attributes: &Map<String, Value>) -> Result<()> {
        sqlx::query(&format!(
            "INSERT INTO {} (user_id, attributes, updated_at)
             VALUES ($1, $2, NOW())
             ON CONFLICT (user_id)
             DO UPDATE SET attributes = EXCLUDED.attributes, updated_at = NOW()",
            self.table
        ))
        .bind(user_id)
        .bind(Value::Object(attributes.clone()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
