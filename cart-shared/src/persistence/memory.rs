//! In-process attribute storage for tests and local runs.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::PersistenceAdapter;
use crate::Result;

#[derive(Debug, Default)]
pub struct InMemoryPersistenceAdapter {
    records: RwLock<HashMap<String, Map<String, Value>>>,
}

impl InMemoryPersistenceAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored blob, `None` if the user was never saved.
    pub async fn stored(&self, user_id: &str) -> Option<Map<String, Value>> {
        self.records.read().await.get(user_id).cloned()
    }
}

#[async_trait]
impl PersistenceAdapter for InMemoryPersistenceAdapter {
    async fn get_attributes(&self, user_id: &str) -> Result<Map<String, Value>> {
        Ok(self.stored(user_id).await.unwrap_or_default())
    }

    async fn save_attributes(&self, user_id: &str, attributes: &Map<String, Value>) -> Result<()> {
        self.records
            .write()
            .await
            .insert(user_id.to_string(), attributes.clone());
        Ok(())
    }
}
