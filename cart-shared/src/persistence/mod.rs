//! Durable storage for per-user persistent attributes.

mod memory;
mod postgres;

pub use memory::InMemoryPersistenceAdapter;
pub use postgres::PgPersistenceAdapter;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::Result;

/// Storage backend for attribute blobs, keyed by platform user id.
///
/// A user with nothing stored reads back as an empty mapping.
#[async_trait]
pub trait PersistenceAdapter: Send + Sync {
    async fn get_attributes(&self, user_id: &str) -> Result<Map<String, Value>>;

    /// Replace the stored blob for `user_id`.
    async fn save_attributes(&self, user_id: &str, attributes: &Map<String, Value>) -> Result<()>;
}
