//! Persistent attributes: the typed blob, the request-scoped manager and
//! the load/save/clear helpers handlers go through.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::warn;

use crate::cart::Product;
use crate::persistence::PersistenceAdapter;
use crate::{Error, Result};

/// Attributes persisted for one user.
///
/// Keys other than `products` are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(default, deserialize_with = "products_or_empty")]
    pub products: Vec<Product>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Attributes {
    /// An empty product list means there is no cart in progress.
    pub fn has_active_cart(&self) -> bool {
        !self.products.is_empty()
    }

    fn from_map(map: Map<String, Value>) -> Result<Self> {
        Ok(serde_json::from_value(Value::Object(map))?)
    }

    fn into_map(self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(Error::Internal(format!(
                "Attributes serialized to non-object: {}",
                other
            ))),
        }
    }
}

/// Falsy `products` (missing, null, false, 0, "") reads as an empty cart.
fn products_or_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Product>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(Vec::new()),
        Some(Value::String(s)) if s.is_empty() => Ok(Vec::new()),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items
            .into_iter()
            .enumerate()
            .filter_map(|(position, item)| {
                match serde_json::from_value::<Product>(item.clone()) {
                    Ok(product) => Some(product),
                    Err(err) => {
                        warn!(position, stored = %item, error = %err, "Dropping malformed product");
                        None
                    }
                }
            })
            .collect()),
        Some(other) => {
            warn!(stored = %other, "Discarding malformed products attribute");
            Ok(Vec::new())
        }
    }
}

/// Request-scoped access to persistent attributes.
///
/// Mirrors the platform persistence API: `get` reads through to the adapter
/// once per request, `set` replaces the pending blob, `persist` writes it.
pub struct AttributesManager {
    adapter: Arc<dyn PersistenceAdapter>,
    user_id: Option<String>,
    persistent: Option<Map<String, Value>>,
}

impl AttributesManager {
    pub fn new(adapter: Arc<dyn PersistenceAdapter>, user_id: Option<String>) -> Self {
        Self {
            adapter,
            user_id,
            persistent: None,
        }
    }

    fn user_id(&self) -> Result<&str> {
        self.user_id
            .as_deref()
            .ok_or_else(|| Error::Internal("Request carries no user id".to_string()))
    }

    pub async fn get_persistent_attributes(&mut self) -> Result<Map<String, Value>> {
        if let Some(cached) = &self.persistent {
            return Ok(cached.clone());
        }

        let loaded = self.adapter.get_attributes(self.user_id()?).await?;
        self.persistent = Some(loaded.clone());
        Ok(loaded)
    }

    pub fn set_persistent_attributes(&mut self, attributes: Map<String, Value>) {
        self.persistent = Some(attributes);
    }

    pub async fn save_persistent_attributes(&mut self) -> Result<()> {
        let attributes = self.persistent.as_ref().ok_or_else(|| {
            Error::Internal("Cannot save persistent attributes before get or set".to_string())
        })?;

        self.adapter
            .save_attributes(self.user_id()?, attributes)
            .await
    }
}

/// Load attributes, defaulting `products` to an empty list.
pub async fn load_attributes(manager: &mut AttributesManager) -> Result<Attributes> {
    let map = manager.get_persistent_attributes().await?;
    Attributes::from_map(map)
}

/// Overwrite the stored attributes with `attributes` (no merge).
pub async fn save_attributes(manager: &mut AttributesManager, attributes: Attributes) -> Result<()> {
    manager.set_persistent_attributes(attributes.into_map()?);
    manager.save_persistent_attributes().await
}

/// Reset the stored attributes to an empty mapping.
pub async fn clear_attributes(manager: &mut AttributesManager) -> Result<()> {
    manager.set_persistent_attributes(Map::new());
    manager.save_persistent_attributes().await
}
