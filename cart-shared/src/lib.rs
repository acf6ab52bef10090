//! Shared library for the cart skill Lambda.
//!
//! Request envelope and response types, persistent attribute access, the
//! cart handlers and the router that dispatches between them.

pub mod attributes;
pub mod cart;
pub mod config;
pub mod db;
pub mod envelope;
pub mod error;
pub mod handlers;
pub mod persistence;
pub mod response;
pub mod router;
pub mod secrets;
pub mod skill;

pub use attributes::{clear_attributes, load_attributes, save_attributes, Attributes, AttributesManager};
pub use cart::{CartTotals, Product};
pub use config::{Config, DatabaseConfig};
pub use envelope::RequestEnvelope;
pub use error::{Error, Result};
pub use handlers::{ErrorHandler, HandlerInput, RequestHandler};
pub use persistence::{InMemoryPersistenceAdapter, PersistenceAdapter, PgPersistenceAdapter};
pub use response::{ResponseBuilder, ResponseEnvelope};
pub use router::IntentRouter;
pub use secrets::{DatabaseCredentials, SecretsProvider};
pub use skill::{Skill, SkillBuilder};
