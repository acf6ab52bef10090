//! Skill assembly: handler chain, error handler, persistence and skill id.

use std::sync::Arc;
use tracing::{info, warn};

use crate::attributes::AttributesManager;
use crate::envelope::RequestEnvelope;
use crate::handlers::{
    default_request_handlers, DefaultErrorHandler, ErrorHandler, HandlerInput, RequestHandler,
};
use crate::persistence::PersistenceAdapter;
use crate::response::ResponseEnvelope;
use crate::router::IntentRouter;
use crate::{Error, Result};

/// An invokable skill. Holds no per-session state, so one instance serves
/// every request the process receives.
pub struct Skill {
    router: IntentRouter,
    adapter: Arc<dyn PersistenceAdapter>,
    skill_id: Option<String>,
}

impl Skill {
    pub fn builder() -> SkillBuilder {
        SkillBuilder::default()
    }

    /// The cart skill with its standard handler chain.
    pub fn cart(adapter: Arc<dyn PersistenceAdapter>, skill_id: Option<String>) -> Result<Self> {
        Self::builder()
            .add_request_handlers(default_request_handlers())
            .with_persistence_adapter(adapter)
            .with_skill_id(skill_id)
            .build()
    }

    /// Serve one request. Never fails: every error becomes a spoken apology.
    pub async fn invoke(&self, envelope: RequestEnvelope) -> ResponseEnvelope {
        let user_id = envelope.user_id().map(String::from);
        if user_id.is_none() {
            warn!(request_type = envelope.request_type(), "Request without user id");
        }

        let input = HandlerInput::new(
            envelope,
            AttributesManager::new(Arc::clone(&self.adapter), user_id),
        );

        if let Err(err) = self.verify_skill_id(&input.envelope) {
            return self.router.handle_error(&input, err);
        }

        self.router.dispatch(input).await
    }

    fn verify_skill_id(&self, envelope: &RequestEnvelope) -> Result<()> {
        let Some(expected) = &self.skill_id else {
            return Ok(());
        };

        match envelope.application_id() {
            Some(actual) if actual == expected => Ok(()),
            actual => Err(Error::SkillIdMismatch {
                expected: expected.clone(),
                actual: actual.unwrap_or("<none>").to_string(),
            }),
        }
    }
}

#[derive(Default)]
pub struct SkillBuilder {
    handlers: Vec<Box<dyn RequestHandler>>,
    error_handler: Option<Box<dyn ErrorHandler>>,
    adapter: Option<Arc<dyn PersistenceAdapter>>,
    skill_id: Option<String>,
}

impl SkillBuilder {
    /// Append a handler; handlers are tried in the order they were added.
    pub fn add_request_handler(mut self, handler: impl RequestHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn add_request_handlers(mut self, handlers: Vec<Box<dyn RequestHandler>>) -> Self {
        self.handlers.extend(handlers);
        self
    }

    pub fn with_error_handler(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.error_handler = Some(Box::new(handler));
        self
    }

    pub fn with_persistence_adapter(mut self, adapter: Arc<dyn PersistenceAdapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    pub fn with_skill_id(mut self, skill_id: Option<String>) -> Self {
        self.skill_id = skill_id;
        self
    }

    pub fn build(self) -> Result<Skill> {
        let adapter = self
            .adapter
            .ok_or_else(|| Error::Config("Skill needs a persistence adapter".to_string()))?;

        if self.handlers.is_empty() {
            return Err(Error::Config("Skill needs at least one request handler".to_string()));
        }

        info!(
            handlers = self.handlers.len(),
            skill_id = ?self.skill_id,
            "Skill built"
        );

        let error_handler = self
            .error_handler
            .unwrap_or_else(|| Box::new(DefaultErrorHandler) as Box<dyn ErrorHandler>);

        Ok(Skill {
            router: IntentRouter::new(self.handlers, error_handler),
            adapter,
            skill_id: self.skill_id,
        })
    }
}
