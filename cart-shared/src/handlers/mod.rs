//! Request handlers and the per-request input they operate on.

mod cart;
mod standard;

pub use cart::{AddProductIntentHandler, CloseCartIntentHandler, LaunchRequestHandler};
pub use standard::{
    CancelAndStopIntentHandler, DefaultErrorHandler, FallbackIntentHandler,
    HelloWorldIntentHandler, HelpIntentHandler, IntentReflectorHandler,
    SessionEndedRequestHandler,
};

use async_trait::async_trait;

use crate::attributes::AttributesManager;
use crate::envelope::RequestEnvelope;
use crate::response::ResponseEnvelope;
use crate::{Error, Result};

/// Everything a handler may touch while serving one request.
///
/// Built fresh for every invocation; nothing in here outlives the request.
pub struct HandlerInput {
    pub envelope: RequestEnvelope,
    pub attributes_manager: AttributesManager,
}

impl HandlerInput {
    pub fn new(envelope: RequestEnvelope, attributes_manager: AttributesManager) -> Self {
        Self {
            envelope,
            attributes_manager,
        }
    }
}

/// A handler for one kind of request.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    fn can_handle(&self, input: &HandlerInput) -> bool;

    async fn handle(&self, input: &mut HandlerInput) -> Result<ResponseEnvelope>;
}

/// Turns a failed or unroutable request into a response. Must not fail.
pub trait ErrorHandler: Send + Sync {
    fn handle(&self, input: &HandlerInput, error: &Error) -> ResponseEnvelope;
}

/// The cart skill's handler chain, in dispatch order.
pub fn default_request_handlers() -> Vec<Box<dyn RequestHandler>> {
    vec![
        Box::new(LaunchRequestHandler),
        Box::new(HelloWorldIntentHandler),
        Box::new(AddProductIntentHandler),
        Box::new(CloseCartIntentHandler),
        Box::new(HelpIntentHandler),
        Box::new(CancelAndStopIntentHandler),
        Box::new(FallbackIntentHandler),
        Box::new(SessionEndedRequestHandler),
        Box::new(IntentReflectorHandler),
    ]
}
