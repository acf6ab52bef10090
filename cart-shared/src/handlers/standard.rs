//! Built-in intents, session lifecycle and the catch-all handlers.

use async_trait::async_trait;
use tracing::{error, info};

use super::{ErrorHandler, HandlerInput, RequestHandler};
use crate::envelope::RequestKind;
use crate::response::{get_response, ResponseBuilder, ResponseEnvelope};
use crate::{Error, Result};

pub const HELLO_WORLD_INTENT: &str = "HelloWorldIntent";
pub const HELP_INTENT: &str = "AMAZON.HelpIntent";
pub const CANCEL_INTENT: &str = "AMAZON.CancelIntent";
pub const STOP_INTENT: &str = "AMAZON.StopIntent";
pub const FALLBACK_INTENT: &str = "AMAZON.FallbackIntent";

pub const HELLO_WORLD: &str = "Hello World!";
pub const HELP: &str = "You can say hello to me! How can I help?";
pub const GOODBYE: &str = "Goodbye!";
pub const FALLBACK: &str = "Sorry, I don't know about that. Please try again.";
pub const APOLOGY: &str = "Sorry, I had trouble doing what you asked. Please try again.";

pub struct HelloWorldIntentHandler;

#[async_trait]
impl RequestHandler for HelloWorldIntentHandler {
    fn name(&self) -> &'static str {
        HELLO_WORLD_INTENT
    }

    fn can_handle(&self, input: &HandlerInput) -> bool {
        input.envelope.is_intent(&[HELLO_WORLD_INTENT])
    }

    async fn handle(&self, _input: &mut HandlerInput) -> Result<ResponseEnvelope> {
        Ok(get_response(HELLO_WORLD, false))
    }
}

pub struct HelpIntentHandler;

#[async_trait]
impl RequestHandler for HelpIntentHandler {
    fn name(&self) -> &'static str {
        HELP_INTENT
    }

    fn can_handle(&self, input: &HandlerInput) -> bool {
        input.envelope.is_intent(&[HELP_INTENT])
    }

    async fn handle(&self, _input: &mut HandlerInput) -> Result<ResponseEnvelope> {
        Ok(get_response(HELP, true))
    }
}

pub struct CancelAndStopIntentHandler;

#[async_trait]
impl RequestHandler for CancelAndStopIntentHandler {
    fn name(&self) -> &'static str {
        "CancelAndStop"
    }

    fn can_handle(&self, input: &HandlerInput) -> bool {
        input.envelope.is_intent(&[CANCEL_INTENT, STOP_INTENT])
    }

    async fn handle(&self, _input: &mut HandlerInput) -> Result<ResponseEnvelope> {
        Ok(get_response(GOODBYE, false))
    }
}

/// Fires when an utterance maps to none of the skill's intents.
pub struct FallbackIntentHandler;

#[async_trait]
impl RequestHandler for FallbackIntentHandler {
    fn name(&self) -> &'static str {
        FALLBACK_INTENT
    }

    fn can_handle(&self, input: &HandlerInput) -> bool {
        input.envelope.is_intent(&[FALLBACK_INTENT])
    }

    async fn handle(&self, _input: &mut HandlerInput) -> Result<ResponseEnvelope> {
        Ok(get_response(FALLBACK, true))
    }
}

/// The platform is already closing the session; only log why.
pub struct SessionEndedRequestHandler;

#[async_trait]
impl RequestHandler for SessionEndedRequestHandler {
    fn name(&self) -> &'static str {
        "SessionEndedRequest"
    }

    fn can_handle(&self, input: &HandlerInput) -> bool {
        input.envelope.kind() == RequestKind::SessionEnded
    }

    async fn handle(&self, input: &mut HandlerInput) -> Result<ResponseEnvelope> {
        let request = &input.envelope.request;
        let (error_type, error_message) = request
            .error
            .as_ref()
            .map(|e| (e.error_type.as_deref(), e.message.as_deref()))
            .unwrap_or((None, None));

        info!(
            session_id = ?input.envelope.session_id(),
            reason = ?request.reason,
            error_type = ?error_type,
            error_message = ?error_message,
            "Session ended"
        );

        Ok(ResponseBuilder::new().get_response())
    }
}

/// Echoes any intent no earlier handler claimed. Must stay last in the chain.
pub struct IntentReflectorHandler;

#[async_trait]
impl RequestHandler for IntentReflectorHandler {
    fn name(&self) -> &'static str {
        "IntentReflector"
    }

    fn can_handle(&self, input: &HandlerInput) -> bool {
        input.envelope.kind() == RequestKind::Intent
    }

    async fn handle(&self, input: &mut HandlerInput) -> Result<ResponseEnvelope> {
        let Some(intent_name) = input.envelope.intent_name() else {
            return Err(Error::UnhandledRequest(format!(
                "{} without an intent",
                input.envelope.request_type()
            )));
        };
        Ok(get_response(format!("You just triggered {}", intent_name), false))
    }
}

/// Fixed apology for every failure; keeps the session open so the user can retry.
pub struct DefaultErrorHandler;

impl ErrorHandler for DefaultErrorHandler {
    fn handle(&self, input: &HandlerInput, err: &Error) -> ResponseEnvelope {
        error!(
            error = %err,
            kind = err.kind(),
            request_type = input.envelope.request_type(),
            intent = ?input.envelope.intent_name(),
            request_id = ?input.envelope.request.request_id,
            "Error handled"
        );

        get_response(APOLOGY, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::fixtures;
    use crate::handlers::test_support::input;
    use crate::persistence::InMemoryPersistenceAdapter;
    use std::sync::Arc;

    async fn respond(handler: &dyn RequestHandler, request: &mut HandlerInput) -> ResponseEnvelope {
        assert!(handler.can_handle(request), "{} should accept", handler.name());
        handler.handle(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_fixed_responses() {
        let adapter = Arc::new(InMemoryPersistenceAdapter::new());
        let cases: [(&dyn RequestHandler, &str, &str, bool); 5] = [
            (&HelloWorldIntentHandler, HELLO_WORLD_INTENT, HELLO_WORLD, false),
            (&HelpIntentHandler, HELP_INTENT, HELP, true),
            (&CancelAndStopIntentHandler, CANCEL_INTENT, GOODBYE, false),
            (&CancelAndStopIntentHandler, STOP_INTENT, GOODBYE, false),
            (&FallbackIntentHandler, FALLBACK_INTENT, FALLBACK, true),
        ];

        for (handler, intent, speech, reprompt) in cases {
            let mut request = input(fixtures::intent(intent, &[], "NONE"), &adapter);
            let response = respond(handler, &mut request).await;
            assert_eq!(response.speech(), Some(speech));
            assert_eq!(response.keeps_session_open(), reprompt, "{}", intent);
        }
    }

    #[tokio::test]
    async fn test_session_ended_returns_empty_response() {
        let adapter = Arc::new(InMemoryPersistenceAdapter::new());
        let mut request = input(fixtures::session_ended(), &adapter);
        let response = respond(&SessionEndedRequestHandler, &mut request).await;

        assert!(response.speech().is_none());
        assert!(response.response.should_end_session.is_none());
        assert!(adapter.stored(fixtures::USER_ID).await.is_none());
    }

    #[tokio::test]
    async fn test_reflector_echoes_intent_name() {
        let adapter = Arc::new(InMemoryPersistenceAdapter::new());
        let mut request = input(fixtures::intent("OrderPizzaIntent", &[], "NONE"), &adapter);
        let response = respond(&IntentReflectorHandler, &mut request).await;

        assert_eq!(response.speech(), Some("You just triggered OrderPizzaIntent"));
        assert_eq!(response.response.should_end_session, Some(true));
    }

    #[tokio::test]
    async fn test_reflector_rejects_missing_intent() {
        let adapter = Arc::new(InMemoryPersistenceAdapter::new());
        let mut request = input(fixtures::of_type("IntentRequest"), &adapter);

        assert!(IntentReflectorHandler.can_handle(&request));
        let err = IntentReflectorHandler.handle(&mut request).await.err().unwrap();
        assert!(matches!(err, Error::UnhandledRequest(_)));
    }

    #[test]
    fn test_reflector_ignores_non_intents() {
        let adapter = Arc::new(InMemoryPersistenceAdapter::new());
        assert!(!IntentReflectorHandler.can_handle(&input(fixtures::launch(), &adapter)));
        assert!(!IntentReflectorHandler.can_handle(&input(fixtures::session_ended(), &adapter)));
    }

    #[test]
    fn test_error_handler_apologizes() {
        let adapter = Arc::new(InMemoryPersistenceAdapter::new());
        let request = input(fixtures::launch(), &adapter);
        let response =
            DefaultErrorHandler.handle(&request, &Error::Internal("boom".to_string()));

        assert_eq!(response.speech(), Some(APOLOGY));
        assert_eq!(response.reprompt_speech(), Some(APOLOGY));
        assert!(response.keeps_session_open());
    }
}
