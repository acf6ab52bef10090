//! First-match dispatch over the ordered handler chain.

use tracing::info;

use crate::handlers::{ErrorHandler, HandlerInput, RequestHandler};
use crate::response::ResponseEnvelope;
use crate::Error;

pub struct IntentRouter {
    handlers: Vec<Box<dyn RequestHandler>>,
    error_handler: Box<dyn ErrorHandler>,
}

impl IntentRouter {
    pub fn new(handlers: Vec<Box<dyn RequestHandler>>, error_handler: Box<dyn ErrorHandler>) -> Self {
        Self {
            handlers,
            error_handler,
        }
    }

    /// Run the first handler whose predicate accepts the request.
    ///
    /// Always produces a response: no match and handler errors both go to
    /// the error handler.
    pub async fn dispatch(&self, mut input: HandlerInput) -> ResponseEnvelope {
        let Some(handler) = self.handlers.iter().find(|h| h.can_handle(&input)) else {
            let description = match input.envelope.intent_name() {
                Some(intent) => format!("{} ({})", input.envelope.request_type(), intent),
                None => input.envelope.request_type().to_string(),
            };
            return self.handle_error(&input, Error::UnhandledRequest(description));
        };

        info!(
            handler = handler.name(),
            request_id = ?input.envelope.request.request_id,
            "Dispatching request"
        );

        match handler.handle(&mut input).await {
            Ok(response) => response,
            Err(err) => self.handle_error(&input, err),
        }
    }

    pub fn handle_error(&self, input: &HandlerInput, err: Error) -> ResponseEnvelope {
        self.error_handler.handle(input, &err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::fixtures;
    use crate::handlers::test_support::{failing_input, input};
    use crate::handlers::{default_request_handlers, DefaultErrorHandler};
    use crate::persistence::InMemoryPersistenceAdapter;
    use crate::response::get_response;
    use crate::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const APOLOGY: &str = "Sorry, I had trouble doing what you asked. Please try again.";

    struct Counting {
        label: &'static str,
        accepts: bool,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RequestHandler for Counting {
        fn name(&self) -> &'static str {
            self.label
        }

        fn can_handle(&self, _input: &HandlerInput) -> bool {
            self.accepts
        }

        async fn handle(&self, _input: &mut HandlerInput) -> Result<ResponseEnvelope> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(get_response(self.label, false))
        }
    }

    struct Failing;

    #[async_trait]
    impl RequestHandler for Failing {
        fn name(&self) -> &'static str {
            "Failing"
        }

        fn can_handle(&self, _input: &HandlerInput) -> bool {
            true
        }

        async fn handle(&self, _input: &mut HandlerInput) -> Result<ResponseEnvelope> {
            Err(Error::Internal("handler blew up".to_string()))
        }
    }

    fn router() -> IntentRouter {
        IntentRouter::new(default_request_handlers(), Box::new(DefaultErrorHandler))
    }

    #[tokio::test]
    async fn test_first_match_wins() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let handlers: Vec<Box<dyn RequestHandler>> = vec![
            Box::new(Counting { label: "skip", accepts: false, calls: Arc::new(AtomicUsize::new(0)) }),
            Box::new(Counting { label: "first", accepts: true, calls: first.clone() }),
            Box::new(Counting { label: "second", accepts: true, calls: second.clone() }),
        ];
        let router = IntentRouter::new(handlers, Box::new(DefaultErrorHandler));

        let adapter = Arc::new(InMemoryPersistenceAdapter::new());
        let response = router.dispatch(input(fixtures::launch(), &adapter)).await;

        assert_eq!(response.speech(), Some("first"));
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_handler_error_becomes_apology() {
        let handlers: Vec<Box<dyn RequestHandler>> = vec![Box::new(Failing)];
        let router = IntentRouter::new(handlers, Box::new(DefaultErrorHandler));
        let adapter = Arc::new(InMemoryPersistenceAdapter::new());
        let response = router.dispatch(input(fixtures::launch(), &adapter)).await;

        assert_eq!(response.speech(), Some(APOLOGY));
        assert!(response.keeps_session_open());
    }

    #[tokio::test]
    async fn test_unmatched_request_becomes_apology() {
        let adapter = Arc::new(InMemoryPersistenceAdapter::new());
        let response = router()
            .dispatch(input(fixtures::of_type("CanFulfillIntentRequest"), &adapter))
            .await;
        assert_eq!(response.speech(), Some(APOLOGY));
    }

    #[tokio::test]
    async fn test_store_failure_becomes_apology() {
        let response = router()
            .dispatch(failing_input(fixtures::add_product("pan", "15", "1")))
            .await;
        assert_eq!(response.speech(), Some(APOLOGY));
        assert!(response.keeps_session_open());
    }

    #[tokio::test]
    async fn test_unknown_intent_reaches_reflector() {
        let adapter = Arc::new(InMemoryPersistenceAdapter::new());
        let response = router()
            .dispatch(input(fixtures::intent("AMAZON.NavigateHomeIntent", &[], "NONE"), &adapter))
            .await;
        assert_eq!(response.speech(), Some("You just triggered AMAZON.NavigateHomeIntent"));
    }

    #[tokio::test]
    async fn test_intent_request_without_intent_becomes_apology() {
        let adapter = Arc::new(InMemoryPersistenceAdapter::new());
        let response = router()
            .dispatch(input(fixtures::of_type("IntentRequest"), &adapter))
            .await;

        assert_eq!(response.speech(), Some(APOLOGY));
        assert!(response.keeps_session_open());
        assert!(adapter.stored(fixtures::USER_ID).await.is_none());
    }
}
