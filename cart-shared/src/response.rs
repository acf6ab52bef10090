//! Outbound Alexa response payload and its builder.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub version: String,
    pub response: ResponseBody,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_end_session: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub speech_type: String,
    pub text: String,
}

impl OutputSpeech {
    fn plain_text(text: impl Into<String>) -> Self {
        Self {
            speech_type: "PlainText".to_string(),
            text: text.into(),
        }
    }
}

impl ResponseEnvelope {
    /// Spoken text, if any.
    pub fn speech(&self) -> Option<&str> {
        self.response.output_speech.as_ref().map(|s| s.text.as_str())
    }

    pub fn reprompt_speech(&self) -> Option<&str> {
        self.response
            .reprompt
            .as_ref()
            .map(|r| r.output_speech.text.as_str())
    }

    /// True when the session stays open waiting for the user.
    pub fn keeps_session_open(&self) -> bool {
        self.response.should_end_session == Some(false)
    }
}

/// Accumulates speech for a single response.
///
/// A reprompt keeps the session open; speech without a reprompt ends it;
/// a builder with neither produces the empty response.
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    speech: Option<String>,
    reprompt: Option<String>,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn speak(mut self, text: impl Into<String>) -> Self {
        self.speech = Some(text.into());
        self
    }

    pub fn reprompt(mut self, text: impl Into<String>) -> Self {
        self.reprompt = Some(text.into());
        self
    }

    pub fn get_response(self) -> ResponseEnvelope {
        let should_end_session = match (&self.speech, &self.reprompt) {
            (None, None) => None,
            (_, reprompt) => Some(reprompt.is_none()),
        };

        ResponseEnvelope {
            version: "1.0".to_string(),
            response: ResponseBody {
                output_speech: self.speech.map(OutputSpeech::plain_text),
                reprompt: self.reprompt.map(|text| Reprompt {
                    output_speech: OutputSpeech::plain_text(text),
                }),
                should_end_session,
            },
        }
    }
}

/// Speak `speech`, optionally reprompting with the same text.
pub fn get_response(speech: impl Into<String>, reprompt: bool) -> ResponseEnvelope {
    let speech = speech.into();
    let builder = ResponseBuilder::new().speak(speech.clone());
    if reprompt {
        builder.reprompt(speech).get_response()
    } else {
        builder.get_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reprompt_keeps_session_open() {
        let response = get_response("Producto agregado", true);
        assert_eq!(response.speech(), Some("Producto agregado"));
        assert_eq!(response.reprompt_speech(), Some("Producto agregado"));
        assert!(response.keeps_session_open());
    }

    #[test]
    fn test_no_reprompt_ends_session() {
        let response = get_response("Goodbye!", false);
        assert_eq!(response.response.should_end_session, Some(true));
        assert!(response.reprompt_speech().is_none());
    }

    #[test]
    fn test_empty_response_serialization() {
        let response = ResponseBuilder::new().get_response();
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, json!({ "version": "1.0", "response": {} }));
    }

    #[test]
    fn test_wire_format() {
        let value = serde_json::to_value(get_response("Hola", true)).unwrap();
        assert_eq!(
            value,
            json!({
                "version": "1.0",
                "response": {
                    "outputSpeech": { "type": "PlainText", "text": "Hola" },
                    "reprompt": { "outputSpeech": { "type": "PlainText", "text": "Hola" } },
                    "shouldEndSession": false
                }
            })
        );
    }
}
