//! Inbound Alexa request envelope and accessors.
//!
//! Only the fields the skill reads are modelled; everything else in the
//! platform JSON is ignored on deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const LAUNCH_REQUEST: &str = "LaunchRequest";
pub const INTENT_REQUEST: &str = "IntentRequest";
pub const SESSION_ENDED_REQUEST: &str = "SessionEndedRequest";

/// Full request envelope as delivered by the voice platform.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RequestEnvelope {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub session: Option<Session>,
    #[serde(default)]
    pub context: Option<Context>,
    pub request: Request,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub application: Option<Application>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub attributes: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Context {
    #[serde(rename = "System", default)]
    pub system: Option<SystemState>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SystemState {
    #[serde(default)]
    pub application: Option<Application>,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
}

/// The `request` object. `request_type` stays a string so unknown request
/// kinds still deserialize and can be reported by the error handler.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(rename = "type")]
    pub request_type: String,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub intent: Option<Intent>,
    /// SessionEndedRequest only
    #[serde(default)]
    pub reason: Option<String>,
    /// SessionEndedRequest only
    #[serde(default)]
    pub error: Option<RequestError>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub confirmation_status: ConfirmationStatus,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub confirmation_status: ConfirmationStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfirmationStatus {
    Confirmed,
    Denied,
    #[default]
    None,
    /// Any status this skill doesn't know; treated as neither confirmed nor denied.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RequestError {
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Request kinds the skill routes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Launch,
    Intent,
    SessionEnded,
    Other,
}

impl RequestEnvelope {
    pub fn request_type(&self) -> &str {
        &self.request.request_type
    }

    pub fn kind(&self) -> RequestKind {
        match self.request_type() {
            LAUNCH_REQUEST => RequestKind::Launch,
            INTENT_REQUEST => RequestKind::Intent,
            SESSION_ENDED_REQUEST => RequestKind::SessionEnded,
            _ => RequestKind::Other,
        }
    }

    /// Intent name, only for intent requests.
    pub fn intent_name(&self) -> Option<&str> {
        self.intent().map(|intent| intent.name.as_str())
    }

    fn intent(&self) -> Option<&Intent> {
        if self.kind() == RequestKind::Intent {
            self.request.intent.as_ref()
        } else {
            None
        }
    }

    /// True for an intent request naming one of `names`.
    pub fn is_intent(&self, names: &[&str]) -> bool {
        self.intent_name().is_some_and(|name| names.contains(&name))
    }

    /// Resolved value of a slot. Missing slot, missing value and non-intent
    /// requests all yield `None`.
    pub fn get_slot(&self, key: &str) -> Option<&str> {
        self.intent()?.slots.get(key)?.value.as_deref()
    }

    pub fn confirmation_status(&self) -> ConfirmationStatus {
        self.intent()
            .map(|intent| intent.confirmation_status)
            .unwrap_or_default()
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmation_status() == ConfirmationStatus::Confirmed
    }

    pub fn is_denied(&self) -> bool {
        self.confirmation_status() == ConfirmationStatus::Denied
    }

    /// User identity used to key persistent attributes.
    pub fn user_id(&self) -> Option<&str> {
        self.system()
            .and_then(|system| system.user.as_ref())
            .or_else(|| self.session.as_ref().and_then(|s| s.user.as_ref()))
            .map(|user| user.user_id.as_str())
    }

    pub fn application_id(&self) -> Option<&str> {
        self.system()
            .and_then(|system| system.application.as_ref())
            .or_else(|| self.session.as_ref().and_then(|s| s.application.as_ref()))
            .map(|app| app.application_id.as_str())
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session.as_ref()?.session_id.as_deref()
    }

    fn system(&self) -> Option<&SystemState> {
        self.context.as_ref()?.system.as_ref()
    }
}
