//! WebSocket frames exchanged with the device
//!
//! Inbound frames are JSON objects. A frame carrying a numeric `id` answers a
//! request the UI sent earlier; every other frame is a state update, possibly
//! mixed with a few control keys that drive the UI rather than the forms.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::mapper::{Scalar, StateObject, StateValue};

const ID_KEY: &str = "id";
const SAVED_KEY: &str = "saved";
const MESSAGE_KEY: &str = "message";
const ACTION_KEY: &str = "action";
const WEB_MODE_KEY: &str = "webMode";

/// Web mode announced while the device still uses its default password
pub const WEB_MODE_PASSWORD: u64 = 1;

/// A parsed inbound frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    Reply { id: u64, data: StateObject },
    Update(DeviceUpdate),
}

/// State update plus the control keys found next to it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceUpdate {
    pub saved: Option<bool>,
    pub message: Option<String>,
    pub action: Option<String>,
    pub web_mode: Option<u64>,
    pub state: StateObject,
}

/// Escape raw control characters the firmware leaves inside JSON strings
pub fn sanitize_frame(text: &str) -> String {
    text.replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Parse an inbound text frame
pub fn parse_frame(text: &str) -> Result<InboundFrame, String> {
    let value: Value = serde_json::from_str(&sanitize_frame(text))
        .map_err(|e| format!("invalid data received: {e}"))?;

    let StateValue::Object(mut object) = StateValue::from(value) else {
        return Err("invalid data received: expected a JSON object".to_string());
    };

    let id = object
        .get(ID_KEY)
        .and_then(StateValue::as_scalar)
        .and_then(Scalar::as_u64)
        .filter(|id| *id != 0);

    if let Some(id) = id {
        object.remove(ID_KEY);
        return Ok(InboundFrame::Reply { id, data: object });
    }

    let saved = take_scalar(&mut object, SAVED_KEY).and_then(|saved| saved.as_bool());
    let message = take_scalar(&mut object, MESSAGE_KEY).map(display);
    let action = take_scalar(&mut object, ACTION_KEY).and_then(|action| match action {
        Scalar::String(action) => Some(action),
        _ => None,
    });
    let web_mode = take_scalar(&mut object, WEB_MODE_KEY).and_then(|mode| mode.as_u64());

    Ok(InboundFrame::Update(DeviceUpdate {
        saved,
        message,
        action,
        web_mode,
        state: object,
    }))
}

fn take_scalar(object: &mut StateObject, key: &str) -> Option<Scalar> {
    match object.get(key)? {
        StateValue::Scalar(_) => match object.remove(key) {
            Some(StateValue::Scalar(scalar)) => Some(scalar),
            _ => None,
        },
        _ => None,
    }
}

fn display(scalar: Scalar) -> String {
    match scalar {
        Scalar::String(s) => s,
        other => Value::from(other).to_string(),
    }
}

/// Outbound settings frame
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigFrame {
    pub config: StateObject,
}

/// Outbound action frame
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionFrame {
    pub action: String,
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl ConfigFrame {
    pub fn to_text(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("failed to encode settings: {e}"))
    }
}

impl ActionFrame {
    pub fn new(action: impl Into<String>, data: Value) -> Self {
        Self {
            action: action.into(),
            data,
            id: None,
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn to_text(&self) -> Result<String, String> {
        serde_json::to_string(self)
            .map_err(|e| format!("failed to encode action {}: {e}", self.action))
    }
}
