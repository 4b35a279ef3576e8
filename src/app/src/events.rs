use serde::{Deserialize, Serialize};

use crate::commands::socket::SocketOutput;

/// Device socket events
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    Connected,
    Disconnected,
    /// Raw text frame as received from the device
    MessageReceived(String),

    // Outcome of a send (internal event, skipped from serialization)
    #[serde(skip)]
    SendResult(SocketOutput),
}

/// User requests that talk to the device
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// Flat form values as a JSON object of key to scalar
    SubmitSettings {
        values: String,
    },
    /// `data` is JSON text, empty means `{}`
    SendAction {
        action: String,
        data: String,
        expect_reply: bool,
    },
    /// Contents of a settings backup file
    RestoreSettings {
        contents: String,
    },
    ResetToFactoryDefaults,
    Reboot,
    Reconnect,
}

/// UI-specific events
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ClearError,
    ClearSuccess,
}

/// Events that can happen in the app
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum Event {
    /// Load the static form mask (JSON)
    Initialize { mask: String },
    Socket(SocketEvent),
    Device(DeviceEvent),
    Ui(UiEvent),
}
