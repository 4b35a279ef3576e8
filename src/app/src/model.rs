use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::mapper::{self, FlatMap, Mask, StateObject};

/// Last known state of the connected device.
///
/// The tree only changes through [`DeviceState::apply`], which the update
/// functions call for every state fragment the device sends.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeviceState {
    tree: StateObject,
}

impl DeviceState {
    pub fn tree(&self) -> &StateObject {
        &self.tree
    }

    pub(crate) fn apply(&mut self, fragment: StateObject) {
        mapper::merge(&mut self.tree, fragment);
    }

    /// Form values for the current state
    pub fn flatten(&self, mask: &Mask) -> FlatMap {
        mapper::flatten(&self.tree, mask)
    }

    /// Settings that differ between `values` and the current state
    pub fn changes(&self, values: &FlatMap, mask: &Mask) -> StateObject {
        mapper::changed_payload(values, &self.tree, mask)
    }
}

impl From<StateObject> for DeviceState {
    fn from(tree: StateObject) -> Self {
        Self { tree }
    }
}

/// A request sent with an `id` that still waits for its reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub action: String,
}

/// Reply the device sent for a tracked request
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DeviceReply {
    pub id: u64,
    pub action: String,
    pub data: StateObject,
}

/// Application Model - the complete state
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Model {
    // Device state
    pub device: DeviceState,
    pub mask: Mask,

    // Session state
    pub is_connected: bool,
    pub settings_saved: bool,
    pub requires_password_set: bool,
    pub reload_requested: bool,
    pub device_message: Option<String>,

    // Request tracking
    pub pending_requests: BTreeMap<u64, PendingRequest>,
    pub last_request_id: u64,
    pub last_reply: Option<DeviceReply>,

    // UI state
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

/// What the Shell renders
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub values: FlatMap,
    pub is_connected: bool,
    pub settings_saved: bool,
    pub requires_password_set: bool,
    pub reload_requested: bool,
    pub device_message: Option<String>,
    pub last_reply: Option<DeviceReply>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

impl Model {
    /// Form values for the current device state
    pub fn form_values(&self) -> FlatMap {
        self.device.flatten(&self.mask)
    }

    /// Track a request that expects a reply and return its id
    pub fn track_request(&mut self, action: impl Into<String>) -> u64 {
        self.last_request_id += 1;
        self.pending_requests.insert(
            self.last_request_id,
            PendingRequest {
                action: action.into(),
            },
        );
        self.last_request_id
    }

    /// Start a loading operation (sets is_loading=true, clears error)
    pub fn start_loading(&mut self) {
        self.is_loading = true;
        self.error_message = None;
    }

    /// Stop loading and clear error
    pub fn stop_loading(&mut self) {
        self.is_loading = false;
        self.error_message = None;
    }

    /// Set an error message and stop loading
    pub fn set_error(&mut self, error: String) {
        self.is_loading = false;
        self.error_message = Some(error);
    }

    /// Set an error message, stop loading, and return a render command
    pub fn set_error_and_render(
        &mut self,
        error: String,
    ) -> crux_core::Command<crate::Effect, crate::events::Event> {
        self.set_error(error);
        crux_core::render::render()
    }

    pub fn view(&self) -> ViewModel {
        ViewModel {
            values: self.form_values(),
            is_connected: self.is_connected,
            settings_saved: self.settings_saved,
            requires_password_set: self.requires_password_set,
            reload_requested: self.reload_requested,
            device_message: self.device_message.clone(),
            last_reply: self.last_reply.clone(),
            is_loading: self.is_loading,
            error_message: self.error_message.clone(),
            success_message: self.success_message.clone(),
        }
    }
}
