//! Device socket command definitions.
//!
//! The Shell owns the WebSocket connected to the device. Inbound frames reach
//! the Core as events; the Core only asks the Shell to send frames.

use crux_core::{capability::Operation, command, Command};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

// Operations that the Shell needs to perform on the device socket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SocketOperation {
    Send { payload: String },
}

// What happened to a requested send
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SocketOutput {
    Sent,
    Error { message: String },
}

impl Operation for SocketOperation {
    type Output = SocketOutput;
}

/// Command-based device socket API
pub struct DeviceSocket<Effect, Event> {
    _effect: PhantomData<Effect>,
    _event: PhantomData<Event>,
}

impl<Effect, Event> DeviceSocket<Effect, Event>
where
    Effect: Send + From<crux_core::Request<SocketOperation>> + 'static,
    Event: Send + 'static,
{
    /// Send a text frame to the device
    pub fn send(payload: impl Into<String>) -> RequestBuilder<Effect, Event> {
        RequestBuilder::new(SocketOperation::Send {
            payload: payload.into(),
        })
    }
}

/// Request builder for socket operations
#[must_use]
pub struct RequestBuilder<Effect, Event> {
    operation: SocketOperation,
    _effect: PhantomData<Effect>,
    _event: PhantomData<fn() -> Event>,
}

impl<Effect, Event> RequestBuilder<Effect, Event>
where
    Effect: Send + From<crux_core::Request<SocketOperation>> + 'static,
    Event: Send + 'static,
{
    fn new(operation: SocketOperation) -> Self {
        Self {
            operation,
            _effect: PhantomData,
            _event: PhantomData,
        }
    }

    /// Build the request into a Command RequestBuilder
    pub fn build(
        self,
    ) -> command::RequestBuilder<Effect, Event, impl std::future::Future<Output = SocketOutput>>
    {
        command::RequestBuilder::new(move |ctx| async move {
            Command::request_from_shell(self.operation)
                .into_future(ctx)
                .await
        })
    }
}
