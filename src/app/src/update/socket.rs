use crux_core::{render::render, Command};
use log::{debug, error, warn};

use crate::commands::socket::SocketOutput;
use crate::events::{Event, SocketEvent};
use crate::mapper::StateObject;
use crate::model::{DeviceReply, Model};
use crate::protocol::{parse_frame, DeviceUpdate, InboundFrame, WEB_MODE_PASSWORD};
use crate::update_field;
use crate::Effect;

const RELOAD_ACTION: &str = "reload";

/// Handle device socket events
pub fn handle(event: SocketEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        SocketEvent::Connected => update_field!(model.is_connected, true),

        SocketEvent::Disconnected => {
            // nothing answers requests sent over a closed socket
            model.pending_requests.clear();
            update_field!(model.is_connected, false)
        }

        SocketEvent::MessageReceived(text) => match parse_frame(&text) {
            Ok(InboundFrame::Reply { id, data }) => handle_reply(id, data, model),
            Ok(InboundFrame::Update(update)) => apply_update(update, model),
            Err(e) => {
                error!("{e}. Frame: {text}");
                model.set_error_and_render(e)
            }
        },

        SocketEvent::SendResult(SocketOutput::Sent) => Command::done(),

        SocketEvent::SendResult(SocketOutput::Error { message }) => {
            model.set_error_and_render(format!("Failed to send to device: {message}"))
        }
    }
}

fn handle_reply(id: u64, data: StateObject, model: &mut Model) -> Command<Effect, Event> {
    let Some(request) = model.pending_requests.remove(&id) else {
        debug!("ignoring reply with unknown id {id}");
        return Command::done();
    };

    update_field!(
        model.last_reply,
        Some(DeviceReply {
            id,
            action: request.action,
            data,
        })
    )
}

fn apply_update(update: DeviceUpdate, model: &mut Model) -> Command<Effect, Event> {
    if let Some(saved) = update.saved {
        model.settings_saved = saved;
        if saved {
            model.stop_loading();
            model.success_message = Some("Changes saved".to_string());
        }
    }

    if let Some(message) = update.message {
        model.device_message = Some(message);
    }

    match update.action.as_deref() {
        Some(RELOAD_ACTION) => model.reload_requested = true,
        Some(other) => warn!("ignoring unknown device action {other}"),
        None => {}
    }

    if let Some(mode) = update.web_mode {
        model.requires_password_set = mode == WEB_MODE_PASSWORD;
    }

    if !update.state.is_empty() {
        model.device.apply(update.state);
    }

    render()
}
