use crux_core::{render::render, Command};
use log::{debug, error};
use serde_json::{json, Value};

use crate::events::{DeviceEvent, Event, SocketEvent};
use crate::mapper::FlatMap;
use crate::model::Model;
use crate::protocol::{ActionFrame, ConfigFrame};
use crate::{Effect, SocketCmd};

const RESTORE_ACTION: &str = "restore";
const FACTORY_RESET_ACTION: &str = "factory_reset";
const REBOOT_ACTION: &str = "reboot";
const RECONNECT_ACTION: &str = "reconnect";

/// Handle requests to the device
pub fn handle(event: DeviceEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        DeviceEvent::SubmitSettings { values } => match settings_frame(&values, model) {
            Ok(Some(frame)) => {
                model.settings_saved = false;
                model.start_loading();
                Command::all([render(), send(frame)])
            }
            Ok(None) => {
                debug!("no settings changed, nothing to send");
                Command::done()
            }
            Err(e) => {
                error!("{e}");
                model.set_error_and_render(e)
            }
        },

        DeviceEvent::SendAction {
            action,
            data,
            expect_reply,
        } => match parse_action_data(&data) {
            Ok(data) => send_action(&action, data, expect_reply, model),
            Err(e) => model.set_error_and_render(format!("Invalid data for action {action}: {e}")),
        },

        DeviceEvent::RestoreSettings { contents } => match parse_backup(&contents) {
            Ok(backup) => send_action(RESTORE_ACTION, backup, false, model),
            Err(e) => model.set_error_and_render(e),
        },

        DeviceEvent::ResetToFactoryDefaults => {
            send_action(FACTORY_RESET_ACTION, json!({}), false, model)
        }
        DeviceEvent::Reboot => send_action(REBOOT_ACTION, json!({}), false, model),
        DeviceEvent::Reconnect => send_action(RECONNECT_ACTION, json!({}), false, model),
    }
}

/// Settings frame for the submitted form values, `None` when nothing changed
fn settings_frame(values: &str, model: &Model) -> Result<Option<String>, String> {
    let values: FlatMap =
        serde_json::from_str(values).map_err(|e| format!("Invalid form values: {e}"))?;

    let config = model.device.changes(&values, &model.mask);
    if config.is_empty() {
        return Ok(None);
    }

    ConfigFrame { config }.to_text().map(Some)
}

fn parse_action_data(data: &str) -> Result<Value, serde_json::Error> {
    if data.trim().is_empty() {
        return Ok(json!({}));
    }
    serde_json::from_str(data)
}

fn parse_backup(contents: &str) -> Result<Value, String> {
    match serde_json::from_str(contents) {
        Ok(backup @ Value::Object(_)) => Ok(backup),
        Ok(_) => Err("Invalid settings file: expected a JSON object".to_string()),
        Err(e) => Err(format!("Invalid settings file: {e}")),
    }
}

fn send_action(
    action: &str,
    data: Value,
    expect_reply: bool,
    model: &mut Model,
) -> Command<Effect, Event> {
    let mut frame = ActionFrame::new(action, data);
    if expect_reply {
        frame = frame.with_id(model.track_request(action));
    }

    match frame.to_text() {
        Ok(text) => send(text),
        Err(e) => model.set_error_and_render(e),
    }
}

fn send(frame: String) -> Command<Effect, Event> {
    SocketCmd::send(frame)
        .build()
        .then_send(|output| Event::Socket(SocketEvent::SendResult(output)))
}
