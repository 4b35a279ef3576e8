mod device;
mod socket;
mod ui;

use crux_core::{render::render, Command};
use log::error;

use crate::events::Event;
use crate::mapper::Mask;
use crate::model::Model;
use crate::Effect;

/// Main update dispatcher - routes events to domain-specific handlers
pub fn update(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        Event::Initialize { mask } => initialize(&mask, model),
        Event::Socket(socket_event) => socket::handle(socket_event, model),
        Event::Device(device_event) => device::handle(device_event, model),
        Event::Ui(ui_event) => ui::handle(ui_event, model),
    }
}

fn initialize(mask: &str, model: &mut Model) -> Command<Effect, Event> {
    match serde_json::from_str(mask) {
        Ok(value) => {
            model.mask = Mask::from_json(&value);
            render()
        }
        Err(e) => {
            error!("Failed to parse form mask: {e}");
            model.set_error_and_render(format!("Failed to parse form mask: {e}"))
        }
    }
}
