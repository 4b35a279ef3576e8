pub mod commands;
pub mod events;
pub mod macros;
pub mod mapper;
pub mod model;
pub mod protocol;
pub mod update;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

#[cfg(test)]
mod tests;

use crux_core::Command;

// Re-export core types
pub use crate::{
    commands::socket::{SocketOperation, SocketOutput},
    events::{DeviceEvent, Event, SocketEvent, UiEvent},
    model::{DeviceReply, DeviceState, Model, ViewModel},
};

#[crux_macros::effect(typegen)]
pub enum Effect {
    Render(crux_core::render::RenderOperation),
    Socket(SocketOperation),
}

pub type SocketCmd = crate::commands::socket::DeviceSocket<Effect, Event>;

/// The Core application
#[derive(Default)]
pub struct App;

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Effect = Effect;

    fn update(&self, event: Self::Event, model: &mut Self::Model) -> Command<Effect, Event> {
        update::update(event, model)
    }

    fn view(&self, model: &Self::Model) -> Self::ViewModel {
        model.view()
    }
}
