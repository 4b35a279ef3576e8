//! WebAssembly FFI bindings for the Crux Core
//!
//! The browser Shell owns the device WebSocket. It forwards socket events and
//! user input through `process_event` and executes the returned effects.

use lazy_static::lazy_static;
use wasm_bindgen::prelude::wasm_bindgen;

use crux_core::{bridge::Bridge, Core};

use crate::App;

lazy_static! {
    static ref CORE: Bridge<App> = Bridge::new(Core::new());
}

/// Set up logging to the browser console when the module loads
#[wasm_bindgen(start)]
pub fn init_wasm() {
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        wasm_bindgen::throw_str(&format!("failed to initialize logger: {e}"));
    }
}

/// Process a serialized Event, returning serialized Effects
#[wasm_bindgen]
pub fn process_event(event_bytes: &[u8]) -> Vec<u8> {
    let mut effects = Vec::new();
    if let Err(e) = CORE.update(event_bytes, &mut effects) {
        log::error!("failed to process event: {e}");
    }
    effects
}

/// Serialized ViewModel
#[wasm_bindgen]
pub fn view() -> Vec<u8> {
    let mut view = Vec::new();
    if let Err(e) = CORE.view(&mut view) {
        log::error!("failed to build view model: {e}");
    }
    view
}

/// Resolve effect `id` with a serialized output, returning follow-up Effects
#[wasm_bindgen]
pub fn handle_response(id: u32, response_bytes: &[u8]) -> Vec<u8> {
    let mut effects = Vec::new();
    if let Err(e) = CORE.resolve(
        crux_core::bridge::EffectId(id),
        response_bytes,
        &mut effects,
    ) {
        log::error!("failed to handle response for effect {id}: {e}");
    }
    effects
}
