use super::*;
use crate::mapper::{Scalar, StateValue};
use crux_core::testing::AppTester;
use serde_json::json;

fn receive(app: &AppTester<App>, model: &mut Model, frame: serde_json::Value) {
    let _command = app.update(
        Event::Socket(SocketEvent::MessageReceived(frame.to_string())),
        model,
    );
}

#[test]
fn initialize_loads_mask() {
    let app = AppTester::<App>::default();
    let mut model = Model::default();

    let _command = app.update(
        Event::Initialize {
            mask: r#"{"wifi": {"_rssi": 1}}"#.to_string(),
        },
        &mut model,
    );

    assert!(model.mask.get("wifi").is_some());
    assert_eq!(model.error_message, None);
}

#[test]
fn invalid_mask_sets_error() {
    let app = AppTester::<App>::default();
    let mut model = Model::default();

    let _command = app.update(
        Event::Initialize {
            mask: "{".to_string(),
        },
        &mut model,
    );

    assert!(model.error_message.is_some());
}

#[test]
fn state_frames_are_merged_into_the_device_state() {
    let app = AppTester::<App>::default();
    let mut model = Model::default();

    receive(&app, &mut model, json!({"hostname": "espurna", "wifi": {"ssid": "home"}}));
    receive(&app, &mut model, json!({"wifi": {"rssi": -60}}));

    let view = app.view(&model);
    assert_eq!(view.values["hostname"], Scalar::from("espurna"));
    assert_eq!(view.values["wifiSsid"], Scalar::from("home"));
    assert_eq!(view.values["wifiRssi"], Scalar::from(-60i64));
}

#[test]
fn list_blocks_are_expanded_on_receive() {
    let app = AppTester::<App>::default();
    let mut model = Model::default();

    receive(
        &app,
        &mut model,
        json!({"relayConfig": {"_schema": ["name", "boot"], "list": [["fan", 0], ["lamp", 1]], "start": 0}}),
    );

    assert_eq!(
        model.device.tree().get("relayConfig"),
        Some(&StateValue::from(json!({"list": [
            {"name": "fan", "boot": 0},
            {"name": "lamp", "boot": 1}
        ]})))
    );
}

#[test]
fn control_keys_are_not_merged() {
    let app = AppTester::<App>::default();
    let mut model = Model {
        is_loading: true,
        ..Default::default()
    };

    receive(
        &app,
        &mut model,
        json!({"saved": true, "message": "rebooting", "action": "reload", "webMode": 1}),
    );

    assert!(model.device.tree().is_empty());
    assert!(model.settings_saved);
    assert!(!model.is_loading);
    assert!(model.reload_requested);
    assert!(model.requires_password_set);
    assert_eq!(model.device_message.as_deref(), Some("rebooting"));
}

#[test]
fn invalid_frame_leaves_state_untouched() {
    let app = AppTester::<App>::default();
    let mut model = Model::default();
    receive(&app, &mut model, json!({"hostname": "espurna"}));

    let _command = app.update(
        Event::Socket(SocketEvent::MessageReceived("[1, 2]".to_string())),
        &mut model,
    );

    assert!(model.error_message.is_some());
    assert_eq!(model.form_values().len(), 1);
}

#[test]
fn replies_are_routed_to_pending_requests() {
    let app = AppTester::<App>::default();
    let mut model = Model::default();

    let _command = app.update(
        Event::Device(DeviceEvent::SendAction {
            action: "scan".to_string(),
            data: String::new(),
            expect_reply: true,
        }),
        &mut model,
    );
    receive(&app, &mut model, json!({"id": 1, "networks": ["home"]}));

    assert!(model.pending_requests.is_empty());
    let reply = model.last_reply.clone().unwrap();
    assert_eq!(reply.id, 1);
    assert_eq!(reply.action, "scan");
    assert!(model.device.tree().is_empty());
}

#[test]
fn unknown_replies_are_ignored() {
    let app = AppTester::<App>::default();
    let mut model = Model::default();

    receive(&app, &mut model, json!({"id": 42, "hostname": "espurna"}));

    assert_eq!(model.last_reply, None);
    assert!(model.device.tree().is_empty());
    assert_eq!(model.error_message, None);
}

#[test]
fn submit_sets_loading_until_saved() {
    let app = AppTester::<App>::default();
    let mut model = Model::default();
    receive(&app, &mut model, json!({"hostname": "espurna"}));

    let _command = app.update(
        Event::Device(DeviceEvent::SubmitSettings {
            values: r#"{"hostname": "kitchen"}"#.to_string(),
        }),
        &mut model,
    );
    assert!(model.is_loading);
    assert!(!model.settings_saved);

    receive(&app, &mut model, json!({"saved": true}));
    assert!(!model.is_loading);
    assert!(model.success_message.is_some());
}

#[test]
fn unchanged_submit_does_not_start_loading() {
    let app = AppTester::<App>::default();
    let mut model = Model::default();
    receive(&app, &mut model, json!({"hostname": "espurna"}));

    let _command = app.update(
        Event::Device(DeviceEvent::SubmitSettings {
            values: r#"{"hostname": "espurna"}"#.to_string(),
        }),
        &mut model,
    );

    assert!(!model.is_loading);
}

#[test]
fn send_error_is_reported() {
    let app = AppTester::<App>::default();
    let mut model = Model::default();

    let _command = app.update(
        Event::Socket(SocketEvent::SendResult(SocketOutput::Error {
            message: "socket closed".to_string(),
        })),
        &mut model,
    );

    assert_eq!(
        model.error_message.as_deref(),
        Some("Failed to send to device: socket closed")
    );
}

#[test]
fn disconnect_drops_pending_requests() {
    let app = AppTester::<App>::default();
    let mut model = Model {
        is_connected: true,
        ..Default::default()
    };
    model.track_request("scan");

    let _command = app.update(Event::Socket(SocketEvent::Disconnected), &mut model);

    assert!(!model.is_connected);
    assert!(model.pending_requests.is_empty());
}

#[test]
fn test_clear_error() {
    let app = AppTester::<App>::default();
    let mut model = Model {
        error_message: Some("Some error".to_string()),
        ..Default::default()
    };

    let _command = app.update(Event::Ui(UiEvent::ClearError), &mut model);

    assert_eq!(model.error_message, None);
}
