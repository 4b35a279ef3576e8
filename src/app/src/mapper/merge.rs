use log::debug;

use super::list_block::{ListBlock, LIST_KEY, SCHEMA_KEY, START_KEY};
use super::value::{StateObject, StateValue};

/// Deep-merge a state fragment sent by the device into `target`.
///
/// Objects merge key by key. A list block is expanded against the list already
/// stored at the same place before it is merged, and its control keys are
/// dropped. Every other value replaces what `target` holds.
pub fn merge(target: &mut StateObject, fragment: StateObject) {
    for (key, value) in fragment {
        let StateValue::Object(mut object) = value else {
            target.insert(key, value);
            continue;
        };

        let slot = target.entry_or_insert_with(&key, || StateValue::Object(StateObject::new()));
        if slot.as_object().is_none() {
            debug!("replacing {slot:?} at {key} with an object");
            *slot = StateValue::Object(StateObject::new());
        }
        let Some(slot) = slot.as_object_mut() else {
            continue;
        };

        if let Some(block) = ListBlock::from_object(&object) {
            let existing = slot
                .get(LIST_KEY)
                .and_then(StateValue::as_list)
                .unwrap_or_default();
            let list = block.expand(existing);

            object.remove(SCHEMA_KEY);
            object.remove(START_KEY);
            object.insert(LIST_KEY, StateValue::List(list));
        }

        merge(slot, object);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn object(value: Value) -> StateObject {
        match StateValue::from(value) {
            StateValue::Object(object) => object,
            other => panic!("expected an object, got {other:?}"),
        }
    }

    #[test]
    fn merges_nested_sections() {
        let mut state = object(json!({"wifi": {"ssid": "home", "rssi": -70}, "hostname": "a"}));

        merge(&mut state, object(json!({"wifi": {"rssi": -60}})));

        assert_eq!(
            state,
            object(json!({"wifi": {"ssid": "home", "rssi": -60}, "hostname": "a"}))
        );
    }

    #[test]
    fn arrays_and_scalars_replace() {
        let mut state = object(json!({"relays": [true, false, true], "uptime": 10}));

        merge(&mut state, object(json!({"relays": [false], "uptime": 20})));

        assert_eq!(state, object(json!({"relays": [false], "uptime": 20})));
    }

    #[test]
    fn scalar_target_becomes_object() {
        let mut state = object(json!({"mqtt": 0}));

        merge(&mut state, object(json!({"mqtt": {"server": "broker"}})));

        assert_eq!(state, object(json!({"mqtt": {"server": "broker"}})));
    }

    #[test]
    fn list_blocks_are_expanded_and_spliced() {
        let mut state = object(json!({}));

        merge(
            &mut state,
            object(json!({"schedules": {
                "_schema": ["hour", "minute"],
                "list": [[1, 0], [2, 0], [3, 0]],
                "max": 10
            }})),
        );
        merge(
            &mut state,
            object(json!({"schedules": {
                "_schema": ["hour", "minute"],
                "list": [[7, 30]],
                "start": 1
            }})),
        );

        assert_eq!(
            state,
            object(json!({"schedules": {
                "list": [
                    {"hour": 1, "minute": 0},
                    {"hour": 7, "minute": 30},
                    {"hour": 3, "minute": 0}
                ],
                "max": 10
            }}))
        );
    }
}
