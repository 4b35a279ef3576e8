use log::debug;

use super::flatten::{flatten, flatten_paths, FlatMap, PathSegment};
use super::mask::Mask;
use super::value::{Scalar, StateObject, StateValue};

/// Write flat form values back into a copy of the last known device state.
///
/// Only values that differ from what [`flatten`] yields for `original` are
/// written. A changed key is stored at the leaf it was flattened from; keys
/// without such a leaf (dynamically added rows) become new top-level entries.
pub fn unflatten(flat: &FlatMap, original: &StateObject, mask: &Mask) -> StateObject {
    let current = flatten(original, mask);
    let paths = flatten_paths(original, mask);
    let mut updated = original.clone();

    for (key, value) in flat {
        if current.get(key) == Some(value) {
            continue;
        }

        match paths.get(key) {
            Some(path) => assign_field(&mut updated, path, value.clone()),
            None => {
                updated.insert(key.clone(), value.clone());
            }
        }
    }

    updated
}

/// The subset of [`unflatten`]'s result that differs from `original`.
///
/// Nested objects only carry their changed fields, a list that changed in
/// any row is sent whole. An unchanged form yields an empty object.
pub fn changed_payload(flat: &FlatMap, original: &StateObject, mask: &Mask) -> StateObject {
    let updated = unflatten(flat, original, mask);
    diff(original, &updated)
}

fn diff(original: &StateObject, updated: &StateObject) -> StateObject {
    updated
        .iter()
        .filter_map(|(key, value)| match (original.get(key), value) {
            (Some(before), after) if before == after => None,
            (Some(StateValue::Object(before)), StateValue::Object(after)) => {
                Some((key, StateValue::Object(diff(before, after))))
            }
            _ => Some((key, value.clone())),
        })
        .collect()
}

fn assign_field(object: &mut StateObject, path: &[PathSegment], value: Scalar) {
    match path.split_first() {
        Some((PathSegment::Key(key), rest)) => {
            assign(object.entry_or_insert_with(key, StateValue::default), rest, value)
        }
        Some((PathSegment::Index(index), _)) => {
            debug!("cannot address row {index} of an object");
        }
        None => {}
    }
}

fn assign(slot: &mut StateValue, path: &[PathSegment], value: Scalar) {
    let Some((segment, rest)) = path.split_first() else {
        *slot = StateValue::Scalar(value);
        return;
    };

    match (slot, segment) {
        (StateValue::Object(object), PathSegment::Key(_)) => assign_field(object, path, value),
        (StateValue::List(items), PathSegment::Index(index)) => match items.get_mut(*index) {
            Some(item) => assign(item, rest, value),
            None => debug!("dropping value for missing row {index}"),
        },
        (slot, PathSegment::Key(_)) => {
            debug!("replacing {slot:?} with an object to hold a placeholder field");
            let mut object = StateObject::new();
            assign_field(&mut object, path, value);
            *slot = StateValue::Object(object);
        }
        (slot, PathSegment::Index(index)) => {
            debug!("dropping value for row {index} of non-list {slot:?}");
        }
    }
}
