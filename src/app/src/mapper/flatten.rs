use log::debug;
use std::collections::BTreeMap;

use super::mask::{Mask, MaskNode};
use super::value::{capitalize, Scalar, StateObject, StateValue};

/// Flat form-field name to scalar value
pub type FlatMap = BTreeMap<String, Scalar>;

/// One step from a state object into one of its children
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a scalar leaf inside the device state
pub type FieldPath = Vec<PathSegment>;

/// Flatten the device state into form-bindable keys.
///
/// Root-level keys are used verbatim, deeper keys are capitalized and appended
/// to their parent's name (`wifi.ssid` becomes `wifiSsid`). Inside array-typed
/// mask contexts the name stops growing and the row key is appended as a
/// suffix instead (`networks[1].ssid` becomes `ssid1`).
pub fn flatten(state: &StateObject, mask: &Mask) -> FlatMap {
    flatten_with(state, mask, "", "")
}

/// [`flatten`] starting from an explicit prefix and suffix
pub fn flatten_with(state: &StateObject, mask: &Mask, prefix: &str, suffix: &str) -> FlatMap {
    let mut flat = FlatMap::new();
    walk(state, mask, prefix, suffix, &mut |key: String, _: &[PathSegment], value: &Scalar| {
        flat.insert(key, value.clone());
    });
    flat
}

/// Every flat key together with the state path it was produced from.
///
/// Placeholder fields yield paths that do not exist in `state` yet.
pub fn flatten_paths(state: &StateObject, mask: &Mask) -> BTreeMap<String, FieldPath> {
    let mut paths = BTreeMap::new();
    walk(state, mask, "", "", &mut |key: String, path: &[PathSegment], _: &Scalar| {
        paths.insert(key, path.to_vec());
    });
    paths
}

type Visit<'f> = dyn FnMut(String, &[PathSegment], &Scalar) + 'f;

fn walk(state: &StateObject, mask: &Mask, prefix: &str, suffix: &str, visit: &mut Visit<'_>) {
    let mut path = Vec::new();
    walk_object(
        state,
        MaskContext::Object(mask),
        prefix,
        suffix,
        &mut path,
        visit,
    );
}

#[derive(Clone, Copy)]
enum MaskContext<'m> {
    None,
    Object(&'m Mask),
    Sequence(&'m [MaskNode]),
}

impl<'m> MaskContext<'m> {
    fn of(node: Option<&'m MaskNode>) -> Self {
        match node {
            Some(MaskNode::Shape(mask)) => MaskContext::Object(mask),
            Some(MaskNode::Sequence(nodes)) => MaskContext::Sequence(nodes),
            _ => MaskContext::None,
        }
    }

    fn lookup(&self, key: &str) -> Option<&'m MaskNode> {
        match self {
            MaskContext::None => None,
            MaskContext::Object(mask) => mask.get(key),
            MaskContext::Sequence(nodes) => key.parse::<usize>().ok().and_then(|i| nodes.get(i)),
        }
    }

    fn is_sequence(&self) -> bool {
        matches!(self, MaskContext::Sequence(_))
    }

    /// Name every field of an object level is published under
    fn path(&self) -> Option<&'m str> {
        match self {
            MaskContext::Object(mask) => mask.path(),
            _ => None,
        }
    }
}

fn walk_object(
    object: &StateObject,
    context: MaskContext<'_>,
    prefix: &str,
    suffix: &str,
    path: &mut FieldPath,
    visit: &mut Visit<'_>,
) {
    for (key, value) in object.iter() {
        let segment = PathSegment::Key(key.to_string());
        walk_entry(key, segment, Some(value), context, prefix, suffix, path, visit);
    }

    // fields the mask knows the shape of but the device did not send
    if let MaskContext::Object(mask) = context {
        for (key, node) in mask.entries() {
            if matches!(node, MaskNode::Shape(_)) && !object.contains_key(key) {
                let segment = PathSegment::Key(key.to_string());
                walk_entry(key, segment, None, context, prefix, suffix, path, visit);
            }
        }
    }
}

fn walk_list(
    items: &[StateValue],
    context: MaskContext<'_>,
    prefix: &str,
    suffix: &str,
    path: &mut FieldPath,
    visit: &mut Visit<'_>,
) {
    for (index, value) in items.iter().enumerate() {
        let key = index.to_string();
        let segment = PathSegment::Index(index);
        walk_entry(&key, segment, Some(value), context, prefix, suffix, path, visit);
    }
}

#[allow(clippy::too_many_arguments)]
fn walk_entry(
    key: &str,
    segment: PathSegment,
    value: Option<&StateValue>,
    context: MaskContext<'_>,
    prefix: &str,
    suffix: &str,
    path: &mut FieldPath,
    visit: &mut Visit<'_>,
) {
    let node = context.lookup(key);

    if node.is_some_and(MaskNode::is_excluded) {
        return;
    }

    let name_override = node.and_then(MaskNode::path_override).or(context.path());
    let name = match name_override {
        Some(name_override) => name_override.to_string(),
        None if prefix.is_empty() => key.to_string(),
        None => capitalize(key),
    };

    let placeholder;
    let value = match (value, node) {
        (Some(StateValue::Scalar(scalar)), Some(shape @ MaskNode::Shape(_))) => {
            debug!("shape mismatch at {prefix}{name}{suffix}: got scalar {scalar:?}");
            placeholder = shape.placeholder();
            placeholder.as_ref()
        }
        (Some(value), _) => Some(value),
        (None, Some(node)) => {
            placeholder = node.placeholder();
            placeholder.as_ref()
        }
        (None, None) => None,
    };

    let Some(value) = value else {
        return;
    };

    path.push(segment);

    match value {
        StateValue::Scalar(scalar) => visit(format!("{prefix}{name}{suffix}"), path, scalar),
        StateValue::Object(object) => {
            let (child, child_prefix, child_suffix) =
                descend(key, &name, node, context, prefix, suffix);
            walk_object(object, child, &child_prefix, &child_suffix, path, visit);
        }
        StateValue::List(items) => {
            let (child, child_prefix, child_suffix) =
                descend(key, &name, node, context, prefix, suffix);
            walk_list(items, child, &child_prefix, &child_suffix, path, visit);
        }
    }

    path.pop();
}

/// Mask context, prefix and suffix for the children of a nested value
fn descend<'m>(
    key: &str,
    name: &str,
    node: Option<&'m MaskNode>,
    context: MaskContext<'m>,
    prefix: &str,
    suffix: &str,
) -> (MaskContext<'m>, String, String) {
    if matches!(node, Some(MaskNode::Plain | MaskNode::PathOverride(_))) {
        debug!("shape mismatch at {prefix}{name}{suffix}: mask expects a scalar");
    }

    let child_prefix = if node.is_some_and(MaskNode::is_sequence) || context.is_sequence() {
        prefix.to_string()
    } else {
        format!("{prefix}{name}")
    };
    let child_suffix = if context.is_sequence() {
        format!("{suffix}{key}")
    } else {
        suffix.to_string()
    };

    (MaskContext::of(node), child_prefix, child_suffix)
}
