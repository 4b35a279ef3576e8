//! Flattening masks.
//!
//! A mask mirrors (a subset of) the device state and tells the flattener which
//! fields to skip, which fields must surface even when the device did not send
//! them, and which fields are published under a different name.
//!
//! Masks are usually written by hand in the UI field schema using the legacy
//! JSON convention, see [`Mask::from_json`].

use serde_json::Value;

use super::value::{StateObject, StateValue};

/// Key prefix marking an excluded sibling in the legacy JSON form
pub const EXCLUSION_MARKER: char = '_';

/// Legacy JSON key renaming every field of the object it appears in
pub const PATH_KEY: &str = "_path";

/// Rule attached to a single field of a mask
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskNode {
    /// Never flattened, never recursed into
    Excluded,
    /// Known field without special handling
    Plain,
    /// Published under the given name instead of the computed one
    PathOverride(String),
    /// Nested object: sub-mask and placeholder shape in one
    Shape(Mask),
    /// Array-typed context, looked up by row index
    Sequence(Vec<MaskNode>),
}

impl MaskNode {
    /// Parse a single legacy JSON mask value
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(_) => MaskNode::Shape(Mask::from_json(value)),
            Value::Array(items) => MaskNode::Sequence(items.iter().map(Self::from_json).collect()),
            _ => MaskNode::Plain,
        }
    }

    pub fn path_override(&self) -> Option<&str> {
        match self {
            MaskNode::PathOverride(path) => Some(path),
            _ => None,
        }
    }

    pub fn is_excluded(&self) -> bool {
        matches!(self, MaskNode::Excluded)
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, MaskNode::Sequence(_))
    }

    /// Null-filled stand-in for a field the device did not send.
    ///
    /// Only nested shapes have a placeholder; anything else is simply missing.
    pub fn placeholder(&self) -> Option<StateValue> {
        match self {
            MaskNode::Shape(mask) => Some(StateValue::Object(mask.placeholder())),
            _ => None,
        }
    }
}

/// Mask for one object level of the device state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mask {
    path: Option<String>,
    entries: Vec<(String, MaskNode)>,
}

impl Mask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: publish every field of this level under `path`
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Builder: attach a rule to `key`
    pub fn with(mut self, key: impl Into<String>, node: MaskNode) -> Self {
        self.set(key.into(), node);
        self
    }

    /// Builder: exclude `key`
    pub fn exclude(self, key: impl Into<String>) -> Self {
        self.with(key, MaskNode::Excluded)
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&MaskNode> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, n)| n)
    }

    pub fn is_excluded(&self, key: &str) -> bool {
        self.get(key).is_some_and(MaskNode::is_excluded)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &MaskNode)> {
        self.entries.iter().map(|(k, n)| (k.as_str(), n))
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_none() && self.entries.is_empty()
    }

    /// Parse the legacy JSON mask convention.
    ///
    /// - `"_key": <any>` excludes the sibling `key`
    /// - `"_path": "name"` publishes every field of this object under `name`
    /// - nested objects become [`MaskNode::Shape`], arrays [`MaskNode::Sequence`]
    /// - every other value is a [`MaskNode::Plain`] field
    ///
    /// A value that is not an object yields an empty mask.
    pub fn from_json(value: &Value) -> Self {
        let mut mask = Mask::new();

        let Value::Object(map) = value else {
            return mask;
        };

        for (key, value) in map {
            if key == PATH_KEY {
                if let Value::String(path) = value {
                    mask.path = Some(path.clone());
                }
                continue;
            }

            match key.strip_prefix(EXCLUSION_MARKER) {
                Some(excluded) => mask.set(excluded.to_string(), MaskNode::Excluded),
                None => mask.set(key.clone(), MaskNode::from_json(value)),
            }
        }

        mask
    }

    /// Object with every non-excluded field of this mask set to null
    pub fn placeholder(&self) -> StateObject {
        self.entries
            .iter()
            .filter_map(|(key, node)| {
                let value = match node {
                    MaskNode::Excluded => return None,
                    MaskNode::Plain | MaskNode::PathOverride(_) => StateValue::default(),
                    MaskNode::Shape(mask) => StateValue::Object(mask.placeholder()),
                    MaskNode::Sequence(_) => StateValue::List(Vec::new()),
                };
                Some((key.clone(), value))
            })
            .collect()
    }

    // exclusion always wins over a field rule for the same key
    fn set(&mut self, key: String, node: MaskNode) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) if existing.is_excluded() => {}
            Some((_, existing)) => *existing = node,
            None => self.entries.push((key, node)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::value::Scalar;
    use serde_json::json;

    #[test]
    fn legacy_json_marks_exclusions() {
        let mask = Mask::from_json(&json!({"_rssi": 1, "ssid": 1}));

        assert!(mask.is_excluded("rssi"));
        assert!(!mask.is_excluded("ssid"));
        assert_eq!(mask.get("ssid"), Some(&MaskNode::Plain));
    }

    #[test]
    fn exclusion_wins_regardless_of_key_order() {
        let before = Mask::from_json(&json!({"_pass": 1, "pass": 1}));
        let after = Mask::from_json(&json!({"pass": 1, "_pass": 1}));

        assert!(before.is_excluded("pass"));
        assert!(after.is_excluded("pass"));
    }

    #[test]
    fn legacy_json_nests_shapes_and_sequences() {
        let mask = Mask::from_json(&json!({
            "wifi": {"_path": "net", "ssid": 1},
            "networks": [{"ssid": 1}]
        }));

        let Some(MaskNode::Shape(wifi)) = mask.get("wifi") else {
            panic!("wifi should be a shape");
        };
        assert_eq!(wifi.path(), Some("net"));
        assert_eq!(mask.path(), None);
        assert_eq!(mask.get("wifi").and_then(MaskNode::path_override), None);
        assert!(mask.get("networks").is_some_and(MaskNode::is_sequence));
    }

    #[test]
    fn non_object_json_gives_empty_mask() {
        assert!(Mask::from_json(&json!(42)).is_empty());
    }

    #[test]
    fn placeholder_nulls_leaves_and_drops_exclusions() {
        let mask = Mask::new()
            .with("bar", MaskNode::Plain)
            .exclude("secret")
            .with("inner", MaskNode::Shape(Mask::new().with("x", MaskNode::Plain)));

        let placeholder = mask.placeholder();

        assert_eq!(placeholder.keys().collect::<Vec<_>>(), vec!["bar", "inner"]);
        assert_eq!(placeholder.get("bar"), Some(&StateValue::Scalar(Scalar::Null)));
        assert_eq!(
            placeholder
                .get("inner")
                .and_then(StateValue::as_object)
                .and_then(|inner| inner.get("x")),
            Some(&StateValue::Scalar(Scalar::Null))
        );
    }

    #[test]
    fn sequences_only_become_empty_lists_inside_a_shape() {
        let networks = MaskNode::Sequence(vec![MaskNode::Plain]);
        let mask = Mask::new().with("networks", networks.clone());

        assert_eq!(networks.placeholder(), None);
        assert_eq!(mask.placeholder().get("networks"), Some(&StateValue::List(Vec::new())));
    }
}
