use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A leaf value of the device state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum Scalar {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Scalar::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl TryFrom<Value> for Scalar {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Scalar::Null),
            Value::Bool(b) => Ok(Scalar::Bool(b)),
            Value::Number(n) => Ok(Scalar::Number(n)),
            Value::String(s) => Ok(Scalar::String(s)),
            Value::Array(_) | Value::Object(_) => {
                Err("expected a scalar, found a nested structure".to_string())
            }
        }
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(b),
            Scalar::Number(n) => Value::Number(n),
            Scalar::String(s) => Value::String(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n.into())
    }
}

impl From<u64> for Scalar {
    fn from(n: u64) -> Self {
        Scalar::Number(n.into())
    }
}

/// A node of the device-state tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum StateValue {
    Scalar(Scalar),
    Object(StateObject),
    List(Vec<StateValue>),
}

impl Default for StateValue {
    fn default() -> Self {
        StateValue::Scalar(Scalar::Null)
    }
}

impl StateValue {
    pub fn as_object(&self) -> Option<&StateObject> {
        match self {
            StateValue::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut StateObject> {
        match self {
            StateValue::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[StateValue]> {
        match self {
            StateValue::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            StateValue::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }
}

impl From<Value> for StateValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => StateValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => StateValue::Object(map.into()),
            Value::Null => StateValue::Scalar(Scalar::Null),
            Value::Bool(b) => StateValue::Scalar(Scalar::Bool(b)),
            Value::Number(n) => StateValue::Scalar(Scalar::Number(n)),
            Value::String(s) => StateValue::Scalar(Scalar::String(s)),
        }
    }
}

impl From<StateValue> for Value {
    fn from(value: StateValue) -> Self {
        match value {
            StateValue::Scalar(scalar) => scalar.into(),
            StateValue::Object(object) => Value::Object(object.into()),
            StateValue::List(items) => Value::Array(items.into_iter().map(Into::into).collect()),
        }
    }
}

impl From<Scalar> for StateValue {
    fn from(scalar: Scalar) -> Self {
        StateValue::Scalar(scalar)
    }
}

impl From<StateObject> for StateValue {
    fn from(object: StateObject) -> Self {
        StateValue::Object(object)
    }
}

/// Insertion-ordered mapping of field names to state nodes.
///
/// Keys are unique; inserting an existing key replaces its value in place.
/// Equality ignores key order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct StateObject {
    entries: Vec<(String, StateValue)>,
}

impl StateObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&StateValue> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut StateValue> {
        self.position(key).map(move |i| &mut self.entries[i].1)
    }

    /// Insert or replace, returning the previous value
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<StateValue>,
    ) -> Option<StateValue> {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<StateValue> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    /// Returns the value for `key`, inserting the result of `default` first when missing
    pub fn entry_or_insert_with(
        &mut self,
        key: &str,
        default: impl FnOnce() -> StateValue,
    ) -> &mut StateValue {
        let index = match self.position(key) {
            Some(i) => i,
            None => {
                self.entries.push((key.to_string(), default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StateValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }
}

impl PartialEq for StateObject {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl Eq for StateObject {}

impl<K: Into<String>, V: Into<StateValue>> FromIterator<(K, V)> for StateObject {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut object = StateObject::new();
        for (k, v) in iter {
            object.insert(k, v);
        }
        object
    }
}

impl IntoIterator for StateObject {
    type Item = (String, StateValue);
    type IntoIter = std::vec::IntoIter<(String, StateValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl From<Map<String, Value>> for StateObject {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl From<StateObject> for Map<String, Value> {
    fn from(object: StateObject) -> Self {
        object
            .entries
            .into_iter()
            .map(|(k, v)| (k, Value::from(v)))
            .collect()
    }
}

/// Upper-case the first character if it is an ASCII letter
pub fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
