//! State Mapper
//!
//! Converts between the nested device state sent over the WebSocket and the
//! flat keys the settings forms bind to:
//! - value: typed device-state tree
//! - mask: exclusion, placeholder and renaming rules
//! - flatten: nested state to flat form keys
//! - list_block: positional rows plus schema to named rows
//! - merge: incremental state fragments into the session tree
//! - unflatten: flat form values back into a nested change payload
//!
//! None of these operations fail. Mismatches between mask and state degrade to
//! missing or null fields and are only logged at debug level.

pub mod flatten;
pub mod list_block;
pub mod mask;
pub mod merge;
pub mod unflatten;
pub mod value;

pub use flatten::{flatten, flatten_paths, flatten_with, FieldPath, FlatMap, PathSegment};
pub use list_block::{expand_list_block, expand_rows, ListBlock};
pub use mask::{Mask, MaskNode};
pub use merge::merge;
pub use unflatten::{changed_payload, unflatten};
pub use value::{capitalize, Scalar, StateObject, StateValue};
