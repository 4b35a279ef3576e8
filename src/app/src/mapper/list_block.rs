use log::debug;

use super::value::{Scalar, StateObject, StateValue};

/// Wire key holding the column names of a list block
pub const SCHEMA_KEY: &str = "_schema";

/// Wire key holding the positional rows of a list block
pub const LIST_KEY: &str = "list";

/// Wire key holding the row offset of a partial list block
pub const START_KEY: &str = "start";

/// Positional rows plus the schema naming their columns.
///
/// On the wire this is an object such as
/// `{"_schema": ["name", "pin"], "list": [["led", 2], ["relay", 12]], "start": 0}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListBlock {
    pub schema: Vec<String>,
    pub rows: Vec<StateValue>,
    pub start: Option<usize>,
}

impl ListBlock {
    /// Recognise a list block, `None` when `object` is an ordinary object
    pub fn from_object(object: &StateObject) -> Option<Self> {
        let schema = object
            .get(SCHEMA_KEY)?
            .as_list()?
            .iter()
            .map(|name| name.as_scalar().and_then(Scalar::as_str).map(str::to_string))
            .collect::<Option<Vec<_>>>()?;

        let rows = object.get(LIST_KEY)?.as_list()?.to_vec();

        let start = object
            .get(START_KEY)
            .and_then(StateValue::as_scalar)
            .and_then(Scalar::as_u64)
            .and_then(|start| usize::try_from(start).ok());

        Some(Self {
            schema,
            rows,
            start,
        })
    }

    /// Named rows for this block, spliced into `existing` when the block is partial
    pub fn expand(&self, existing: &[StateValue]) -> Vec<StateValue> {
        expand_list_block(&self.schema, &self.rows, self.start, existing)
    }
}

/// Turn positional rows into named objects.
///
/// Each row is zipped with `schema`: short rows leave the trailing names unset
/// and values beyond the schema are dropped. Rows that are already objects are
/// kept as they are, so expanding an expanded list changes nothing.
pub fn expand_rows(schema: &[String], rows: &[StateValue]) -> Vec<StateValue> {
    rows.iter()
        .filter_map(|row| match row {
            StateValue::List(values) => Some(StateValue::Object(
                schema
                    .iter()
                    .zip(values)
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect(),
            )),
            StateValue::Object(_) => Some(row.clone()),
            StateValue::Scalar(scalar) => {
                debug!("skipping list block row that is not an array: {scalar:?}");
                None
            }
        })
        .collect()
}

/// Expand a list block against the list the UI already knows.
///
/// Without an offset (or with offset 0) the expanded rows are the whole list.
/// With an offset the rows replace `existing` from that index on, leaving the
/// entries before and after the replaced span untouched. An offset past the end
/// of `existing` appends.
pub fn expand_list_block(
    schema: &[String],
    rows: &[StateValue],
    start: Option<usize>,
    existing: &[StateValue],
) -> Vec<StateValue> {
    let expanded = expand_rows(schema, rows);

    match start {
        Some(start) if start > 0 => {
            let mut list = existing.to_vec();
            let start = start.min(list.len());
            let end = (start + expanded.len()).min(list.len());
            list.splice(start..end, expanded);
            list
        }
        _ => expanded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::{flatten, Mask};
    use serde_json::{json, Value};

    fn values(value: Value) -> Vec<StateValue> {
        match StateValue::from(value) {
            StateValue::List(items) => items,
            other => panic!("expected a list, got {other:?}"),
        }
    }

    fn schema(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn zips_rows_with_schema() {
        let rows = values(json!([[1, 2, 3], [4, 5, 6]]));

        let result = expand_list_block(&schema(&["a", "b", "c"]), &rows, None, &[]);

        assert_eq!(
            result,
            values(json!([{"a": 1, "b": 2, "c": 3}, {"a": 4, "b": 5, "c": 6}]))
        );
    }

    #[test]
    fn short_rows_leave_trailing_fields_unset() {
        let rows = values(json!([[1], [2, 3, 4, 5]]));

        let result = expand_rows(&schema(&["a", "b", "c"]), &rows);

        assert_eq!(result, values(json!([{"a": 1}, {"a": 2, "b": 3, "c": 4}])));
    }

    #[test]
    fn offset_splices_into_existing_list() {
        let existing = values(json!([{"a": 0}, {"a": 1}, {"a": 2}, {"a": 3}, {"a": 4}]));
        let rows = values(json!([["x"]]));

        let result = expand_list_block(&schema(&["a"]), &rows, Some(2), &existing);

        assert_eq!(
            result,
            values(json!([{"a": 0}, {"a": 1}, {"a": "x"}, {"a": 3}, {"a": 4}]))
        );
    }

    #[test]
    fn offset_past_the_end_appends() {
        let existing = values(json!([{"a": 0}]));
        let rows = values(json!([["x"], ["y"]]));

        let result = expand_list_block(&schema(&["a"]), &rows, Some(4), &existing);

        assert_eq!(result, values(json!([{"a": 0}, {"a": "x"}, {"a": "y"}])));
    }

    #[test]
    fn zero_offset_replaces_the_whole_list() {
        let existing = values(json!([{"a": 0}, {"a": 1}, {"a": 2}]));
        let rows = values(json!([["x"]]));

        let result = expand_list_block(&schema(&["a"]), &rows, Some(0), &existing);

        assert_eq!(result, values(json!([{"a": "x"}])));
    }

    #[test]
    fn expansion_is_idempotent_through_flatten() {
        let names = schema(&["ssid", "pass"]);
        let rows = values(json!([["home", "a"], ["work", "b"]]));
        let mask = Mask::new();

        let once = expand_rows(&names, &rows);
        let twice = expand_rows(&names, &once);

        let as_state = |rows: Vec<StateValue>| -> StateObject {
            [("networks", StateValue::List(rows))].into_iter().collect()
        };

        assert_eq!(once, twice);
        assert_eq!(
            flatten(&as_state(once), &mask),
            flatten(&as_state(twice), &mask)
        );
    }

    #[test]
    fn recognises_wire_block() {
        let object = match StateValue::from(json!({
            "_schema": ["name", "pin"],
            "list": [["led", 2]],
            "start": 3,
            "max": 8
        })) {
            StateValue::Object(object) => object,
            other => panic!("expected an object, got {other:?}"),
        };

        let block = ListBlock::from_object(&object).unwrap();

        assert_eq!(block.schema, schema(&["name", "pin"]));
        assert_eq!(block.rows, values(json!([["led", 2]])));
        assert_eq!(block.start, Some(3));
    }

    #[test]
    fn ordinary_objects_are_not_blocks() {
        let object = match StateValue::from(json!({"list": [1, 2]})) {
            StateValue::Object(object) => object,
            other => panic!("expected an object, got {other:?}"),
        };

        assert!(ListBlock::from_object(&object).is_none());
    }
}
