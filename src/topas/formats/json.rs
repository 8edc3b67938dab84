//! Tagged-tuple JSON codec
//!
//! Every node serializes to a JSON array whose first element is the node's
//! tag from [`NodeKind`], followed by its fields. Parameters carry a record
//! object instead of positional fields, and a bare JSON string is a quoted
//! string statement.
//!
//! Verbose mode is exact: `unserialize(serialize(tree)) == tree`. Compact
//! mode replaces names, values, equations and formulas with their source text
//! and cannot be read back into the same tree.
//!
//! Unserialize checks shapes only. The first failed check is reported with
//! the fragment it was applied to; nothing is coerced.

mod formula;
mod parameter;
mod statements;

use serde_json::Value;

use crate::topas::ast::{NodeKind, ReconstructError, Root};
use crate::topas::options::SerializeMode;

/// Conversion between a node and its tagged-tuple form
pub trait Serializable: Sized {
    fn serialize_with(&self, mode: SerializeMode) -> Value;

    fn serialize(&self) -> Value {
        self.serialize_with(SerializeMode::Verbose)
    }

    fn unserialize(data: &Value) -> Result<Self, ReconstructError>;
}

/// Serialize a whole document
pub fn serialize(root: &Root, mode: SerializeMode) -> Value {
    root.serialize_with(mode)
}

/// Rebuild a document from its verbose tuple form
pub fn unserialize(data: &Value) -> Result<Root, ReconstructError> {
    Root::unserialize(data)
}

/// Kind named by the tag of `data`
pub(crate) fn kind_of(data: &Value, expected: &str) -> Result<NodeKind, ReconstructError> {
    let items = elements(data, expected)?;
    match items.first() {
        None => Err(ReconstructError::arity("len >= 1", data)),
        Some(Value::String(tag)) => {
            NodeKind::from_tag(tag).ok_or_else(|| ReconstructError::tag(expected, data))
        }
        Some(_) => Err(ReconstructError::field("type(data[0]) == str", data)),
    }
}

/// Array elements of `data`
fn elements<'a>(data: &'a Value, expected: &str) -> Result<&'a [Value], ReconstructError> {
    data.as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| ReconstructError::field(format!("{} as an array", expected), data))
}

/// Elements of a tuple tagged `kind`, tag included
pub(crate) fn tuple(data: &Value, kind: NodeKind) -> Result<&[Value], ReconstructError> {
    let expected = format!("data[0] == {:?}", kind.tag());
    let items = elements(data, &expected)?;
    match items.first() {
        None => Err(ReconstructError::arity("len >= 1", data)),
        Some(Value::String(tag)) if tag == kind.tag() => Ok(items),
        Some(_) => Err(ReconstructError::tag(expected, data)),
    }
}

/// Tuple length check; `max` of `None` leaves the length unbounded
pub(crate) fn check_len(
    data: &Value,
    items: &[Value],
    min: usize,
    max: Option<usize>,
) -> Result<(), ReconstructError> {
    let len = items.len();
    if len >= min && max.map_or(true, |max| len <= max) {
        return Ok(());
    }
    let expected = match max {
        Some(max) if max == min => format!("len == {}", min),
        Some(max) => format!("{} <= len <= {}", min, max),
        None => format!("len >= {}", min),
    };
    Err(ReconstructError::arity(expected, data))
}

pub(crate) fn string_at<'a>(
    data: &Value,
    items: &'a [Value],
    idx: usize,
) -> Result<&'a str, ReconstructError> {
    items
        .get(idx)
        .and_then(Value::as_str)
        .ok_or_else(|| ReconstructError::field(format!("type(data[{}]) == str", idx), data))
}

pub(crate) fn array_at<'a>(
    data: &Value,
    items: &'a [Value],
    idx: usize,
) -> Result<&'a [Value], ReconstructError> {
    items
        .get(idx)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| ReconstructError::field(format!("type(data[{}]) == list", idx), data))
}
