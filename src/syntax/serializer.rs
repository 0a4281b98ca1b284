//! Block-style text rendering of [`Value`] trees.

use tracing::warn;

use crate::value::Value;

/// Serializes `value` as block-style text that [`parse`](super::parse) reads
/// back to an equal tree.
///
/// # Example
///
/// ```rust
/// use docweave::{syntax, Value};
///
/// let value: Value = vec![("title", Value::from("A")), ("count", Value::from(2i64))]
///     .into_iter()
///     .collect();
/// assert_eq!(syntax::serialize(&value), "title: A\ncount: 2\n");
/// ```
pub fn serialize(value: &Value) -> String {
    match serde_yaml::to_string(value) {
        Ok(text) => text,
        Err(err) => {
            warn!(error = %err, "failed to serialize tree");
            String::new()
        }
    }
}
