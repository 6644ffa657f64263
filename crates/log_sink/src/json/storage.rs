//! Ordered storage of the fields recorded on a [`JsonEvent`][super::JsonEvent].

use super::keys;

/// The key/value pairs recorded for an event, in the order they were recorded.
///
/// Duplicate keys are kept; the last one wins for most JSON consumers.
#[derive(Clone, Debug)]
pub(crate) struct Storage {
    include_caller: bool,
    values: Vec<(String, serde_json::Value)>,
}

impl Storage {
    /// Creates empty storage for a writer that writes the caller's file and line if
    /// `include_caller` is set.
    pub(crate) fn new(include_caller: bool) -> Self {
        Self {
            include_caller,
            values: Vec::new(),
        }
    }

    /// Records a key-value pair into the storage.
    ///
    /// If the `key` collides with an implicit field written by the writer, the value is recorded
    /// under the key prefixed with [`SHADOWED_PREFIX`][keys::SHADOWED_PREFIX].
    pub(crate) fn record_value(&mut self, key: &str, value: serde_json::Value) {
        let key = if keys::is_implicit(key, self.include_caller) {
            tracing::debug!(
                "Recording key `{key}` as `{}{key}`, it collides with an implicit field",
                keys::SHADOWED_PREFIX
            );
            format!("{}{key}", keys::SHADOWED_PREFIX)
        } else {
            key.to_owned()
        };
        self.values.push((key, value));
    }

    pub(crate) fn values(&self) -> &[(String, serde_json::Value)] {
        &self.values
    }
}
