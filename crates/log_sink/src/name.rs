//! Hierarchical logger names.

/// Appends `segment` to `existing`, joined by `separator`.
///
/// An empty `existing` name yields `segment` unchanged. Segments are expected not to contain the
/// separator themselves; this is not checked.
pub(crate) fn join(existing: &str, separator: &str, segment: &str) -> String {
    if existing.is_empty() {
        segment.to_owned()
    } else {
        let mut name = String::with_capacity(existing.len() + separator.len() + segment.len());
        name.push_str(existing);
        name.push_str(separator);
        name.push_str(segment);
        name
    }
}
