//! Shared type aliases and boundary coercion helpers.

/// All record ids are opaque strings (uuid v4, assigned at creation).
pub type RecordId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh record id.
pub fn new_id() -> RecordId {
    uuid::Uuid::new_v4().to_string()
}

/// Coerce a JSON value from the persistence collaborator into a [`Timestamp`].
///
/// The document store may hand back platform-specific timestamp wrappers,
/// nulls, or malformed strings. Anything that does not parse as RFC 3339
/// resolves to `fallback` (callers pass "now") rather than an error.
pub fn coerce_timestamp(value: &serde_json::Value, fallback: Timestamp) -> Timestamp {
    match value {
        serde_json::Value::String(s) => s
            .parse::<Timestamp>()
            .unwrap_or(fallback),
        _ => fallback,
    }
}
