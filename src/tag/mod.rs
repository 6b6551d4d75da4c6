//! Routing tag derivation.
//!
//! Ex: prefix = "app", keys = ["level", "requestType"]
//! record = {"level": "info", "requestType": "post", "path": "/enroll"}
//! tag will be "app.info.post"

use crate::domain::Record;
use crate::parser::ParsePath;
use serde_json::Value;
use std::fmt;

/// Builds a tag from the raw line and the configured prefix.
///
/// Must return a non-empty tag for every input.
pub type TagConstructor = Box<dyn Fn(&[u8], &str) -> String + Send + Sync>;

/// Boxes a closure as a [`TagConstructor`].
pub fn tag_constructor<F>(f: F) -> TagConstructor
where
    F: Fn(&[u8], &str) -> String + Send + Sync + 'static,
{
    Box::new(f)
}

pub enum TagStrategy {
    /// Record keys whose values are appended to the prefix, in order.
    Keys(Vec<String>),
    /// Used for every line, overriding key lookup.
    Constructor(TagConstructor),
}

impl TagStrategy {
    pub fn keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TagStrategy::Keys(keys.into_iter().map(Into::into).collect())
    }

    pub fn constructor<F>(f: F) -> Self
    where
        F: Fn(&[u8], &str) -> String + Send + Sync + 'static,
    {
        TagStrategy::Constructor(tag_constructor(f))
    }

    /// Derives the tag for one line.
    ///
    /// Unstructured lines only get the prefix unless a constructor is set.
    pub fn derive(&self, prefix: &str, raw: &[u8], path: ParsePath, record: &Record) -> String {
        match self {
            TagStrategy::Constructor(construct) => {
                let tag = construct(raw, prefix);
                if tag.is_empty() {
                    tracing::warn!(
                        target: "fluent_writer",
                        prefix,
                        "tag constructor returned an empty tag, using prefix"
                    );
                    prefix.to_string()
                } else {
                    tag
                }
            }
            TagStrategy::Keys(_) if path == ParsePath::Unstructured => prefix.to_string(),
            TagStrategy::Keys(keys) => tag_from_keys(prefix, keys, record),
        }
    }
}

impl Default for TagStrategy {
    fn default() -> Self {
        TagStrategy::Keys(Vec::new())
    }
}

impl fmt::Debug for TagStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagStrategy::Keys(keys) => f.debug_tuple("Keys").field(keys).finish(),
            TagStrategy::Constructor(_) => f.write_str("Constructor(..)"),
        }
    }
}

/// Appends `.value` for each key present in the record; absent keys are skipped.
pub fn tag_from_keys(prefix: &str, keys: &[String], record: &Record) -> String {
    let mut tag = prefix.to_string();
    for key in keys {
        if let Some(value) = record.get(key) {
            tag.push('.');
            tag.push_str(&tag_segment(value));
        }
    }
    tag
}

/// Convert JSON value to string without quotes for primitives.
pub fn tag_segment(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => value.to_string(), // For arrays and objects, use JSON representation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_tag_from_present_key() {
        let strategy = TagStrategy::keys(["level"]);
        let rec = record(json!({"level": "info", "path": "/"}));

        let tag = strategy.derive("app", b"", ParsePath::Structured, &rec);
        assert_eq!(tag, "app.info");
    }

    #[test]
    fn test_tag_from_missing_key_is_prefix() {
        let strategy = TagStrategy::keys(["level"]);
        let rec = record(json!({"path": "/"}));

        let tag = strategy.derive("app", b"", ParsePath::Structured, &rec);
        assert_eq!(tag, "app");
    }

    #[test]
    fn test_keys_applied_in_order() {
        let strategy = TagStrategy::keys(["level", "requestType"]);
        let rec = record(json!({"requestType": "post", "level": "info", "path": "/enroll"}));

        let tag = strategy.derive("app", b"", ParsePath::Normalized, &rec);
        assert_eq!(tag, "app.info.post");
    }

    #[test]
    fn test_no_keys_is_prefix() {
        let strategy = TagStrategy::default();
        let rec = record(json!({"level": "info"}));

        assert_eq!(strategy.derive("app", b"", ParsePath::Structured, &rec), "app");
    }

    #[test]
    fn test_unstructured_ignores_keys() {
        let strategy = TagStrategy::keys(["log"]);
        let rec = record(json!({"log": "plain"}));

        assert_eq!(strategy.derive("app", b"plain", ParsePath::Unstructured, &rec), "app");
    }

    #[test]
    fn test_segments_for_non_string_values() {
        assert_eq!(tag_segment(&json!(200)), "200");
        assert_eq!(tag_segment(&json!(1.5)), "1.5");
        assert_eq!(tag_segment(&json!(-3)), "-3");
        assert_eq!(tag_segment(&json!(true)), "true");
        assert_eq!(tag_segment(&json!(null)), "null");
        assert_eq!(tag_segment(&json!(["a", 1])), r#"["a",1]"#);
        assert_eq!(tag_segment(&json!({"k": "v"})), r#"{"k":"v"}"#);
    }

    #[test]
    fn test_constructor_overrides_keys_on_every_path() {
        let strategy = TagStrategy::constructor(|raw, prefix| {
            let msg = String::from_utf8_lossy(raw);
            if msg.contains("error") {
                format!("{prefix}.error")
            } else {
                format!("{prefix}.logs")
            }
        });
        let rec = record(json!({"level": "info"}));

        assert_eq!(
            strategy.derive("app", br#"{"level":"error"}"#, ParsePath::Structured, &rec),
            "app.error"
        );
        assert_eq!(
            strategy.derive("app", b"hello", ParsePath::Unstructured, &rec),
            "app.logs"
        );
    }

    #[test]
    fn test_empty_constructor_tag_falls_back_to_prefix() {
        let strategy = TagStrategy::constructor(|_, _| String::new());
        let rec = Record::new();

        assert_eq!(strategy.derive("app", b"x", ParsePath::Unstructured, &rec), "app");
    }

    #[test]
    fn test_debug_hides_constructor() {
        let strategy = TagStrategy::constructor(|_, p| p.to_string());
        assert_eq!(format!("{strategy:?}"), "Constructor(..)");
        assert_eq!(format!("{:?}", TagStrategy::keys(["a"])), r#"Keys(["a"])"#);
    }
}
