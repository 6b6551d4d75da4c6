use serde_json::{Map, Value};

/// A structured log event: string keys, arbitrary JSON values.
pub type Record = Map<String, Value>;

/// Key used when a line could not be structured.
pub const LOG_KEY: &str = "log";

/// Wraps a raw line as `{"log": "<line>"}` in a newly allocated record.
///
/// Invalid UTF-8 is replaced rather than rejected so no input is dropped.
pub fn unstructured_record(raw: &[u8]) -> Record {
    let mut record = Record::new();
    record.insert(
        LOG_KEY.to_string(),
        Value::String(String::from_utf8_lossy(raw).into_owned()),
    );
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unstructured_record_has_single_log_key() {
        let record = unstructured_record(b"plain text line\n");

        assert_eq!(record.len(), 1);
        assert_eq!(record[LOG_KEY], "plain text line\n");
    }

    #[test]
    fn test_unstructured_record_with_invalid_utf8() {
        let record = unstructured_record(&[b'o', b'k', 0xff, b'!']);

        assert_eq!(record.len(), 1);
        assert_eq!(record[LOG_KEY], "ok\u{fffd}!");
    }
}
