//! JSON pretty-printing

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;

/// Outcome of formatting: either the indented document or the parser message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatOutcome {
    Formatted(String),
    Invalid(String),
}

/// Re-indent `json_text` with four spaces, keeping key order
pub fn format_json(json_text: &str) -> FormatOutcome {
    let value: Value = match serde_json::from_str(json_text) {
        Ok(value) => value,
        Err(e) => return FormatOutcome::Invalid(e.to_string()),
    };

    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    if let Err(e) = value.serialize(&mut serializer) {
        return FormatOutcome::Invalid(e.to_string());
    }

    match String::from_utf8(buffer) {
        Ok(formatted) => FormatOutcome::Formatted(formatted),
        Err(e) => FormatOutcome::Invalid(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats_with_four_spaces_and_keeps_order() {
        let outcome = format_json(r#"{"b":1,"a":[true,null]}"#);
        assert_eq!(
            outcome,
            FormatOutcome::Formatted(
                "{\n    \"b\": 1,\n    \"a\": [\n        true,\n        null\n    ]\n}".to_string()
            )
        );
    }

    #[test]
    fn test_round_trip_preserves_value() {
        let input = r#"{"name":"tool","nested":{"n":1.5,"list":[1,2,3]}}"#;
        let FormatOutcome::Formatted(formatted) = format_json(input) else {
            panic!("expected formatted output");
        };
        let a: Value = serde_json::from_str(input).unwrap();
        let b: Value = serde_json::from_str(&formatted).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_numbers_keep_their_digits() {
        let input = r#"{"id": 123456789012345678901234567890, "price": 0.10000000000000000555}"#;
        let FormatOutcome::Formatted(formatted) = format_json(input) else {
            panic!("expected formatted output");
        };
        assert_eq!(
            formatted,
            "{\n    \"id\": 123456789012345678901234567890,\n    \"price\": 0.10000000000000000555\n}"
        );
    }

    #[test]
    fn test_invalid_json() {
        match format_json("{not json") {
            FormatOutcome::Invalid(details) => assert!(details.contains("line 1")),
            other => panic!("expected Invalid, got {:?}", other),
        }
    }
}
