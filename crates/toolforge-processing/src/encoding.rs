//! Base64 helpers

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{ConversionError, ConversionResult};

pub fn encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode standard base64, ignoring embedded whitespace
pub fn decode(encoded: &str) -> ConversionResult<Vec<u8>> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ConversionError::InvalidParameter(format!("Invalid base64 input: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let data = b"\x00\x01binary\xffdata";
        assert_eq!(decode(&encode(data)).unwrap(), data);
    }

    #[test]
    fn test_known_values() {
        assert_eq!(encode(b"hello"), "aGVsbG8=");
        assert_eq!(decode("aGVs\nbG8=\n").unwrap(), b"hello");
    }

    #[test]
    fn test_invalid_input() {
        assert!(decode("not*base64").unwrap_err().is_client_error());
        assert!(decode("aGVsbG8").is_err());
    }
}
