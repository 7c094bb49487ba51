//! Encoding of saved state for transport, e.g. in a URL parameter.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use crate::error::{Result, WiringError};

/// A reversible text encoding.
pub trait Codec {
    fn compress(&self, input: &str) -> Result<String>;
    fn decompress(&self, encoded: &str) -> Result<String>;
}

/// Identity codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCodec;

impl Codec for PlainCodec {
    fn compress(&self, input: &str) -> Result<String> {
        Ok(input.to_string())
    }

    fn decompress(&self, encoded: &str) -> Result<String> {
        Ok(encoded.to_string())
    }
}

/// URL-safe base64 without padding.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Codec;

impl Codec for Base64Codec {
    fn compress(&self, input: &str) -> Result<String> {
        Ok(URL_SAFE_NO_PAD.encode(input.as_bytes()))
    }

    fn decompress(&self, encoded: &str) -> Result<String> {
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded.trim())
            .map_err(|e| WiringError::codec(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| WiringError::codec(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_is_url_safe() {
        let encoded = Base64Codec.compress("Pin 1\n??>>").unwrap();
        assert!(!encoded.contains('+') && !encoded.contains('/') && !encoded.contains('='));
        assert_eq!(Base64Codec.decompress(&encoded).unwrap(), "Pin 1\n??>>");
    }

    #[test]
    fn test_base64_rejects_garbage() {
        assert!(matches!(
            Base64Codec.decompress("not base64!"),
            Err(WiringError::CodecError { .. })
        ));
        // valid base64, invalid UTF-8
        assert!(Base64Codec.decompress("_w").is_err());
    }

    #[test]
    fn test_plain_codec() {
        assert_eq!(PlainCodec.decompress(&PlainCodec.compress("x").unwrap()).unwrap(), "x");
    }
}
