//! Encoded image payloads.
//!
//! Every image crossing the API boundary travels as base64 with its MIME type
//! alongside, so the backend can vary the format. [`ImageData`] backs both the
//! sketch and the style-reference roles.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("not a data URI")]
    NotADataUri,

    #[error("data URI has no base64 payload")]
    MissingPayload,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// An encoded raster image: base64 payload plus MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    pub base64: String,
    pub mime_type: String,
}

impl ImageData {
    /// Encode raw bytes under the given MIME type.
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            base64: STANDARD.encode(bytes),
            mime_type: mime_type.into(),
        }
    }

    /// Parse a `data:<mime>;base64,<payload>` URI.
    ///
    /// The payload is kept encoded; it is not validated here since payloads
    /// can run to megabytes and decoding is deferred to [`ImageData::decode`].
    pub fn from_data_uri(uri: &str) -> Result<Self, ImageError> {
        let rest = uri.strip_prefix("data:").ok_or(ImageError::NotADataUri)?;
        let (mime_type, payload) = rest
            .split_once(";base64,")
            .ok_or(ImageError::MissingPayload)?;
        Ok(Self {
            base64: payload.to_string(),
            mime_type: mime_type.to_string(),
        })
    }

    /// Render as a `data:` URI suitable for direct display.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }

    /// Decode the payload back to raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, ImageError> {
        Ok(STANDARD.decode(&self.base64)?)
    }
}

/// Guess a MIME type from a file extension (case-insensitive).
pub fn mime_from_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_roundtrip() {
        let img = ImageData::from_bytes(b"fake png bytes", "image/png");
        assert_eq!(img.mime_type, "image/png");
        assert_eq!(img.decode().unwrap(), b"fake png bytes");
    }

    #[test]
    fn data_uri_roundtrip() {
        let img = ImageData::from_bytes(&[0x89, 0x50, 0x4e, 0x47], "image/png");
        let uri = img.to_data_uri();
        assert!(uri.starts_with("data:image/png;base64,"));

        let parsed = ImageData::from_data_uri(&uri).unwrap();
        assert_eq!(parsed, img);
    }

    #[test]
    fn data_uri_exact_format() {
        let img = ImageData {
            base64: "aGVsbG8=".to_string(),
            mime_type: "image/jpeg".to_string(),
        };
        assert_eq!(img.to_data_uri(), "data:image/jpeg;base64,aGVsbG8=");
    }

    #[test]
    fn from_data_uri_rejects_plain_string() {
        assert!(matches!(
            ImageData::from_data_uri("aGVsbG8="),
            Err(ImageError::NotADataUri)
        ));
    }

    #[test]
    fn from_data_uri_rejects_non_base64_uri() {
        assert!(matches!(
            ImageData::from_data_uri("data:text/plain,hello"),
            Err(ImageError::MissingPayload)
        ));
    }

    #[test]
    fn decode_rejects_garbage() {
        let img = ImageData {
            base64: "not valid base64!!!".to_string(),
            mime_type: "image/png".to_string(),
        };
        assert!(matches!(img.decode(), Err(ImageError::Base64(_))));
    }

    #[test]
    fn mime_guesses() {
        assert_eq!(mime_from_extension("png"), Some("image/png"));
        assert_eq!(mime_from_extension("JPG"), Some("image/jpeg"));
        assert_eq!(mime_from_extension("jpeg"), Some("image/jpeg"));
        assert_eq!(mime_from_extension("webp"), Some("image/webp"));
        assert_eq!(mime_from_extension("tiff"), None);
    }

    #[test]
    fn serde_shape() {
        let img = ImageData {
            base64: "QQ==".to_string(),
            mime_type: "image/png".to_string(),
        };
        let json = serde_json::to_value(&img).unwrap();
        assert_eq!(json["base64"], "QQ==");
        assert_eq!(json["mime_type"], "image/png");
    }
}
