//! Self-describing text encoding for binary file content.
//!
//! Content is stored as a data URL: `data:<mime>;base64,<payload>`. The mime
//! type is everything between the scheme and the `;base64` marker, so
//! parameters such as `;charset=utf-8` survive a round trip.
//!
//! ## Example
//!
//! ```
//! use docshelf::codec;
//!
//! let text = codec::encode("text/plain", b"hi");
//! assert_eq!(text, "data:text/plain;base64,aGk=");
//!
//! let file = codec::decode(&text).unwrap();
//! assert_eq!(file.mime_type, "text/plain");
//! assert_eq!(file.bytes, b"hi");
//! ```

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine};

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// Bytes and mime type recovered from encoded content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFile {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DecodedFile {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Text does not start with `data:`.
    MissingScheme,
    /// No `,` between header and payload.
    MissingSeparator,
    /// Header is not base64-encoded (the offending header is carried).
    UnsupportedEncoding(String),
    /// Payload is not valid base64.
    InvalidPayload(String),
    /// Payload decoded to a different number of bytes than recorded.
    SizeMismatch { expected: u64, actual: u64 },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::MissingScheme => write!(f, "content is not a data URL"),
            DecodeError::MissingSeparator => write!(f, "data URL has no payload separator"),
            DecodeError::UnsupportedEncoding(header) => {
                write!(f, "data URL header '{}' is not base64", header)
            }
            DecodeError::InvalidPayload(message) => {
                write!(f, "invalid base64 payload: {}", message)
            }
            DecodeError::SizeMismatch { expected, actual } => write!(
                f,
                "decoded {} bytes but the file recorded {}",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Encode `bytes` as a data URL tagged with `mime_type`.
pub fn encode(mime_type: &str, bytes: &[u8]) -> String {
    format!(
        "{}{}{},{}",
        SCHEME,
        mime_type,
        BASE64_MARKER,
        STANDARD.encode(bytes)
    )
}

/// Parse a data URL produced by [`encode`].
pub fn decode(text: &str) -> Result<DecodedFile, DecodeError> {
    let rest = text.strip_prefix(SCHEME).ok_or(DecodeError::MissingScheme)?;
    // base64 never contains ',', so the last one separates header from payload
    let (header, payload) = rest.rsplit_once(',').ok_or(DecodeError::MissingSeparator)?;
    let mime_type = header
        .strip_suffix(BASE64_MARKER)
        .ok_or_else(|| DecodeError::UnsupportedEncoding(header.to_string()))?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| DecodeError::InvalidPayload(e.to_string()))?;

    Ok(DecodedFile {
        mime_type: mime_type.to_string(),
        bytes,
    })
}
