//! Codec trait for turning records into bytes and back.
//!
//! The session store persists its record through a [`Codec`] rather than
//! calling `serde_json` directly, so the storage format can change (a
//! compact binary format, an encrypted envelope) without touching the
//! store itself.

use serde::{Serialize, de::DeserializeOwned};

use crate::CodecError;

/// Encodes values to bytes and decodes them back.
///
/// `Send + Sync + 'static` because the codec lives inside the session
/// store, which is shared with the background restore task.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns [`CodecError::Encode`] if the value can't be represented.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns [`CodecError::Decode`] if the bytes are malformed or don't
    /// match the expected shape.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError>;
}

/// A [`Codec`] that uses JSON.
///
/// Human-readable, so a persisted session can be inspected by opening the
/// storage file.
///
/// ```rust
/// use portico_api::{Codec, Identity, JsonCodec, UserId};
///
/// let codec = JsonCodec;
/// let identity = Identity::new(UserId(7), "Foo");
///
/// let bytes = codec.encode(&identity).unwrap();
/// let decoded: Identity = codec.decode(&bytes).unwrap();
/// assert_eq!(identity, decoded);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(value).map_err(CodecError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError> {
        serde_json::from_slice(data).map_err(CodecError::Decode)
    }
}
