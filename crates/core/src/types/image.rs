//! Product image payloads.
//!
//! Image bytes are opaque to the engine: they arrive already picked by the
//! UI layer, pass through an encoder once at creation time, and are stored
//! verbatim afterwards.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Encoded image bytes attached to a product.
///
/// Serializes as a standard base64 string so product records stay valid
/// JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageData(Vec<u8>);

impl ImageData {
    /// Wrap encoded image bytes.
    #[must_use]
    pub const fn new(data: Vec<u8>) -> Self {
        Self(data)
    }

    /// Get the image data as a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Size of the encoded payload in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert into the inner bytes.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for ImageData {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for ImageData {
    fn from(data: Vec<u8>) -> Self {
        Self(data)
    }
}

impl From<ImageData> for Vec<u8> {
    fn from(image: ImageData) -> Self {
        image.0
    }
}

impl Serialize for ImageData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for ImageData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}
