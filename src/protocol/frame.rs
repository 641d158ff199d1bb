//! Decoded application frame

use bytes::Bytes;

use super::FrameType;

/// Application frame: a type and an opaque payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<T: FrameType> {
    frame_type: T,
    payload: Bytes,
}

impl<T: FrameType> Frame<T> {
    /// Create a new frame
    pub fn new(frame_type: T, payload: impl Into<Bytes>) -> Self {
        Self {
            frame_type,
            payload: payload.into(),
        }
    }

    /// Get frame type
    #[must_use]
    pub fn frame_type(&self) -> T {
        self.frame_type
    }

    /// Get payload
    #[must_use]
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Consume the frame and return its parts.
    #[must_use]
    pub fn into_parts(self) -> (T, Bytes) {
        (self.frame_type, self.payload)
    }

    /// Encode frame to wire bytes
    pub fn encode(&self) -> super::Result<Vec<u8>> {
        super::encode(self.frame_type, &self.payload)
    }
}
