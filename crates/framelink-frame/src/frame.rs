use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::codec::{decode_length_prefix, encode_length_prefix, LENGTH_PREFIX_SIZE};
use crate::error::{FrameError, Result};

/// One protocol-level unit of data, always length-prefixed.
///
/// A constructed `Frame` is well-formed by definition: the buffer begins with
/// the fixed-width length field and its value equals the byte count of the
/// remainder. Once a frame is handed to the transport or the protocol layer
/// it is not retained here; the buffer moves with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    buf: Bytes,
}

impl Frame {
    /// Synthesize a frame from an unprefixed transport message.
    pub fn from_message(payload: &[u8]) -> Result<Self> {
        let buf = BytesMut::with_capacity(LENGTH_PREFIX_SIZE + payload.len());
        Self::from_message_in(payload, buf)
    }

    /// Synthesize a frame into a caller-provided buffer.
    ///
    /// Used by the receive path with the channel's allocation facility.
    pub fn from_message_in(payload: &[u8], mut buf: BytesMut) -> Result<Self> {
        let prefix = encode_length_prefix(payload.len())?;
        buf.reserve(LENGTH_PREFIX_SIZE + payload.len());
        buf.put_slice(&prefix);
        buf.put_slice(payload);
        Ok(Self { buf: buf.freeze() })
    }

    /// Wrap wire bytes that already carry a length prefix.
    ///
    /// Validates that the prefix is present and matches the remainder.
    pub fn from_wire(buf: impl Into<Bytes>) -> Result<Self> {
        let buf = buf.into();
        let declared = decode_length_prefix(&buf)?;
        let actual = buf.len() - LENGTH_PREFIX_SIZE;
        if declared != actual {
            return Err(FrameError::LengthMismatch { declared, actual });
        }
        Ok(Self { buf })
    }

    /// The payload byte count declared by the length prefix.
    pub fn payload_len(&self) -> usize {
        self.buf.len() - LENGTH_PREFIX_SIZE
    }

    /// The payload bytes (length prefix excluded).
    pub fn payload(&self) -> &[u8] {
        &self.buf[LENGTH_PREFIX_SIZE..]
    }

    /// The full wire representation, length prefix included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Total wire size of this frame (prefix + payload).
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the payload is empty. The prefix is always present.
    pub fn is_empty(&self) -> bool {
        self.payload_len() == 0
    }

    /// Strip the length prefix and transfer buffer ownership to the caller.
    ///
    /// This is the outbound conversion to a transport message: zero copy,
    /// and the frame ceases to exist.
    pub fn into_message(self) -> Bytes {
        let mut buf = self.buf;
        buf.advance(LENGTH_PREFIX_SIZE);
        buf
    }
}
