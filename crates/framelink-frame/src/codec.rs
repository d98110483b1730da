use crate::error::{FrameError, Result};

/// Length prefix size: 3 bytes, big-endian.
pub const LENGTH_PREFIX_SIZE: usize = 3;

/// Maximum payload size representable in the length field: 2^24 - 1 bytes.
pub const MAX_FRAME_PAYLOAD: usize = (1 << (8 * LENGTH_PREFIX_SIZE)) - 1;

/// Encode a payload byte count into the fixed-width length prefix.
///
/// Wire format:
/// ```text
/// ┌────────────────┬──────────────────┐
/// │ Length (3B BE) │ Payload          │
/// │                │ (Length bytes)   │
/// └────────────────┴──────────────────┘
/// ```
///
/// A count above [`MAX_FRAME_PAYLOAD`] is a contract violation in the caller
/// and is reported as an error, never truncated.
pub fn encode_length_prefix(payload_len: usize) -> Result<[u8; LENGTH_PREFIX_SIZE]> {
    if payload_len > MAX_FRAME_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: payload_len,
            max: MAX_FRAME_PAYLOAD,
        });
    }
    let be = (payload_len as u32).to_be_bytes();
    Ok([be[1], be[2], be[3]])
}

/// Decode the payload byte count from the first `LENGTH_PREFIX_SIZE` bytes.
pub fn decode_length_prefix(bytes: &[u8]) -> Result<usize> {
    if bytes.len() < LENGTH_PREFIX_SIZE {
        return Err(FrameError::Truncated {
            len: bytes.len(),
            need: LENGTH_PREFIX_SIZE,
        });
    }
    Ok(u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]) as usize)
}
