//! Length-prefixed frame values for message-oriented transports.
//!
//! The protocol layer above assumes every frame begins with a fixed-width
//! length field:
//! - A 3-byte big-endian payload length (`LENGTH_PREFIX_SIZE`)
//! - The payload bytes
//!
//! Message-oriented transports carry no such prefix, so it is synthesized on
//! receive and stripped on send. This crate owns the prefix codec and the
//! [`Frame`] value type that enforces the invariant.

pub mod codec;
pub mod error;
pub mod frame;

pub use codec::{decode_length_prefix, encode_length_prefix, LENGTH_PREFIX_SIZE, MAX_FRAME_PAYLOAD};
pub use error::{FrameError, Result};
pub use frame::Frame;
