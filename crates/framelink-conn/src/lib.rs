//! Duplex connection adapter for message-oriented transports.
//!
//! The protocol layer above strongly assumes that every frame is encoded
//! with a length prefix. That is not true for message-oriented transports,
//! so the prefix must be stripped from frames sent and stitched back on for
//! frames received. [`MessageConnection`] does exactly that, on top of any
//! [`MessageChannel`](framelink_channel::MessageChannel):
//!
//! - [`MessageConnection::recv`] prepends a freshly encoded length prefix to
//!   each inbound message, one to one and in order.
//! - [`MessageConnection::send`] drains a [`FrameSupply`] of outbound frames,
//!   strips each prefix, and writes the payloads under the channel's own
//!   writability signal.
//! - [`MessageConnection::dispose`] / [`MessageConnection::closed`] link the
//!   logical connection lifecycle to the channel's close lifecycle, exactly
//!   once, in both directions.

pub mod connection;
pub mod error;
pub mod send;

mod lifecycle;

pub use connection::MessageConnection;
pub use error::{ConnError, Result};
pub use send::{FrameSender, FrameSupply, SEND_BUFFER_FRAMES};
