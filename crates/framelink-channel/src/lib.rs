//! Message-oriented duplex channel abstraction.
//!
//! A [`MessageChannel`] delivers and accepts discrete byte payloads with no
//! implicit framing: one message in, one message out. It also exposes the
//! three signals the connection layer above needs:
//! - inbound completion/error semantics on [`MessageChannel::recv`],
//! - a writability/capacity signal for send-side backpressure,
//! - a close lifecycle with an idempotent [`MessageChannel::close`] and a
//!   close-completion signal.
//!
//! [`MemoryChannel`] is the in-process reference implementation. Real
//! channel implementations (sockets, WebSockets, pipes) must match its
//! semantics.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{ChannelError, Result};
pub use memory::{MemoryChannel, WatermarkConfig};
pub use traits::MessageChannel;
