use std::future::Future;

use bytes::{Bytes, BytesMut};

use crate::error::ChannelError;

/// A message-oriented duplex channel.
///
/// Implementations deliver discrete, unprefixed byte payloads in both
/// directions and surface their own close lifecycle. The connection layer is
/// the single consumer of the inbound sequence; implementations may assume
/// `recv` is not called concurrently with itself.
pub trait MessageChannel: Send + Sync + 'static {
    /// Receive the next inbound message payload.
    ///
    /// `Ok(None)` signals clean completion: the peer closed and all delivered
    /// messages have been drained. Errors are transport failures and are
    /// terminal for the inbound sequence.
    fn recv(&self) -> impl Future<Output = Result<Option<Bytes>, ChannelError>> + Send;

    /// Write one message payload.
    ///
    /// Completion means the transport accepted the message. Ordering follows
    /// call order.
    fn write(&self, payload: Bytes) -> impl Future<Output = Result<(), ChannelError>> + Send;

    /// Whether the channel currently accepts writes below its high watermark.
    fn is_writable(&self) -> bool;

    /// Byte budget the channel will accept before the next writability
    /// check is required. Zero when saturated.
    fn writable_bytes(&self) -> usize;

    /// Wait until writability is restored (or the channel closes).
    fn writable(&self) -> impl Future<Output = ()> + Send;

    /// Begin channel teardown. Idempotent; repeated calls are no-ops.
    fn close(&self);

    /// Whether teardown has begun.
    fn is_closed(&self) -> bool;

    /// Resolves once the channel's close lifecycle has completed.
    fn closed(&self) -> impl Future<Output = ()> + Send;

    /// Allocate a buffer for small control data such as length prefixes.
    ///
    /// Channels backed by a pooled allocator can override this.
    fn alloc(&self, capacity: usize) -> BytesMut {
        BytesMut::with_capacity(capacity)
    }
}
