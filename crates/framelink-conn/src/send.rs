use framelink_channel::{ChannelError, MessageChannel};
use framelink_frame::Frame;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::error::ConnError;

/// Bounded buffer capacity for producers without synchronous pull support.
pub const SEND_BUFFER_FRAMES: usize = 32;

type FusedItems = Box<dyn Iterator<Item = Result<Frame, ConnError>> + Send>;

/// A producer of outbound frames, tagged with its supply discipline.
///
/// The discipline is fixed once at construction and never re-checked per
/// item:
/// - [`FrameSupply::fused`] for producers that can be pulled synchronously,
///   without per-item scheduling overhead.
/// - [`FrameSupply::buffered`] for producers that deliver asynchronously;
///   the pipeline drains them through a bounded buffer, and the bounded
///   channel itself is the demand signal.
pub enum FrameSupply {
    /// Zero-overhead synchronous pull.
    Fused(FusedItems),
    /// Demand-signaled drain through a bounded buffer.
    Buffered(mpsc::Receiver<Result<Frame, ConnError>>),
}

impl FrameSupply {
    /// A supply pulled synchronously from an infallible producer.
    pub fn fused<I>(frames: I) -> Self
    where
        I: IntoIterator<Item = Frame>,
        I::IntoIter: Send + 'static,
    {
        Self::Fused(Box::new(frames.into_iter().map(Ok)))
    }

    /// A supply pulled synchronously from a fallible producer.
    pub fn try_fused<I>(items: I) -> Self
    where
        I: Iterator<Item = Result<Frame, ConnError>> + Send + 'static,
    {
        Self::Fused(Box::new(items))
    }

    /// A buffered supply with the default capacity.
    ///
    /// Returns the producer handle and the supply to hand to
    /// [`MessageConnection::send`](crate::MessageConnection::send). Dropping
    /// the handle completes the supply.
    pub fn buffered() -> (FrameSender, Self) {
        Self::buffered_with_capacity(SEND_BUFFER_FRAMES)
    }

    /// A buffered supply with an explicit buffer capacity.
    pub fn buffered_with_capacity(capacity: usize) -> (FrameSender, Self) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (FrameSender { tx }, Self::Buffered(rx))
    }
}

/// Producer handle for a buffered [`FrameSupply`].
#[derive(Clone)]
pub struct FrameSender {
    tx: mpsc::Sender<Result<Frame, ConnError>>,
}

impl FrameSender {
    /// Queue a frame, waiting while the pipeline's buffer is full.
    ///
    /// Fails with [`ConnError::Disposed`] once the pipeline has stopped
    /// pulling.
    pub async fn send(&self, frame: Frame) -> Result<(), ConnError> {
        self.tx
            .send(Ok(frame))
            .await
            .map_err(|_| ConnError::Disposed)
    }

    /// Terminate the supply with a producer error.
    ///
    /// The send operation's completion signal reports it as
    /// [`ConnError::Source`].
    pub async fn fail(self, error: impl Into<Box<dyn std::error::Error + Send + Sync>>) {
        let _ = self.tx.send(Err(ConnError::Source(error.into()))).await;
    }
}

/// Writes one supply of frames to the channel as unprefixed messages.
///
/// Flow control: pulls are gated on the channel's writability signal plus a
/// byte budget refreshed from `writable_bytes` at each writability check, so
/// a handful of maximum-size frames cannot overrun the channel's burst
/// capacity between checks. Messages are written strictly in production
/// order. Cancellation stops pulling, drops anything not yet written, and
/// completes without error. A channel that closes while the pipeline waits
/// for writability fails the send with the channel's closed error.
pub(crate) struct SendPipeline<'a, C> {
    channel: &'a C,
    cancel: &'a CancellationToken,
    supply: FrameSupply,
}

impl<'a, C: MessageChannel> SendPipeline<'a, C> {
    pub(crate) fn new(channel: &'a C, cancel: &'a CancellationToken, supply: FrameSupply) -> Self {
        Self {
            channel,
            cancel,
            supply,
        }
    }

    pub(crate) async fn run(mut self) -> Result<(), ConnError> {
        let mut budget = self.channel.writable_bytes();
        loop {
            if self.cancel.is_cancelled() {
                debug!("send pipeline cancelled");
                return Ok(());
            }
            if !self.channel.is_writable() || budget == 0 {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => return Ok(()),
                    _ = self.channel.writable() => {}
                }
                // `writable()` also resolves when the channel closes, and a
                // closed channel never becomes writable again. Bail out here
                // rather than re-entering the gate.
                if self.cancel.is_cancelled() {
                    return Ok(());
                }
                if self.channel.is_closed() {
                    debug!("channel closed while waiting for writability");
                    return Err(ChannelError::Closed.into());
                }
                // Always admit at least one message so a frame larger than
                // the remaining budget still makes progress.
                budget = self.channel.writable_bytes().max(1);
                trace!(budget, "writable budget refreshed");
                continue;
            }

            let item = match &mut self.supply {
                FrameSupply::Fused(items) => items.next(),
                FrameSupply::Buffered(rx) => tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => return Ok(()),
                    item = rx.recv() => item,
                },
            };
            let frame = match item {
                None => return Ok(()),
                Some(Err(err)) => return Err(err),
                Some(Ok(frame)) => frame,
            };

            // Buffer ownership moves to the outgoing message here; the frame
            // is never re-read.
            let message = frame.into_message();
            let size = message.len();
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Ok(()),
                written = self.channel.write(message) => written?,
            }
            budget = budget.saturating_sub(size);
        }
    }
}
