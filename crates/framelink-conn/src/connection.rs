use std::sync::Arc;

use framelink_channel::MessageChannel;
use framelink_frame::{Frame, LENGTH_PREFIX_SIZE};

use crate::error::Result;
use crate::lifecycle::DisposalCoordinator;
use crate::send::{FrameSupply, SendPipeline};

/// A duplex connection that speaks length-prefixed frames over a
/// message-oriented channel.
///
/// Pure composition: the receive path stitches a length prefix onto each
/// inbound message, the send pipeline strips it from each outbound frame,
/// and the disposal coordinator links the two close lifecycles. Receive and
/// send operate independently and may run concurrently; neither shares
/// buffers with the other.
pub struct MessageConnection<C> {
    channel: Arc<C>,
    coordinator: DisposalCoordinator,
}

impl<C: MessageChannel> MessageConnection<C> {
    /// Wrap a channel. Must be called from within a Tokio runtime: the
    /// connection registers a watcher on the channel's close lifecycle.
    pub fn new(channel: C) -> Self {
        let channel = Arc::new(channel);
        let coordinator = DisposalCoordinator::watch(&channel);
        Self {
            channel,
            coordinator,
        }
    }

    /// Borrow the underlying channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Receive the next inbound frame.
    ///
    /// Each transport message becomes one frame: a freshly encoded length
    /// prefix followed by the message bytes, in delivery order. Completion
    /// and errors from the channel propagate verbatim; this path adds no
    /// backpressure of its own.
    pub async fn recv(&self) -> Result<Option<Frame>> {
        match self.channel.recv().await? {
            Some(payload) => {
                let buf = self.channel.alloc(LENGTH_PREFIX_SIZE + payload.len());
                let frame = Frame::from_message_in(&payload, buf)?;
                Ok(Some(frame))
            }
            None => Ok(None),
        }
    }

    /// Write a supply of outbound frames to the channel.
    ///
    /// Completes when the supply completes and every pulled frame has been
    /// written, or with the first upstream/channel error. Disposal cancels
    /// the pipeline: pulling stops, unwritten frames are discarded, and the
    /// operation completes without error. Frames are written strictly in
    /// production order.
    pub async fn send(&self, supply: FrameSupply) -> Result<()> {
        SendPipeline::new(&*self.channel, self.coordinator.cancellation(), supply)
            .run()
            .await
    }

    /// Dispose the connection and close the underlying channel.
    /// Idempotent, including under concurrent invocation.
    pub fn dispose(&self) {
        self.coordinator.dispose(&*self.channel);
    }

    /// Whether the connection is disposed. Delegates to the channel's own
    /// closed flag; no separate state is tracked.
    pub fn is_disposed(&self) -> bool {
        self.channel.is_closed()
    }

    /// Resolves once the channel's close lifecycle has completed, no matter
    /// which side initiated it. As a finalization effect, releases the close
    /// watcher if it has not been released yet.
    pub async fn closed(&self) {
        self.channel.closed().await;
        self.coordinator.release_watcher();
    }
}
