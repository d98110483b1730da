use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{ChannelError, Result};
use crate::traits::MessageChannel;

/// Default high watermark: 64 KiB of queued outbound bytes.
pub const DEFAULT_HIGH_WATERMARK: usize = 64 * 1024;

/// Default low watermark: 32 KiB.
pub const DEFAULT_LOW_WATERMARK: usize = 32 * 1024;

/// Watermark configuration for the writability signal.
///
/// The unwritable flag latches once queued bytes exceed `high` and clears
/// once the reader drains the queue to `low` or below.
#[derive(Debug, Clone, Copy)]
pub struct WatermarkConfig {
    pub high: usize,
    pub low: usize,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            high: DEFAULT_HIGH_WATERMARK,
            low: DEFAULT_LOW_WATERMARK,
        }
    }
}

struct PipeState {
    queue: VecDeque<Bytes>,
    queued_bytes: usize,
    unwritable: bool,
}

/// One direction of the in-process duplex pair.
struct Pipe {
    state: Mutex<PipeState>,
    readable: Notify,
    writable: Notify,
}

impl Pipe {
    fn new() -> Self {
        Self {
            state: Mutex::new(PipeState {
                queue: VecDeque::new(),
                queued_bytes: 0,
                unwritable: false,
            }),
            readable: Notify::new(),
            writable: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PipeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// In-process message channel, created in connected pairs.
///
/// This is the semantic reference for [`MessageChannel`] implementations:
/// per-direction FIFO delivery, watermark-latched writability, and a single
/// close lifecycle shared by both endpoints (closing either side closes the
/// connection, and the peer drains already-delivered messages before seeing
/// completion).
pub struct MemoryChannel {
    outbound: Arc<Pipe>,
    inbound: Arc<Pipe>,
    closed: CancellationToken,
    config: WatermarkConfig,
}

impl MemoryChannel {
    /// Create a connected pair with default watermarks.
    pub fn pair() -> (Self, Self) {
        Self::pair_with_config(WatermarkConfig::default())
    }

    /// Create a connected pair with explicit watermarks.
    pub fn pair_with_config(config: WatermarkConfig) -> (Self, Self) {
        let a_to_b = Arc::new(Pipe::new());
        let b_to_a = Arc::new(Pipe::new());
        let closed = CancellationToken::new();

        let a = Self {
            outbound: Arc::clone(&a_to_b),
            inbound: Arc::clone(&b_to_a),
            closed: closed.clone(),
            config,
        };
        let b = Self {
            outbound: b_to_a,
            inbound: a_to_b,
            closed,
            config,
        };
        (a, b)
    }

    /// Bytes currently queued toward the peer. Diagnostic only.
    pub fn queued_bytes(&self) -> usize {
        self.outbound.lock().queued_bytes
    }
}

impl MessageChannel for MemoryChannel {
    async fn recv(&self) -> Result<Option<Bytes>> {
        loop {
            {
                let mut state = self.inbound.lock();
                if let Some(payload) = state.queue.pop_front() {
                    state.queued_bytes -= payload.len();
                    if state.unwritable && state.queued_bytes <= self.config.low {
                        state.unwritable = false;
                        self.inbound.writable.notify_one();
                    }
                    return Ok(Some(payload));
                }
            }
            if self.closed.is_cancelled() {
                return Ok(None);
            }
            tokio::select! {
                _ = self.inbound.readable.notified() => {}
                _ = self.closed.cancelled() => {}
            }
        }
    }

    async fn write(&self, payload: Bytes) -> Result<()> {
        if self.closed.is_cancelled() {
            return Err(ChannelError::Closed);
        }
        {
            let mut state = self.outbound.lock();
            state.queued_bytes += payload.len();
            state.queue.push_back(payload);
            if state.queued_bytes > self.config.high {
                state.unwritable = true;
            }
        }
        self.outbound.readable.notify_one();
        Ok(())
    }

    fn is_writable(&self) -> bool {
        !self.closed.is_cancelled() && !self.outbound.lock().unwritable
    }

    fn writable_bytes(&self) -> usize {
        self.config.high.saturating_sub(self.outbound.lock().queued_bytes)
    }

    async fn writable(&self) {
        loop {
            if self.is_writable() || self.closed.is_cancelled() {
                return;
            }
            tokio::select! {
                _ = self.outbound.writable.notified() => {}
                _ = self.closed.cancelled() => return,
            }
        }
    }

    fn close(&self) {
        if !self.closed.is_cancelled() {
            debug!("memory channel closing");
        }
        self.closed.cancel();
    }

    fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    fn closed(&self) -> impl std::future::Future<Output = ()> + Send {
        self.closed.clone().cancelled_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_recv_preserves_order() {
        let (a, b) = MemoryChannel::pair();

        a.write(Bytes::from_static(b"one")).await.unwrap();
        a.write(Bytes::from_static(b"two")).await.unwrap();
        a.write(Bytes::from_static(b"three")).await.unwrap();

        assert_eq!(b.recv().await.unwrap().unwrap().as_ref(), b"one");
        assert_eq!(b.recv().await.unwrap().unwrap().as_ref(), b"two");
        assert_eq!(b.recv().await.unwrap().unwrap().as_ref(), b"three");
    }

    #[tokio::test]
    async fn recv_waits_for_message() {
        let (a, b) = MemoryChannel::pair();

        let reader = tokio::spawn(async move { b.recv().await });
        tokio::task::yield_now().await;
        a.write(Bytes::from_static(b"late")).await.unwrap();

        let received = reader.await.unwrap().unwrap().unwrap();
        assert_eq!(received.as_ref(), b"late");
    }

    #[tokio::test]
    async fn watermark_latches_and_clears() {
        let cfg = WatermarkConfig { high: 10, low: 4 };
        let (a, b) = MemoryChannel::pair_with_config(cfg);

        assert!(a.is_writable());
        assert_eq!(a.writable_bytes(), 10);

        a.write(Bytes::from_static(b"123456")).await.unwrap();
        assert!(a.is_writable());
        assert_eq!(a.writable_bytes(), 4);

        a.write(Bytes::from_static(b"789012")).await.unwrap();
        assert!(!a.is_writable());
        assert_eq!(a.writable_bytes(), 0);

        // Draining one message leaves 6 bytes queued, still above low.
        b.recv().await.unwrap();
        assert!(!a.is_writable());

        // Draining the rest clears the latch.
        b.recv().await.unwrap();
        assert!(a.is_writable());
    }

    #[tokio::test]
    async fn writable_wakes_when_latch_clears() {
        let cfg = WatermarkConfig { high: 4, low: 0 };
        let (a, b) = MemoryChannel::pair_with_config(cfg);

        a.write(Bytes::from_static(b"12345")).await.unwrap();
        assert!(!a.is_writable());

        let waiter = tokio::spawn(async move {
            a.writable().await;
            a
        });
        tokio::task::yield_now().await;

        b.recv().await.unwrap();
        let a = waiter.await.unwrap();
        assert!(a.is_writable());
    }

    #[tokio::test]
    async fn close_completes_recv_after_drain() {
        let (a, b) = MemoryChannel::pair();

        a.write(Bytes::from_static(b"last")).await.unwrap();
        a.close();

        assert_eq!(b.recv().await.unwrap().unwrap().as_ref(), b"last");
        assert!(b.recv().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn close_is_idempotent_and_shared() {
        let (a, b) = MemoryChannel::pair();

        a.close();
        a.close();
        assert!(a.is_closed());
        assert!(b.is_closed());
        b.closed().await;
    }

    #[tokio::test]
    async fn write_after_close_fails() {
        let (a, b) = MemoryChannel::pair();
        b.close();

        let err = a.write(Bytes::from_static(b"x")).await.unwrap_err();
        assert!(matches!(err, ChannelError::Closed));
    }

    #[tokio::test]
    async fn close_wakes_pending_recv() {
        let (a, b) = MemoryChannel::pair();

        let reader = tokio::spawn(async move { b.recv().await });
        tokio::task::yield_now().await;
        a.close();

        assert!(reader.await.unwrap().unwrap().is_none());
    }
}
