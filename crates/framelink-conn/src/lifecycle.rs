use std::sync::{Arc, Mutex, PoisonError};

use framelink_channel::MessageChannel;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Links the logical connection lifecycle to the channel's close lifecycle.
///
/// Closing either side converges both to disposed, exactly once:
/// - `dispose` cancels the logical side and closes the channel.
/// - A watcher task observes `channel.closed()`; if the channel closes for
///   external reasons first, it cancels the logical side so state stays
///   consistent.
///
/// The cancellation token is the single-assignment guard for teardown:
/// cancel is idempotent and readable many times, so concurrent disposal
/// triggers (explicit call, channel-initiated close, error path) cannot run
/// teardown twice. Disposed-ness itself is not tracked here; it is delegated
/// to the channel's own closed flag.
pub(crate) struct DisposalCoordinator {
    cancel: CancellationToken,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

impl DisposalCoordinator {
    /// Register the close watcher for `channel`.
    ///
    /// Must be called from within a Tokio runtime.
    pub(crate) fn watch<C: MessageChannel>(channel: &Arc<C>) -> Self {
        let cancel = CancellationToken::new();
        let watcher = tokio::spawn({
            let channel = Arc::clone(channel);
            let cancel = cancel.clone();
            async move {
                channel.closed().await;
                if !cancel.is_cancelled() {
                    debug!("channel closed externally; disposing connection");
                    cancel.cancel();
                }
            }
        });
        Self {
            cancel,
            watcher: Mutex::new(Some(watcher)),
        }
    }

    /// Token observed by the send pipeline; fires on the first disposal
    /// trigger from any side.
    pub(crate) fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Dispose the connection: cancel the logical side, close the channel.
    /// Idempotent under concurrent invocation.
    pub(crate) fn dispose<C: MessageChannel>(&self, channel: &C) {
        if !self.cancel.is_cancelled() {
            debug!("disposing connection");
        }
        self.cancel.cancel();
        channel.close();
    }

    /// Release the close watcher. Only the first call takes the handle.
    pub(crate) fn release_watcher(&self) {
        let handle = self
            .watcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
    }
}

impl Drop for DisposalCoordinator {
    fn drop(&mut self) {
        self.release_watcher();
    }
}
