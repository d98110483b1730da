/// Errors that can occur on a message channel.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// An I/O error occurred on the underlying transport.
    #[error("channel I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The channel is closed; no further writes are accepted.
    #[error("channel closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, ChannelError>;
