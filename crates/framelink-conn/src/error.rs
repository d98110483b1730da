use framelink_channel::ChannelError;
use framelink_frame::FrameError;

/// Errors surfaced by a connection's send and receive operations.
///
/// This layer adds no retry or recovery; transport and framing failures
/// propagate verbatim.
#[derive(Debug, thiserror::Error)]
pub enum ConnError {
    /// The underlying message channel failed.
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),

    /// A frame violated the length-prefix contract.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// The upstream frame producer failed.
    #[error("frame source failed: {0}")]
    Source(Box<dyn std::error::Error + Send + Sync>),

    /// The connection was disposed before the operation could complete.
    #[error("connection disposed")]
    Disposed,
}

pub type Result<T> = std::result::Result<T, ConnError>;
