/// Errors that can occur while encoding or validating frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The payload byte count does not fit in the fixed-width length field.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The buffer is shorter than the fixed-width length field.
    #[error("buffer too short ({len} bytes, need {need})")]
    Truncated { len: usize, need: usize },

    /// The declared payload length does not match the bytes that follow it.
    #[error("length prefix mismatch (declared {declared}, actual {actual})")]
    LengthMismatch { declared: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;
