/// Errors that can occur while framing, classifying or writing scanner traffic.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Buffered bytes grew past the configured limit without a delimiter.
    #[error("frame too large ({size} bytes buffered without delimiter, max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// The frame is too short to carry the requested field.
    #[error("frame too short ({len} bytes, need at least {min})")]
    TooShort { len: usize, min: usize },

    /// An I/O error occurred while reading frames or writing commands.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer stopped accepting bytes mid-command.
    #[error("connection closed")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
