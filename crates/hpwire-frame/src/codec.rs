use bytes::{Buf, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::kind::TypeCode;

/// Frame terminator on the wire.
pub const DELIMITER: u8 = b'\r';

/// Opaque preamble (type code, routing and sequence metadata) ahead of every payload.
pub const HEADER_LEN: usize = 11;

/// Default limit on bytes buffered without seeing a delimiter: 1 MiB.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 1024 * 1024;

/// One delimiter-bounded protocol unit, delimiter excluded.
///
/// Frames are immutable once cut from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Bytes,
    terminated: bool,
}

impl Frame {
    /// Create a delimiter-terminated frame.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            terminated: true,
        }
    }

    /// Create the final frame of a stream that closed without a delimiter.
    pub fn unterminated(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            terminated: false,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_ref()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the frame ended with a delimiter rather than end of stream.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// The 3-byte message type code, if the frame is long enough to carry one.
    pub fn type_code(&self) -> Option<TypeCode> {
        TypeCode::from_frame(self.as_bytes())
    }

    /// Bytes following the fixed preamble, if the frame is long enough.
    pub fn payload(&self) -> Option<&[u8]> {
        self.as_bytes().get(HEADER_LEN..)
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Outcome of scanning the unconsumed tail of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan<'a> {
    /// A delimiter was found; `advance` includes the delimiter.
    Frame { frame: &'a [u8], advance: usize },
    /// End of stream with trailing bytes and no delimiter. Nothing follows.
    Final { frame: &'a [u8], advance: usize },
    /// No delimiter yet; nothing consumed.
    NeedMore,
    /// End of stream with nothing left.
    Done,
}

impl Scan<'_> {
    /// Number of bytes the caller should consume.
    pub fn advance(&self) -> usize {
        match self {
            Scan::Frame { advance, .. } | Scan::Final { advance, .. } => *advance,
            Scan::NeedMore | Scan::Done => 0,
        }
    }
}

/// Split the next frame off the unconsumed tail of a byte stream.
///
/// Scans for the first `\r`. Bytes before it form the frame and the caller
/// advances past the delimiter. Without a delimiter the result is
/// [`Scan::NeedMore`], unless the stream has ended: then any remaining bytes
/// form a final unterminated frame, and an empty tail yields [`Scan::Done`].
pub fn scan_frame(data: &[u8], at_eof: bool) -> Scan<'_> {
    if at_eof && data.is_empty() {
        return Scan::Done;
    }

    if let Some(i) = data.iter().position(|&b| b == DELIMITER) {
        return Scan::Frame {
            frame: &data[..i],
            advance: i + 1,
        };
    }

    if at_eof {
        return Scan::Final {
            frame: data,
            advance: data.len(),
        };
    }

    Scan::NeedMore
}

/// Decode the next frame from a growable buffer.
///
/// Returns `Ok(None)` when more data is needed, or when the stream has ended
/// and the buffer is drained. On success, consumes the frame and its
/// delimiter from the buffer.
///
/// `FrameTooLarge` leaves the buffer untouched. Callers that keep reading
/// drop the oversized bytes with [`skip_to_delimiter`].
pub fn decode_frame(
    src: &mut BytesMut,
    at_eof: bool,
    max_frame_size: usize,
) -> Result<Option<Frame>> {
    match scan_frame(&src[..], at_eof) {
        Scan::Frame { frame, advance } => {
            let len = frame.len();
            let bytes = src.split_to(len).freeze();
            src.advance(advance - len);
            Ok(Some(Frame::new(bytes)))
        }
        Scan::Final { advance, .. } => {
            let bytes = src.split_to(advance).freeze();
            Ok(Some(Frame::unterminated(bytes)))
        }
        Scan::NeedMore if src.len() > max_frame_size => Err(FrameError::FrameTooLarge {
            size: src.len(),
            max: max_frame_size,
        }),
        Scan::NeedMore | Scan::Done => Ok(None),
    }
}

/// Drop buffered bytes up to and including the next delimiter.
///
/// Returns `true` once a delimiter has been consumed. Otherwise the whole
/// buffer is discarded and the caller keeps skipping on the next fill.
pub fn skip_to_delimiter(src: &mut BytesMut) -> bool {
    match src.iter().position(|&b| b == DELIMITER) {
        Some(pos) => {
            src.advance(pos + 1);
            true
        }
        None => {
            src.clear();
            false
        }
    }
}

/// Configuration for frame readers and command writers.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum bytes buffered while waiting for a delimiter. Default: 1 MiB.
    pub max_frame_size: usize,
    /// Read timeout for blocking operations.
    pub read_timeout: Option<std::time::Duration>,
    /// Write timeout for blocking operations.
    pub write_timeout: Option<std::time::Duration>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            read_timeout: None,
            write_timeout: None,
        }
    }
}
