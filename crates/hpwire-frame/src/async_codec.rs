//! `tokio_util::codec` adapter for async transports.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{decode_frame, skip_to_delimiter, Frame, FrameConfig};
use crate::command::Command;
use crate::error::FrameError;

/// Splits inbound bytes into frames and encodes outbound commands.
///
/// After `FrameTooLarge` the codec drops input up to the next delimiter, so a
/// caller that keeps decoding from the same buffer picks up the next frame.
#[derive(Debug, Clone, Default)]
pub struct ScannerCodec {
    config: FrameConfig,
    discarding: bool,
}

impl ScannerCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FrameConfig) -> Self {
        Self {
            config,
            discarding: false,
        }
    }

    fn decode_next(
        &mut self,
        src: &mut BytesMut,
        at_eof: bool,
    ) -> Result<Option<Frame>, FrameError> {
        if self.discarding {
            if !skip_to_delimiter(src) {
                return Ok(None);
            }
            self.discarding = false;
        }
        let result = decode_frame(src, at_eof, self.config.max_frame_size);
        if result.is_err() {
            self.discarding = true;
        }
        result
    }
}

impl Decoder for ScannerCodec {
    type Item = Frame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, FrameError> {
        self.decode_next(src, false)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, FrameError> {
        self.decode_next(src, true)
    }
}

impl Encoder<Command> for ScannerCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Command, dst: &mut BytesMut) -> Result<(), FrameError> {
        item.encode(dst);
        Ok(())
    }
}

impl Encoder<&Command> for ScannerCodec {
    type Error = FrameError;

    fn encode(&mut self, item: &Command, dst: &mut BytesMut) -> Result<(), FrameError> {
        item.encode(dst);
        Ok(())
    }
}
