//! Carriage-return framing for HomePatrol-style scanner traffic.
//!
//! The scanner emits an undelimited stream of messages, each terminated by a
//! single `\r`. Inbound frames carry an 11-byte preamble whose first three
//! bytes name the message type (`GSI`, `PSI`, `MSI`, `STS`, `GLG`, `GLT`).
//! Outbound commands use the tab-delimited dialect:
//!
//! ```text
//! arg0 \t arg1 \t ... \t <decimal checksum> \r
//! ```
//!
//! This crate splits the stream into frames, classifies them, and encodes
//! outgoing commands. Payload validation lives in `hpwire-schema`.

pub mod codec;
pub mod command;
pub mod diag;
pub mod error;
pub mod kind;
pub mod reader;
pub mod writer;

#[cfg(feature = "async")]
pub mod async_codec;

#[cfg(feature = "async")]
pub use async_codec::ScannerCodec;
pub use codec::{
    decode_frame, scan_frame, skip_to_delimiter, Frame, FrameConfig, Scan,
    DEFAULT_MAX_FRAME_SIZE, DELIMITER, HEADER_LEN,
};
pub use command::{checksum, encode_command, Command, SEPARATOR};
pub use diag::{
    preview, Diagnostic, DiagnosticSink, NullSink, RecordingSink, Severity, TracingSink,
};
pub use error::{FrameError, Result};
pub use kind::{classify, GltSubtype, MessageKind, TypeCode, GLT_MARKERS, TYPE_CODE_LEN};
pub use reader::FrameReader;
pub use writer::CommandWriter;
