//! Wire protocol toolkit for HomePatrol-style radio scanners.
//!
//! The scanner streams carriage-return delimited frames, each an 11-byte
//! preamble followed by an XML document, and accepts tab-separated commands
//! closed by an additive checksum.
//!
//! # Crate Structure
//!
//! - [`frame`]: stream framing, message classification, command encoding
//! - [`schema`]: fail-closed payload validation (behind `schema` feature)
//!
//! ```
//! use hpwire::frame::{Command, FrameReader, NullSink};
//! # #[cfg(feature = "schema")]
//! use hpwire::schema::SchemaRegistry;
//!
//! assert_eq!(&Command::new("PWR").to_bytes()[..], b"PWR\t258\r");
//!
//! let wire = &b"STS,<XML>,\n<ScannerStatus/>\r"[..];
//! let mut reader = FrameReader::new(wire);
//! let frame = reader.read_frame().unwrap().unwrap();
//! # #[cfg(feature = "schema")]
//! assert!(SchemaRegistry::builtin().inspect(&frame, &NullSink).is_accepted());
//! ```

/// Re-export frame types.
pub mod frame {
    pub use hpwire_frame::*;
}

/// Re-export schema types (requires `schema` feature).
#[cfg(feature = "schema")]
pub mod schema {
    pub use hpwire_schema::*;
}
