//! Fail-closed validation of scanner XML payloads.
//!
//! Every inbound frame carries an 11-byte preamble followed by an XML
//! document. [`SchemaRegistry`] strips the preamble, selects the declarative
//! schema for the frame's [`MessageKind`](hpwire_frame::MessageKind) and
//! checks the document against it. Anything that cannot be fully checked is
//! rejected; kinds without a schema only need to be well-formed.
//!
//! ```
//! use hpwire_frame::{Frame, NullSink};
//! use hpwire_schema::SchemaRegistry;
//!
//! let registry = SchemaRegistry::builtin();
//! let frame = Frame::new(&b"GLT,<XML>,\n<GLT><FL Index=\"0\" Name=\"Metro\"/><Footer No=\"1\" EOT=\"1\"/></GLT>"[..]);
//! let inspection = registry.inspect(&frame, &NullSink);
//! assert!(inspection.is_accepted());
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod registry;
pub mod validator;

pub use catalog::{builtin_schema, AttrSpec, ChildSpec, ElementSpec, Occurs};
pub use config::ValidatorConfig;
pub use error::{Result, SchemaError};
pub use registry::{Inspection, SchemaRegistry, ValidationResult};
