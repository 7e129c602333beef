use hpwire_frame::MessageKind;

/// Reasons a frame is rejected, or a schema cannot be registered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// The frame is shorter than the fixed preamble.
    #[error("frame truncated ({len} bytes, preamble is {min})")]
    Truncated { len: usize, min: usize },

    /// The payload is not UTF-8 text.
    #[error("payload is not valid UTF-8 at byte {0}")]
    InvalidUtf8(usize),

    /// The payload is not well-formed XML.
    #[error("payload is not well-formed XML: {0}")]
    Malformed(String),

    /// The document root does not match the schema.
    #[error("unexpected root element <{found}>, expected <{expected}>")]
    UnexpectedRoot {
        expected: &'static str,
        found: String,
    },

    /// An element not described by the schema.
    #[error("unknown element <{name}> inside <{parent}>")]
    UnknownElement { parent: String, name: String },

    /// A required element is absent.
    #[error("missing required element <{name}> inside <{parent}>")]
    MissingElement {
        parent: String,
        name: &'static str,
    },

    /// A single-occurrence element appears more than once.
    #[error("element <{name}> repeated inside <{parent}>")]
    DuplicateElement {
        parent: String,
        name: &'static str,
    },

    /// An attribute not described by the schema (strict mode).
    #[error("unknown attribute {name} on <{element}>")]
    UnknownAttribute { element: String, name: String },

    /// A required attribute is absent.
    #[error("missing required attribute {name} on <{element}>")]
    MissingAttribute {
        element: String,
        name: &'static str,
    },

    /// No schema exists for the message kind and missing schemas are fatal.
    #[error("no schema registered for {0}")]
    NoSchema(MessageKind),

    /// Schemas are append-only; a kind cannot be redefined.
    #[error("schema already registered for {0}")]
    AlreadyRegistered(MessageKind),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
