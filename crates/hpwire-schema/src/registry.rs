use std::collections::HashMap;

use hpwire_frame::{
    classify, Diagnostic, DiagnosticSink, Frame, MessageKind, GLT_MARKERS, HEADER_LEN,
};

use crate::catalog::{builtin_schema, ElementSpec};
use crate::config::ValidatorConfig;
use crate::error::{Result, SchemaError};
use crate::validator::check_payload;

/// Outcome of validating one frame.
///
/// Rejection is a value, not an error: the frame is simply not forwarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    failure: Option<SchemaError>,
}

impl ValidationResult {
    pub fn accepted() -> Self {
        Self { failure: None }
    }

    pub fn rejected(reason: SchemaError) -> Self {
        Self {
            failure: Some(reason),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.failure.is_none()
    }

    /// Why the frame was rejected, if it was.
    pub fn failure(&self) -> Option<&SchemaError> {
        self.failure.as_ref()
    }

    pub fn into_result(self) -> Result<()> {
        match self.failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Classification and validation of a single frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    /// `None` when the frame is too short to carry a type code.
    pub kind: Option<MessageKind>,
    pub validation: ValidationResult,
}

impl Inspection {
    pub fn is_accepted(&self) -> bool {
        self.validation.is_accepted()
    }
}

/// Message-kind keyed table of payload schemas.
///
/// Built once and read-only afterwards; safe to share across threads.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<MessageKind, &'static ElementSpec>,
    config: ValidatorConfig,
}

impl SchemaRegistry {
    /// Create an empty registry with default config.
    pub fn new() -> Self {
        Self::empty_with_config(ValidatorConfig::default())
    }

    /// Create an empty registry with explicit config.
    pub fn empty_with_config(config: ValidatorConfig) -> Self {
        Self {
            schemas: HashMap::new(),
            config,
        }
    }

    /// Registry holding every built-in schema, default config.
    pub fn builtin() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    /// Registry holding every built-in schema, explicit config.
    pub fn with_config(config: ValidatorConfig) -> Self {
        let mut registry = Self::empty_with_config(config);
        let kinds = [MessageKind::Gsi, MessageKind::Psi, MessageKind::Msi]
            .into_iter()
            .chain(GLT_MARKERS.iter().map(|(_, subtype)| MessageKind::Glt(*subtype)));
        for kind in kinds {
            if let Some(schema) = builtin_schema(kind) {
                registry.schemas.insert(kind, schema);
            }
        }
        registry
    }

    /// Add a schema for a kind that has none.
    pub fn register(&mut self, kind: MessageKind, schema: &'static ElementSpec) -> Result<()> {
        if self.schemas.contains_key(&kind) {
            return Err(SchemaError::AlreadyRegistered(kind));
        }
        self.schemas.insert(kind, schema);
        Ok(())
    }

    pub fn schema_for(&self, kind: MessageKind) -> Option<&'static ElementSpec> {
        self.schemas.get(&kind).copied()
    }

    /// Check if a kind has a registered schema.
    pub fn has_schema(&self, kind: MessageKind) -> bool {
        self.schemas.contains_key(&kind)
    }

    /// Kinds with a registered schema, in display order.
    pub fn kinds(&self) -> Vec<MessageKind> {
        let mut kinds: Vec<MessageKind> = self.schemas.keys().copied().collect();
        kinds.sort_unstable_by_key(|kind| kind.to_string());
        kinds
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate a whole frame, preamble included, as `kind`.
    ///
    /// Frames shorter than the preamble are rejected without a diagnostic.
    /// Every other rejection emits [`Diagnostic::Rejected`].
    pub fn validate(
        &self,
        frame: &[u8],
        kind: MessageKind,
        sink: &dyn DiagnosticSink,
    ) -> ValidationResult {
        let Some(payload) = frame.get(HEADER_LEN..) else {
            return ValidationResult::rejected(SchemaError::Truncated {
                len: frame.len(),
                min: HEADER_LEN,
            });
        };

        let outcome = match self.schemas.get(&kind) {
            None if self.config.fail_on_missing_schema => Err(SchemaError::NoSchema(kind)),
            schema => check_payload(payload, schema.copied(), &self.config),
        };

        match outcome {
            Ok(()) => {
                tracing::trace!(%kind, bytes = frame.len(), "frame accepted");
                ValidationResult::accepted()
            }
            Err(reason) => {
                sink.emit(Diagnostic::Rejected {
                    kind,
                    reason: reason.to_string(),
                });
                ValidationResult::rejected(reason)
            }
        }
    }

    /// Classify a frame and validate it against the resulting kind.
    pub fn inspect(&self, frame: &Frame, sink: &dyn DiagnosticSink) -> Inspection {
        let bytes = frame.as_bytes();
        match classify(bytes, sink) {
            Ok(kind) => Inspection {
                kind: Some(kind),
                validation: self.validate(bytes, kind, sink),
            },
            Err(_) => Inspection {
                kind: None,
                validation: ValidationResult::rejected(SchemaError::Truncated {
                    len: bytes.len(),
                    min: HEADER_LEN,
                }),
            },
        }
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
