//! Message type classification.
//!
//! The first three bytes of every inbound frame name its message type. `GLT`
//! frames carry one of several list shapes that the device does not tag
//! positionally, so the subtype is recovered by searching the payload for a
//! marker substring. Markers are checked in a fixed order and the first match
//! wins. Substring search can misfire on payloads that happen to contain an
//! earlier marker; the order is part of the contract.

use std::fmt;

use crate::codec::HEADER_LEN;
use crate::diag::{preview, Diagnostic, DiagnosticSink};
use crate::error::{FrameError, Result};

/// Length of the message type code at the start of every frame.
pub const TYPE_CODE_LEN: usize = 3;

/// The raw 3-byte message type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeCode([u8; TYPE_CODE_LEN]);

impl TypeCode {
    pub const fn new(code: [u8; TYPE_CODE_LEN]) -> Self {
        Self(code)
    }

    /// Read the type code from the start of a frame.
    pub fn from_frame(frame: &[u8]) -> Option<Self> {
        let code = frame.get(..TYPE_CODE_LEN)?;
        let mut out = [0u8; TYPE_CODE_LEN];
        out.copy_from_slice(code);
        Some(Self(out))
    }

    pub fn as_bytes(&self) -> &[u8; TYPE_CODE_LEN] {
        &self.0
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// List shape carried by a `GLT` frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GltSubtype {
    /// Favorites lists.
    Fl,
    Sys,
    Dept,
    Site,
    /// Trunked discovery sessions.
    TrnDiscov,
    /// Conventional discovery sessions.
    CnvDiscov,
    /// Fire tone-out entries.
    Fto,
    /// User recording folders.
    UrecFolder,
    /// Custom search banks.
    CsBank,
    Unknown,
}

/// Marker substrings in priority order. The first one found decides the subtype.
pub const GLT_MARKERS: [(&str, GltSubtype); 9] = [
    ("FL Index", GltSubtype::Fl),
    ("SYS Index", GltSubtype::Sys),
    ("DEPT Index", GltSubtype::Dept),
    ("SITE", GltSubtype::Site),
    ("TRN_DISCOV", GltSubtype::TrnDiscov),
    ("CNV_DISCOV", GltSubtype::CnvDiscov),
    ("FTO", GltSubtype::Fto),
    ("UREC_FOLDER", GltSubtype::UrecFolder),
    ("CS_BANK", GltSubtype::CsBank),
];

impl GltSubtype {
    /// Resolve the subtype by searching `payload` for the known markers.
    pub fn sniff(payload: &[u8]) -> Self {
        GLT_MARKERS
            .iter()
            .find(|(marker, _)| contains(payload, marker.as_bytes()))
            .map(|(_, subtype)| *subtype)
            .unwrap_or(GltSubtype::Unknown)
    }

    pub fn name(self) -> &'static str {
        match self {
            GltSubtype::Fl => "FL",
            GltSubtype::Sys => "SYS",
            GltSubtype::Dept => "DEPT",
            GltSubtype::Site => "SITE",
            GltSubtype::TrnDiscov => "TRN_DISCOV",
            GltSubtype::CnvDiscov => "CNV_DISCOV",
            GltSubtype::Fto => "FTO",
            GltSubtype::UrecFolder => "UREC_FOLDER",
            GltSubtype::CsBank => "CS_BANK",
            GltSubtype::Unknown => "UNKNOWN",
        }
    }
}

/// Resolved message category of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Scanner status snapshot (`GSI`).
    Gsi,
    /// Periodic scanner status push (`PSI`).
    Psi,
    /// Menu status (`MSI`).
    Msi,
    Sts,
    Glg,
    Glt(GltSubtype),
    /// Any type code outside the known set.
    Other(TypeCode),
}

impl MessageKind {
    pub fn type_code(&self) -> TypeCode {
        match self {
            MessageKind::Gsi => TypeCode(*b"GSI"),
            MessageKind::Psi => TypeCode(*b"PSI"),
            MessageKind::Msi => TypeCode(*b"MSI"),
            MessageKind::Sts => TypeCode(*b"STS"),
            MessageKind::Glg => TypeCode(*b"GLG"),
            MessageKind::Glt(_) => TypeCode(*b"GLT"),
            MessageKind::Other(code) => *code,
        }
    }

    pub fn subtype(&self) -> Option<GltSubtype> {
        match self {
            MessageKind::Glt(subtype) => Some(*subtype),
            _ => None,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Glt(subtype) => write!(f, "GLT/{}", subtype.name()),
            other => write!(f, "{}", other.type_code()),
        }
    }
}

/// Classify a frame by its type code, sniffing the payload of `GLT` frames.
///
/// An unrecognized `GLT` payload classifies as [`GltSubtype::Unknown`] and
/// emits a warning diagnostic; it is not an error.
pub fn classify(frame: &[u8], sink: &dyn DiagnosticSink) -> Result<MessageKind> {
    let code = TypeCode::from_frame(frame).ok_or(FrameError::TooShort {
        len: frame.len(),
        min: TYPE_CODE_LEN,
    })?;

    let kind = match code.as_bytes() {
        b"GSI" => MessageKind::Gsi,
        b"PSI" => MessageKind::Psi,
        b"MSI" => MessageKind::Msi,
        b"STS" => MessageKind::Sts,
        b"GLG" => MessageKind::Glg,
        b"GLT" => {
            let payload = frame.get(HEADER_LEN..).unwrap_or_default();
            let subtype = GltSubtype::sniff(payload);
            if subtype == GltSubtype::Unknown {
                sink.emit(Diagnostic::UnknownGltSubtype {
                    preview: preview(frame),
                });
            }
            MessageKind::Glt(subtype)
        }
        _ => MessageKind::Other(code),
    };

    Ok(kind)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty()
        || haystack
            .windows(needle.len())
            .any(|window| window == needle)
}
