//! Text-in, text-out boundary.
//!
//! Every operation here takes and returns plain strings so it can be exposed
//! across a process or language boundary. Failures come back as the uniform
//! envelope
//!
//! ```json
//! {"success": false, "errors": [{"line": 1, "message": "...", "path": "", "code": "ParseError"}]}
//! ```
//!
//! and trees travel as JSON.

mod text_api;

pub use text_api::TextApi;

use crate::conflict::ConflictReport;
use crate::error::ValidationResult;
use crate::patch::Patch;

const FALLBACK_REPORT: &str = r#"{"hasConflict":false,"conflicts":[]}"#;

/// Trait for values that cross the boundary as JSON text.
///
/// Implementations never fail; if serialization is impossible they return a
/// fixed, well-formed fallback envelope.
pub trait ToEnvelope {
    /// Serializes this value as its boundary JSON text.
    fn to_envelope(&self) -> String;
}

impl ToEnvelope for ValidationResult {
    fn to_envelope(&self) -> String {
        self.to_json()
    }
}

impl ToEnvelope for Patch {
    fn to_envelope(&self) -> String {
        self.to_json()
    }
}

impl ToEnvelope for ConflictReport {
    fn to_envelope(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| FALLBACK_REPORT.to_string())
    }
}
