//! # Docweave
//!
//! A structured-document engine: parse YAML text into a [`Value`] tree,
//! validate it against a schema written in the same syntax, convert
//! heading-structured text to and from trees, diff and patch trees, and
//! detect conflicting edits.
//!
//! ## Overview
//!
//! Validation never stops at the first problem. Every operation that checks
//! input accumulates all errors through stillwater's `Validation` type and
//! reports them with a structural [`Path`] and, when known, a source line.
//! Operations meant to run against in-flight edits (diff, patch, conflict
//! detection) degrade to an empty or unchanged result instead of failing.
//!
//! ## Core Types
//!
//! - [`Value`]: the document tree (null, bool, number, string, sequence, mapping)
//! - [`Path`]: a location inside a tree (`/users/0/email`)
//! - [`ValidationError`] / [`ValidationErrors`]: located, categorized errors
//! - [`ValidationResult`]: the `{success, errors}` report
//! - [`Engine`]: the configured entry point for every operation
//! - [`TextApi`]: the same operations over plain strings and JSON envelopes
//!
//! ## Example
//!
//! ```rust
//! use docweave::{Engine, ErrorKind};
//!
//! let engine = Engine::new();
//! let schema = "\
//! type: object
//! properties:
//!   title:
//!     type: string
//!     minLength: 1
//!   tags:
//!     type: array
//!     items:
//!       type: string
//! required: [title]
//! ";
//!
//! let report = engine.validate("tags: [a, 3]\n", schema);
//! assert!(!report.is_success());
//! assert_eq!(report.errors().len(), 2);
//! assert!(report.errors().iter().all(|e| e.code == ErrorKind::SchemaValidationError));
//! ```

pub mod cache;
pub mod conflict;
pub mod convert;
pub mod engine;
pub mod error;
pub mod frontmatter;
pub mod interop;
pub mod patch;
pub mod path;
pub mod position;
pub mod schema;
pub mod syntax;
pub mod value;

pub use cache::SchemaCache;
pub use conflict::{Conflict, ConflictReport};
pub use engine::{Engine, EngineConfig};
pub use error::{ErrorKind, Validated, ValidationError, ValidationErrors, ValidationResult};
pub use frontmatter::Frontmatter;
pub use interop::{TextApi, ToEnvelope};
pub use patch::{EditOp, Patch, PatchError, PatchOutcome};
pub use path::{Path, PathSegment, PointerError};
pub use position::{Position, SourceMap};
pub use schema::{CompiledSchema, SchemaLike};
pub use syntax::{parse, serialize, ParseError};
pub use value::{Mapping, Number, Value};
