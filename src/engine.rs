//! The engine handle.
//!
//! [`Engine`] bundles an [`EngineConfig`] with the schema cache and exposes
//! every document operation. It holds no per-call state, so one engine can be
//! shared between threads.

use std::sync::Arc;

use stillwater::Validation;
use tracing::{debug, instrument, warn};

use crate::cache::SchemaCache;
use crate::conflict::{self, ConflictReport};
use crate::convert;
use crate::error::{Validated, ValidationError, ValidationResult};
use crate::frontmatter::{self, Frontmatter};
use crate::patch::{self, Patch, PatchOutcome};
use crate::position::SourceMap;
use crate::schema::CompiledSchema;
use crate::syntax::{self, Parser, DEFAULT_MAX_DEPTH};
use crate::value::Value;

/// Engine settings.
///
/// # Example
///
/// ```rust
/// use docweave::{Engine, EngineConfig};
///
/// let engine = Engine::with_config(
///     EngineConfig::new()
///         .with_max_depth(32)
///         .with_schema_cache_capacity(0)
///         .with_allow_missing_frontmatter(true),
/// );
/// assert_eq!(engine.config().max_depth, 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Deepest nesting the parser accepts.
    pub max_depth: usize,
    /// Compiled schemas kept in the cache; 0 disables caching.
    pub schema_cache_capacity: usize,
    /// Whether documents without frontmatter pass frontmatter validation.
    pub allow_missing_frontmatter: bool,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_schema_cache_capacity(mut self, capacity: usize) -> Self {
        self.schema_cache_capacity = capacity;
        self
    }

    pub fn with_allow_missing_frontmatter(mut self, allow: bool) -> Self {
        self.allow_missing_frontmatter = allow;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            schema_cache_capacity: SchemaCache::DEFAULT_CAPACITY,
            allow_missing_frontmatter: false,
        }
    }
}

/// Entry point for all document operations.
///
/// Operations never panic on bad input. Validating operations return a
/// [`ValidationResult`]; diff, patch and conflict operations degrade to an
/// empty or unchanged result when an input does not parse.
///
/// # Example
///
/// ```rust
/// use docweave::Engine;
///
/// let engine = Engine::new();
/// let schema = "type: object\nproperties:\n  title:\n    type: string\nrequired: [title]\n";
///
/// assert!(engine.validate("title: Hello\n", schema).is_success());
///
/// let report = engine.validate("content: x\n", schema);
/// assert_eq!(report.errors()[0].path.to_string(), "/title");
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    schemas: SchemaCache,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let schemas = SchemaCache::new(config.schema_cache_capacity);
        Self { config, schemas }
    }

    /// The crate version.
    pub fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn schema_cache(&self) -> &SchemaCache {
        &self.schemas
    }

    /// Parses document text.
    pub fn parse(&self, text: &str) -> Result<Value, ValidationError> {
        self.parse_with_source_map(text).map(|(value, _)| value)
    }

    /// Parses document text and records where each node starts.
    pub fn parse_with_source_map(&self, text: &str) -> Result<(Value, SourceMap), ValidationError> {
        Parser::new(text)
            .with_max_depth(self.config.max_depth)
            .parse()
            .map_err(ValidationError::from)
    }

    /// Renders a tree as document text.
    pub fn serialize(&self, value: &Value) -> String {
        syntax::serialize(value)
    }

    /// Compiles schema text, through the cache.
    pub fn compiled_schema(&self, schema_text: &str) -> Validated<Arc<CompiledSchema>> {
        self.schemas.get_or_compile(schema_text)
    }

    /// Checks that schema text is a well-formed schema.
    #[instrument(skip_all, fields(schema_len = schema_text.len()))]
    pub fn compile_schema(&self, schema_text: &str) -> ValidationResult {
        let report = ValidationResult::from_validation(self.compiled_schema(schema_text));
        debug!(errors = report.errors().len(), "schema compiled");
        report
    }

    /// Validates a document against a schema.
    ///
    /// A document that does not parse yields its single parse error; a schema
    /// that does not compile yields its compile errors. Otherwise every
    /// violation is reported with its path and source line.
    #[instrument(skip_all, fields(doc_len = document_text.len(), schema_len = schema_text.len()))]
    pub fn validate(&self, document_text: &str, schema_text: &str) -> ValidationResult {
        let (document, source_map) = match self.parse_with_source_map(document_text) {
            Ok(parsed) => parsed,
            Err(error) => {
                debug!(line = error.line, "document does not parse");
                return ValidationResult::single(error);
            }
        };
        let report = match self.compiled_schema(schema_text) {
            Validation::Success(schema) => {
                ValidationResult::from_validation(schema.validate_located(&document, &source_map))
            }
            Validation::Failure(errors) => ValidationResult::failure(errors),
        };
        debug!(errors = report.errors().len(), "document validated");
        report
    }

    /// Extracts the frontmatter block, if there is a usable one.
    pub fn extract_frontmatter(&self, text: &str) -> Option<Frontmatter> {
        frontmatter::extract_frontmatter(text)
    }

    /// Validates the frontmatter block of a document.
    #[instrument(skip_all, fields(len = text.len()))]
    pub fn parse_and_validate_frontmatter(&self, text: &str) -> ValidationResult {
        let report = ValidationResult::from_validation(frontmatter::check_frontmatter(
            text,
            self.config.allow_missing_frontmatter,
        ));
        debug!(errors = report.errors().len(), "frontmatter checked");
        report
    }

    /// Converts heading-structured text into a tree.
    pub fn structured_to_tree(&self, text: &str) -> Value {
        convert::structured_to_tree(text)
    }

    /// Converts a tree back into heading-structured text.
    pub fn tree_to_structured(&self, tree: &Value) -> String {
        convert::tree_to_structured(tree)
    }

    /// Computes the edit script between two document texts.
    ///
    /// Returns an empty patch when either text does not parse; an empty patch
    /// then means "nothing comparable", not "no changes".
    #[instrument(skip_all)]
    pub fn diff(&self, base_text: &str, edited_text: &str) -> Patch {
        match self.parse_pair(base_text, edited_text) {
            Some((base, edited)) => {
                let patch = patch::diff(&base, &edited);
                debug!(ops = patch.len(), "diff computed");
                patch
            }
            None => Patch::new(),
        }
    }

    /// Applies a patch to a parsed document, reporting skipped edits.
    pub fn apply_patch_outcome(
        &self,
        document_text: &str,
        patch: &Patch,
    ) -> Result<PatchOutcome, ValidationError> {
        let document = self.parse(document_text)?;
        Ok(patch::apply(document, patch))
    }

    /// Applies a patch to document text and renders the result.
    ///
    /// Text that does not parse is returned unchanged. Edits that do not fit
    /// the document are skipped.
    #[instrument(skip_all, fields(ops = patch.len()))]
    pub fn apply_patch(&self, document_text: &str, patch: &Patch) -> String {
        match self.apply_patch_outcome(document_text, patch) {
            Ok(outcome) => {
                debug!(
                    applied = outcome.applied,
                    skipped = outcome.skipped.len(),
                    "patch applied"
                );
                self.serialize(&outcome.value)
            }
            Err(error) => {
                warn!(line = error.line, "document does not parse, returning it unchanged");
                document_text.to_string()
            }
        }
    }

    /// Reports every location where `edited_text` differs from
    /// `current_text`. No conflicts when either text does not parse.
    #[instrument(skip_all)]
    pub fn detect_conflicts(&self, current_text: &str, edited_text: &str) -> ConflictReport {
        match self.parse_pair(current_text, edited_text) {
            Some((current, edited)) => {
                let report = conflict::detect_conflicts(&current, &edited);
                debug!(conflicts = report.len(), "conflicts detected");
                report
            }
            None => ConflictReport::none(),
        }
    }

    /// Reports locations both sides changed differently relative to `base_text`.
    #[instrument(skip_all)]
    pub fn three_way_conflicts(
        &self,
        base_text: &str,
        left_text: &str,
        right_text: &str,
    ) -> ConflictReport {
        let parsed = self
            .parse_pair(left_text, right_text)
            .and_then(|pair| self.parse_or_warn(base_text, "base").map(|base| (base, pair)));
        match parsed {
            Some((base, (left, right))) => conflict::three_way_conflicts(&base, &left, &right),
            None => ConflictReport::none(),
        }
    }

    fn parse_pair(&self, first: &str, second: &str) -> Option<(Value, Value)> {
        let first = self.parse_or_warn(first, "first");
        let second = self.parse_or_warn(second, "second");
        first.zip(second)
    }

    fn parse_or_warn(&self, text: &str, which: &str) -> Option<Value> {
        match self.parse(text) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(input = which, line = error.line, message = %error.message, "input does not parse");
                None
            }
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Engine>();
    assert_sync::<Engine>();
};
