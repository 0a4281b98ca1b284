//! Schema compilation cache.
//!
//! This module provides the [`SchemaCache`] type that memoizes compiled
//! schemas keyed by their source text, so repeated validation against the same
//! schema skips recompilation.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use stillwater::Validation;

use crate::error::{Validated, ValidationErrors};
use crate::schema::{self, CompiledSchema};

/// Outcome of compiling one schema text. Compile failures are cached too.
type CachedSchema = Result<Arc<CompiledSchema>, ValidationErrors>;

/// Type alias for the cache storage map.
type SchemaMap = Arc<RwLock<IndexMap<String, CachedSchema>>>;

/// A thread-safe, bounded cache of compiled schemas.
///
/// Entries are keyed by the exact schema text, so a changed schema is simply a
/// new key. When the cache is full the oldest entry is evicted. A capacity of
/// zero disables caching.
///
/// # Thread Safety
///
/// The cache uses `Arc<RwLock<...>>`:
/// - Lookups from many threads proceed concurrently (read access)
/// - Inserts are serialized (write access)
///
/// Compilation happens outside the lock; two threads racing on the same new
/// text may both compile it, and the first insert wins.
///
/// # Example
///
/// ```rust
/// use docweave::SchemaCache;
///
/// let cache = SchemaCache::new(8);
/// let schema = "type: object\nproperties:\n  title:\n    type: string\n";
///
/// assert!(cache.get_or_compile(schema).is_success());
/// assert!(cache.get_or_compile(schema).is_success());
/// assert_eq!(cache.len(), 1);
/// ```
pub struct SchemaCache {
    entries: SchemaMap,
    capacity: usize,
}

impl SchemaCache {
    /// Default number of schemas kept.
    pub const DEFAULT_CAPACITY: usize = 64;

    /// Creates an empty cache holding at most `capacity` schemas.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(IndexMap::new())),
            capacity,
        }
    }

    /// Returns the compiled schema for `text`, compiling it on a miss.
    pub fn get_or_compile(&self, text: &str) -> Validated<Arc<CompiledSchema>> {
        if let Some(cached) = self.entries.read().get(text) {
            tracing::trace!("schema cache hit");
            return to_validation(cached.clone());
        }

        let compiled = match schema::compile_text(text) {
            Validation::Success(compiled) => Ok(Arc::new(compiled)),
            Validation::Failure(errors) => Err(errors),
        };

        if self.capacity > 0 {
            let mut entries = self.entries.write();
            if !entries.contains_key(text) {
                while entries.len() >= self.capacity {
                    entries.shift_remove_index(0);
                }
                entries.insert(text.to_string(), compiled.clone());
            }
        }
        to_validation(compiled)
    }

    /// Returns true if `text` has a cached compilation.
    pub fn contains(&self, text: &str) -> bool {
        self.entries.read().contains_key(text)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every cached schema.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl Default for SchemaCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl Clone for SchemaCache {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            capacity: self.capacity,
        }
    }
}

impl std::fmt::Debug for SchemaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

fn to_validation(cached: CachedSchema) -> Validated<Arc<CompiledSchema>> {
    match cached {
        Ok(compiled) => Validation::Success(compiled),
        Err(errors) => Validation::Failure(errors),
    }
}
