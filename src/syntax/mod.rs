//! Text syntax for structured documents.
//!
//! Reading goes through `yaml_rust2` marked events so every node keeps its
//! source position. Writing goes through `serde_yaml`. Aliases, tags,
//! non-scalar keys and multi-document streams are rejected with a located
//! [`ParseError`].
//!
//! ```rust
//! use docweave::syntax;
//!
//! let value = syntax::parse("tags: [a, b]\n").unwrap();
//! assert_eq!(syntax::serialize(&value), "tags:\n- a\n- b\n");
//! ```

mod error;
mod parser;
mod scalar;
mod serializer;

pub use error::{ParseError, ParseResult};
pub use parser::{parse, parse_with_source_map, Parser, DEFAULT_MAX_DEPTH};
pub use serializer::serialize;
