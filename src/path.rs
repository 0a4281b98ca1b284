//! Structural paths for locating values in a document tree.
//!
//! This module provides [`Path`] and [`PathSegment`] types for building and
//! representing locations inside a [`Value`](crate::Value). A path has two
//! textual forms: the JSON Pointer form used on the wire (`/users/0/email`)
//! and a dotted form used in human-readable messages (`users[0].email`).

use std::borrow::Cow;
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A segment of a structural path.
///
/// Paths are built from segments that represent either mapping-key access or
/// sequence indexing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A mapping key (e.g., `user`, `email`)
    Field(String),
    /// A sequence index (e.g., `[0]`, `[42]`)
    Index(usize),
}

impl PathSegment {
    /// Creates a new field segment.
    pub fn field(name: impl Into<String>) -> Self {
        PathSegment::Field(name.into())
    }

    /// Creates a new index segment.
    pub fn index(idx: usize) -> Self {
        PathSegment::Index(idx)
    }

    /// Returns the segment as a mapping key.
    ///
    /// Index segments render as their decimal form, so `/2023` can address a
    /// mapping key `"2023"`.
    pub fn as_key(&self) -> Cow<'_, str> {
        match self {
            PathSegment::Field(name) => Cow::Borrowed(name),
            PathSegment::Index(idx) => Cow::Owned(idx.to_string()),
        }
    }

    /// Returns the segment as a sequence index, if it denotes one.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::Index(idx) => Some(*idx),
            PathSegment::Field(name) => parse_index(name),
        }
    }

    fn from_pointer_token(token: &str) -> Result<Self, PointerError> {
        let unescaped = unescape_token(token)?;
        Ok(match parse_index(&unescaped) {
            Some(idx) => PathSegment::Index(idx),
            None => PathSegment::Field(unescaped),
        })
    }
}

/// Parses a canonical decimal index (no sign, no leading zeros).
fn parse_index(s: &str) -> Option<usize> {
    let canonical = !s.is_empty()
        && s.bytes().all(|b| b.is_ascii_digit())
        && (s == "0" || !s.starts_with('0'));
    if canonical {
        s.parse().ok()
    } else {
        None
    }
}

fn unescape_token(token: &str) -> Result<String, PointerError> {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c == '~' {
            match chars.next() {
                Some('0') => out.push('~'),
                Some('1') => out.push('/'),
                _ => return Err(PointerError::InvalidEscape(token.to_string())),
            }
        } else {
            out.push(c);
        }
    }
    Ok(out)
}

/// Errors produced when parsing a JSON Pointer string into a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PointerError {
    /// A non-empty pointer did not begin with `/`.
    #[error("pointer '{0}' must be empty or start with '/'")]
    MissingLeadingSlash(String),

    /// A `~` was not followed by `0` or `1`.
    #[error("pointer token '{0}' contains an invalid '~' escape")]
    InvalidEscape(String),
}

/// A path to a value in a document tree.
///
/// `Path` represents locations like `/users/0/email` and provides methods for
/// building paths incrementally.
///
/// # Example
///
/// ```rust
/// use docweave::Path;
///
/// let path = Path::root()
///     .push_field("users")
///     .push_index(0)
///     .push_field("email");
///
/// assert_eq!(path.to_string(), "/users/0/email");
/// assert_eq!(path.dotted(), "users[0].email");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// Creates an empty path representing the root value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from a single field segment.
    pub fn from_field(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Field(name.into())],
        }
    }

    /// Creates a path from a single index segment.
    pub fn from_index(idx: usize) -> Self {
        Self {
            segments: vec![PathSegment::Index(idx)],
        }
    }

    /// Returns a new path with a field segment appended.
    ///
    /// This method does not modify the original path; it returns a new one.
    pub fn push_field(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Field(name.into()));
        Self { segments }
    }

    /// Returns a new path with an index segment appended.
    ///
    /// This method does not modify the original path; it returns a new one.
    pub fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Returns a new path with `segment` appended.
    pub fn push(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// Returns true if this is the root path (no segments).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments in this path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Returns the parent path (all segments except the last), or None if this is root.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            None
        } else {
            Some(Self {
                segments: self.segments[..self.segments.len() - 1].to_vec(),
            })
        }
    }

    /// Returns the last segment, or None if this is root.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Returns true if `prefix` addresses this node or one of its ancestors.
    ///
    /// Segments compare by their key form, so `/items/0` and a pointer parsed
    /// from the same text always agree.
    pub fn starts_with(&self, prefix: &Path) -> bool {
        prefix.len() <= self.len()
            && self
                .segments
                .iter()
                .zip(prefix.segments.iter())
                .all(|(a, b)| a.as_key() == b.as_key())
    }

    /// Returns true if either path is a prefix of the other.
    pub fn overlaps(&self, other: &Path) -> bool {
        self.starts_with(other) || other.starts_with(self)
    }

    /// Renders the JSON Pointer form (RFC 6901). The root is the empty string.
    pub fn to_pointer(&self) -> String {
        self.to_string()
    }

    /// Parses a JSON Pointer string.
    ///
    /// Canonical decimal tokens become index segments; everything else is a
    /// field segment.
    pub fn parse_pointer(pointer: &str) -> Result<Self, PointerError> {
        if pointer.is_empty() {
            return Ok(Self::root());
        }
        let rest = pointer
            .strip_prefix('/')
            .ok_or_else(|| PointerError::MissingLeadingSlash(pointer.to_string()))?;
        let segments = rest
            .split('/')
            .map(PathSegment::from_pointer_token)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    /// Renders the dotted form used in messages (`users[0].email`).
    pub fn dotted(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) => {
                    if i > 0 {
                        out.push('.');
                    }
                    out.push_str(name);
                }
                PathSegment::Index(idx) => {
                    out.push('[');
                    out.push_str(&idx.to_string());
                    out.push(']');
                }
            }
        }
        out
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/")?;
            match segment {
                PathSegment::Field(name) => {
                    write!(f, "{}", name.replace('~', "~0").replace('/', "~1"))?
                }
                PathSegment::Index(idx) => write!(f, "{}", idx)?,
            }
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = PointerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse_pointer(s)
    }
}

impl FromIterator<PathSegment> for Path {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_pointer())
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pointer = String::deserialize(deserializer)?;
        Path::parse_pointer(&pointer).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_path_is_empty() {
        let path = Path::root();
        assert!(path.is_root());
        assert!(path.is_empty());
        assert_eq!(path.len(), 0);
        assert_eq!(path.to_string(), "");
        assert_eq!(path.dotted(), "");
    }

    #[test]
    fn test_single_field() {
        let path = Path::root().push_field("user");
        assert_eq!(path.to_string(), "/user");
        assert_eq!(path.dotted(), "user");
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn test_field_with_index() {
        let path = Path::root().push_field("users").push_index(0);
        assert_eq!(path.to_string(), "/users/0");
        assert_eq!(path.dotted(), "users[0]");
    }

    #[test]
    fn test_deeply_nested() {
        let path = Path::root()
            .push_field("body")
            .push_field("data")
            .push_index(42)
            .push_field("items")
            .push_index(0)
            .push_field("name");
        assert_eq!(path.to_string(), "/body/data/42/items/0/name");
        assert_eq!(path.dotted(), "body.data[42].items[0].name");
    }

    #[test]
    fn test_path_immutability() {
        let base = Path::root().push_field("users");
        let path_a = base.push_index(0);
        let path_b = base.push_index(1);

        assert_eq!(base.to_string(), "/users");
        assert_eq!(path_a.to_string(), "/users/0");
        assert_eq!(path_b.to_string(), "/users/1");
    }

    #[test]
    fn test_parent_path() {
        let path = Path::root()
            .push_field("users")
            .push_index(0)
            .push_field("email");

        let parent = path.parent().unwrap();
        assert_eq!(parent.to_string(), "/users/0");

        let grandparent = parent.parent().unwrap();
        assert_eq!(grandparent.to_string(), "/users");

        let root = grandparent.parent().unwrap();
        assert!(root.is_root());

        assert!(root.parent().is_none());
    }

    #[test]
    fn test_pointer_escaping_round_trip() {
        let path = Path::root().push_field("a/b").push_field("c~d");
        assert_eq!(path.to_string(), "/a~1b/c~0d");
        assert_eq!(Path::parse_pointer("/a~1b/c~0d").unwrap(), path);
    }

    #[test]
    fn test_parse_pointer_segments() {
        let path: Path = "/items/0/name".parse().unwrap();
        let segments: Vec<_> = path.segments().collect();
        assert_eq!(segments[0], &PathSegment::Field("items".to_string()));
        assert_eq!(segments[1], &PathSegment::Index(0));
        assert_eq!(segments[2], &PathSegment::Field("name".to_string()));

        // Leading zeros and signs are keys, not indices.
        let path: Path = "/007/-1".parse().unwrap();
        assert_eq!(path.last(), Some(&PathSegment::Field("-1".to_string())));
    }

    #[test]
    fn test_parse_pointer_errors() {
        assert!(matches!(
            Path::parse_pointer("title"),
            Err(PointerError::MissingLeadingSlash(_))
        ));
        assert!(matches!(
            Path::parse_pointer("/bad~2"),
            Err(PointerError::InvalidEscape(_))
        ));
        assert_eq!(Path::parse_pointer("").unwrap(), Path::root());
        assert_eq!(
            Path::parse_pointer("/").unwrap(),
            Path::root().push_field("")
        );
    }

    #[test]
    fn test_prefix_and_overlap() {
        let items = Path::root().push_field("items");
        let first = items.push_index(0);
        let parsed: Path = "/items/0/name".parse().unwrap();

        assert!(first.starts_with(&items));
        assert!(parsed.starts_with(&first));
        assert!(!items.starts_with(&first));
        assert!(items.overlaps(&parsed));
        assert!(!first.overlaps(&items.push_index(1)));
        assert!(Path::root().overlaps(&parsed));
    }

    #[test]
    fn test_index_segment_key_form() {
        assert_eq!(PathSegment::Index(3).as_key(), "3");
        assert_eq!(PathSegment::field("3").as_index(), Some(3));
        assert_eq!(PathSegment::field("03").as_index(), None);
        assert_eq!(PathSegment::field("x").as_index(), None);
    }

    #[test]
    fn test_serde_uses_pointer_form() {
        let path = Path::root().push_field("title");
        assert_eq!(serde_json::to_string(&path).unwrap(), r#""/title""#);
        let back: Path = serde_json::from_str(r#""/title""#).unwrap();
        assert_eq!(back, path);
    }
}
