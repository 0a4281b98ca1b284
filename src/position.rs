//! Source positions and the mapping between positions and structural paths.

use std::fmt::{self, Display};

use indexmap::IndexMap;

use crate::path::Path;

/// A 1-based (line, column) location in source text.
///
/// Line 0 means the location is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// The position used when nothing better is known.
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn is_known(&self) -> bool {
        self.line > 0
    }

    /// Shifts the position down by `lines`, for text embedded in a larger document.
    pub fn offset_lines(self, lines: u32) -> Self {
        if self.is_known() {
            Self::new(self.line + lines, self.column)
        } else {
            self
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Where each node of a parsed document started.
///
/// Built by [`parse_with_source_map`](crate::syntax::parse_with_source_map).
/// Entries are kept in document order.
///
/// # Example
///
/// ```rust
/// use docweave::{syntax, Path};
///
/// let (_, map) = syntax::parse_with_source_map("title: A\ntags:\n  - x\n").unwrap();
/// let tag = Path::root().push_field("tags").push_index(0);
///
/// assert_eq!(map.position_of(&tag).line, 3);
/// assert_eq!(map.path_at(3), Some(&tag));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    entries: IndexMap<Path, Position>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records where `path` starts. The first record for a path wins.
    pub fn record(&mut self, path: Path, position: Position) {
        self.entries.entry(path).or_insert(position);
    }

    /// Returns the position of `path`, falling back to its nearest recorded
    /// ancestor. Unknown paths with no recorded ancestor yield line 0.
    pub fn position_of(&self, path: &Path) -> Position {
        let mut current = Some(path.clone());
        while let Some(p) = current {
            if let Some(position) = self.entries.get(&p) {
                return *position;
            }
            current = p.parent();
        }
        Position::unknown()
    }

    /// Returns the exact recorded position of `path`, if any.
    pub fn get(&self, path: &Path) -> Option<Position> {
        self.entries.get(path).copied()
    }

    /// Returns the deepest node that starts on `line`, or failing that the
    /// last node starting before it.
    pub fn path_at(&self, line: u32) -> Option<&Path> {
        let best_line = self
            .entries
            .values()
            .map(|p| p.line)
            .filter(|l| *l > 0 && *l <= line)
            .max()?;
        self.entries
            .iter()
            .filter(|(_, p)| p.line == best_line)
            .max_by_key(|(path, p)| (path.len(), p.column))
            .map(|(path, _)| path)
    }

    /// Number of recorded nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Position)> {
        self.entries.iter()
    }
}
