//! Event-driven tree building on top of `yaml_rust2`.
//!
//! The scanner owns the grammar. [`TreeBuilder`] receives marked events,
//! assembles the [`Value`] tree, records where every node starts and enforces
//! the rules the grammar does not: unique keys, scalar keys, one document and
//! a nesting limit.

use tracing::debug;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser as EventParser};
use yaml_rust2::scanner::{Marker, ScanError, TScalarStyle};

use crate::path::Path;
use crate::position::{Position, SourceMap};
use crate::value::{Mapping, Value};

use super::error::{ParseError, ParseResult};
use super::scalar::infer;

/// Nesting limit applied when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Parses `text` into a [`Value`].
///
/// # Example
///
/// ```rust
/// use docweave::{syntax, Value};
///
/// let value = syntax::parse("title: Hello\ncount: 3\n").unwrap();
/// assert_eq!(value.get("title"), Some(&Value::from("Hello")));
/// assert_eq!(value.get("count").and_then(Value::as_i64), Some(3));
/// ```
pub fn parse(text: &str) -> ParseResult<Value> {
    Parser::new(text).parse().map(|(value, _)| value)
}

/// Parses `text` and records where every node starts.
pub fn parse_with_source_map(text: &str) -> ParseResult<(Value, SourceMap)> {
    Parser::new(text).parse()
}

/// Parser with a configurable nesting limit.
///
/// The root sits at depth 0 and every nested value, scalars included, one
/// level below its container.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'src> {
    text: &'src str,
    max_depth: usize,
}

impl<'src> Parser<'src> {
    pub fn new(text: &'src str) -> Self {
        Self {
            text,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn parse(self) -> ParseResult<(Value, SourceMap)> {
        let mut builder = TreeBuilder::new(self.max_depth);
        let scanned = EventParser::new_from_str(self.text).load(&mut builder, true);
        let result = builder.finish(scanned);
        if let Err(err) = &result {
            debug!(error = %err, "parse failed");
        }
        result
    }
}

fn position(mark: Marker) -> Position {
    Position::new(mark.line() as u32, mark.col() as u32 + 1)
}

enum Frame {
    Sequence {
        path: Path,
        items: Vec<Value>,
    },
    Mapping {
        path: Path,
        entries: Mapping,
        pending_key: Option<String>,
    },
}

impl Frame {
    fn into_value(self) -> Value {
        match self {
            Self::Sequence { items, .. } => Value::Sequence(items),
            Self::Mapping { entries, .. } => Value::Mapping(entries),
        }
    }
}

/// Assembles a tree from scanner events. The first error stops assembly.
struct TreeBuilder {
    max_depth: usize,
    stack: Vec<Frame>,
    root: Option<Value>,
    source_map: SourceMap,
    documents: usize,
    error: Option<ParseError>,
}

impl TreeBuilder {
    fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            stack: Vec::new(),
            root: None,
            source_map: SourceMap::new(),
            documents: 0,
            error: None,
        }
    }

    fn finish(self, scanned: Result<(), ScanError>) -> ParseResult<(Value, SourceMap)> {
        if let Some(err) = self.error {
            return Err(err);
        }
        scanned?;
        Ok((self.root.unwrap_or(Value::Null), self.source_map))
    }

    /// True when the next scalar is a mapping key rather than a value.
    fn expects_key(&self) -> bool {
        matches!(
            self.stack.last(),
            Some(Frame::Mapping {
                pending_key: None,
                ..
            })
        )
    }

    /// Path of the next value, given the innermost open collection.
    fn next_path(&self) -> Path {
        match self.stack.last() {
            None => Path::root(),
            Some(Frame::Sequence { path, items }) => path.push_index(items.len()),
            Some(Frame::Mapping {
                path, pending_key, ..
            }) => match pending_key {
                Some(key) => path.push_field(key.as_str()),
                None => path.clone(),
            },
        }
    }

    fn start_node(&mut self, pos: Position) -> ParseResult<Path> {
        if self.stack.len() > self.max_depth {
            return Err(ParseError::too_deep(pos, self.max_depth));
        }
        let path = self.next_path();
        self.source_map.record(path.clone(), pos);
        Ok(path)
    }

    fn attach(&mut self, value: Value) {
        match self.stack.last_mut() {
            None => self.root = Some(value),
            Some(Frame::Sequence { items, .. }) => items.push(value),
            Some(Frame::Mapping {
                entries,
                pending_key,
                ..
            }) => {
                if let Some(key) = pending_key.take() {
                    entries.insert(key, value);
                }
            }
        }
    }

    fn key(&mut self, key: String, pos: Position) -> ParseResult<()> {
        if let Some(Frame::Mapping {
            path,
            entries,
            pending_key,
        }) = self.stack.last_mut()
        {
            if entries.contains_key(&key) {
                return Err(ParseError::duplicate_key(pos, key));
            }
            self.source_map.record(path.push_field(key.as_str()), pos);
            *pending_key = Some(key);
        }
        Ok(())
    }

    fn handle(&mut self, event: Event, pos: Position) -> ParseResult<()> {
        match event {
            Event::DocumentStart { .. } => {
                self.documents += 1;
                if self.documents > 1 {
                    return Err(ParseError::multiple_documents(pos));
                }
            }
            Event::Alias { .. } => return Err(ParseError::unsupported(pos, "aliases")),
            Event::Scalar(text, style, _, tag) => {
                if tag.is_some() {
                    return Err(ParseError::unsupported(pos, "tags"));
                }
                if self.expects_key() {
                    return self.key(text, pos);
                }
                self.start_node(pos)?;
                let value = if style == TScalarStyle::Plain {
                    infer(&text)
                } else {
                    Value::String(text)
                };
                self.attach(value);
            }
            Event::SequenceStart(_, tag) => {
                self.open(pos, tag.is_some())?;
                let path = self.start_node(pos)?;
                self.stack.push(Frame::Sequence {
                    path,
                    items: Vec::new(),
                });
            }
            Event::MappingStart(_, tag) => {
                self.open(pos, tag.is_some())?;
                let path = self.start_node(pos)?;
                self.stack.push(Frame::Mapping {
                    path,
                    entries: Mapping::new(),
                    pending_key: None,
                });
            }
            Event::SequenceEnd { .. } | Event::MappingEnd { .. } => {
                if let Some(frame) = self.stack.pop() {
                    self.attach(frame.into_value());
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn open(&self, pos: Position, tagged: bool) -> ParseResult<()> {
        if tagged {
            return Err(ParseError::unsupported(pos, "tags"));
        }
        if self.expects_key() {
            return Err(ParseError::complex_key(pos));
        }
        Ok(())
    }
}

impl MarkedEventReceiver for TreeBuilder {
    fn on_event(&mut self, event: Event, mark: Marker) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.handle(event, position(mark)) {
            self.error = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;

    fn map(pairs: Vec<(&str, Value)>) -> Value {
        pairs.into_iter().collect()
    }

    #[test]
    fn test_parse_block_mapping() {
        let value = parse("title: Hello\ncount: 3\nratio: 0.5\ndraft: false\nnote: ~\n").unwrap();
        assert_eq!(
            value,
            map(vec![
                ("title", Value::from("Hello")),
                ("count", Value::from(3i64)),
                ("ratio", Value::from(0.5f64)),
                ("draft", Value::Bool(false)),
                ("note", Value::Null),
            ])
        );
    }

    #[test]
    fn test_parse_nested_and_sequences() {
        let text = "meta:\n  author: Ann\n  tags:\n    - a\n    - b\nlist:\n- 1\n- 2\n";
        let value = parse(text).unwrap();
        let meta = value.get("meta").unwrap();
        assert_eq!(meta.get("author"), Some(&Value::from("Ann")));
        assert_eq!(
            meta.get("tags"),
            Some(&Value::Sequence(vec![Value::from("a"), Value::from("b")]))
        );
        assert_eq!(
            value.get("list"),
            Some(&Value::Sequence(vec![Value::from(1i64), Value::from(2i64)]))
        );
    }

    #[test]
    fn test_parse_flow_collections() {
        let value = parse("tags: [a, 'b c', \"d\"]\nmeta: {x: 1, y: [true, null]}\nempty: {}\nnone: []\n").unwrap();
        assert_eq!(
            value.get("tags"),
            Some(&Value::Sequence(vec![
                Value::from("a"),
                Value::from("b c"),
                Value::from("d")
            ]))
        );
        let meta = value.get("meta").unwrap();
        assert_eq!(meta.get("x"), Some(&Value::from(1i64)));
        assert_eq!(
            meta.get("y"),
            Some(&Value::Sequence(vec![Value::Bool(true), Value::Null]))
        );
        assert_eq!(value.get("empty"), Some(&Value::Mapping(Mapping::new())));
        assert_eq!(value.get("none"), Some(&Value::Sequence(vec![])));
    }

    #[test]
    fn test_quoted_scalars_stay_strings() {
        let value = parse("a: \"line\\nbreak\"\nb: 'it''s'\nc: '123'\nd: \"true\"\n").unwrap();
        assert_eq!(value.get("a"), Some(&Value::from("line\nbreak")));
        assert_eq!(value.get("b"), Some(&Value::from("it's")));
        assert_eq!(value.get("c"), Some(&Value::from("123")));
        assert_eq!(value.get("d"), Some(&Value::from("true")));
    }

    #[test]
    fn test_parse_block_scalars() {
        let text = "lit: |\n  one\n  two\nstrip: |-\n  x\nfold: >\n  a\n  b\nend: 1\n";
        let value = parse(text).unwrap();
        assert_eq!(value.get("lit"), Some(&Value::from("one\ntwo\n")));
        assert_eq!(value.get("strip"), Some(&Value::from("x")));
        assert_eq!(value.get("fold"), Some(&Value::from("a b\n")));
        assert_eq!(value.get("end"), Some(&Value::from(1i64)));
    }

    #[test]
    fn test_parse_root_scalars_and_empty() {
        assert_eq!(parse("").unwrap(), Value::Null);
        assert_eq!(parse("# only a comment\n").unwrap(), Value::Null);
        assert_eq!(parse("hello").unwrap(), Value::from("hello"));
        assert_eq!(parse("42\n").unwrap(), Value::Number(Number::Int(42)));
        assert_eq!(parse("- a\n- b\n").unwrap().as_sequence().map(Vec::len), Some(2));
    }

    #[test]
    fn test_error_duplicate_key() {
        let err = parse("a: 1\nb: 2\na: 3\n").unwrap_err();
        assert_eq!(err, ParseError::duplicate_key(Position::new(3, 1), "a"));
    }

    #[test]
    fn test_error_scanner_positions() {
        let err = parse("title: Invalid\n  indentation: wrong\n").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
        assert_eq!(err.position().line, 2);
        assert!(parse("title: \"open\n").is_err());
        assert!(parse("tags: [a, b\n").is_err());
    }

    #[test]
    fn test_error_unsupported_constructs() {
        assert!(matches!(
            parse("a: &x 1\nb: *x\n"),
            Err(ParseError::Unsupported { what: "aliases", .. })
        ));
        assert!(matches!(
            parse("a: !!str 1\n"),
            Err(ParseError::Unsupported { what: "tags", .. })
        ));
        assert!(matches!(parse("? [a]\n: 1\n"), Err(ParseError::ComplexKey { .. })));
        let err = parse("a: 1\n---\nb: 2\n").unwrap_err();
        assert!(matches!(err, ParseError::MultipleDocuments { .. }));
        assert_eq!(err.position().line, 2);
    }

    #[test]
    fn test_error_too_deep() {
        let err = Parser::new("a:\n  b:\n    c: 1\n")
            .with_max_depth(2)
            .parse()
            .unwrap_err();
        assert!(matches!(err, ParseError::TooDeep { max: 2, .. }));
        assert_eq!(err.position().line, 3);

        let nested = format!("v: {}{}", "[".repeat(5), "]".repeat(5));
        assert!(Parser::new(&nested).with_max_depth(3).parse().is_err());
        assert!(Parser::new(&nested).with_max_depth(10).parse().is_ok());
    }

    #[test]
    fn test_source_map_lines() {
        let text = "title: A\nmeta:\n  tags:\n    - x\n    - y\nlist: [1, 2]\n";
        let (_, map) = parse_with_source_map(text).unwrap();
        let tags = Path::from_field("meta").push_field("tags");
        assert_eq!(map.position_of(&Path::from_field("title")), Position::new(1, 1));
        assert_eq!(map.position_of(&tags).line, 3);
        assert_eq!(map.position_of(&tags.push_index(1)).line, 5);
        assert_eq!(map.position_of(&Path::from_field("list").push_index(1)).line, 6);
    }
}
