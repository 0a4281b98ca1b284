//! Conversion between heading-structured text and document trees.
//!
//! The tree shape is:
//!
//! ```text
//! frontmatter: {...}          # leading frontmatter block, when present
//! title: Doc                  # first level-1 heading
//! content: text before the first level-2 heading
//! sections:
//!   - heading: S1             # each level-2 heading
//!     content: body
//!     subsections:            # level-3 headings under it
//!       - heading: S1.1
//!         content: body
//! ```
//!
//! Optional fields are omitted when empty. Headings are found with
//! `pulldown_cmark`, so ATX and setext headings both count, while headings
//! inside code, HTML blocks, lists or block quotes are ordinary text.
//! Conversion never fails.

use std::ops::Range;

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

use crate::frontmatter;
use crate::syntax;
use crate::value::{Mapping, Value};

/// One heading and the text under it.
#[derive(Debug, Default)]
struct Node {
    heading: String,
    body: Vec<String>,
    children: Vec<Node>,
}

impl Node {
    fn new(heading: String) -> Self {
        Self {
            heading,
            ..Self::default()
        }
    }
}

/// A heading as reported by the Markdown parser.
#[derive(Debug)]
struct Heading {
    level: HeadingLevel,
    text: String,
    span: Range<usize>,
}

/// Collects the headings that start a line, in document order.
fn headings(text: &str) -> Vec<Heading> {
    let mut found = Vec::new();
    let mut open: Option<Heading> = None;
    for (event, span) in Parser::new(text).into_offset_iter() {
        match event {
            Event::Start(Tag::Heading { level, .. }) if starts_line(text, span.start) => {
                open = Some(Heading {
                    level,
                    text: String::new(),
                    span,
                });
            }
            Event::End(TagEnd::Heading(_)) => found.extend(open.take()),
            Event::Text(chunk) | Event::Code(chunk) | Event::InlineHtml(chunk) => {
                if let Some(heading) = open.as_mut() {
                    heading.text.push_str(&chunk);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(heading) = open.as_mut() {
                    heading.text.push(' ');
                }
            }
            _ => {}
        }
    }
    for heading in &mut found {
        heading.text = heading.text.trim().to_string();
    }
    found
}

/// True when only spaces precede `offset` on its line.
fn starts_line(text: &str, offset: usize) -> bool {
    let line_start = text[..offset].rfind(['\n', '\r']).map_or(0, |i| i + 1);
    text[line_start..offset].chars().all(|c| c == ' ')
}

/// The body that text between headings currently belongs to.
fn current_body<'n>(intro: &'n mut Vec<String>, sections: &'n mut [Node]) -> &'n mut Vec<String> {
    match sections.last_mut() {
        Some(section) => match section.children.last_mut() {
            Some(sub) => &mut sub.body,
            None => &mut section.body,
        },
        None => intro,
    }
}

/// Normalizes line endings to `\n` and drops leading and trailing blank lines.
fn trim_blank_lines(piece: &str) -> String {
    let normalized = piece.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();
    let is_blank = |line: &&str| line.trim().is_empty();
    let start = lines.iter().position(|l| !is_blank(l));
    let end = lines.iter().rposition(|l| !is_blank(l));
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}

/// Joins the pieces of a body. Pieces split by a heading stay separate
/// paragraphs.
fn join_body(pieces: &[String]) -> String {
    pieces
        .iter()
        .map(|piece| trim_blank_lines(piece))
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Converts heading-structured text into a document tree.
///
/// # Example
///
/// ```rust
/// use docweave::convert::structured_to_tree;
///
/// let tree = structured_to_tree("# Doc\n## S1\nbody1\n## S2\nbody2");
/// assert_eq!(tree.get("title").and_then(|t| t.as_str()), Some("Doc"));
/// let sections = tree.get("sections").and_then(|s| s.as_sequence()).unwrap();
/// assert_eq!(sections[1].get("content").and_then(|c| c.as_str()), Some("body2"));
/// ```
pub fn structured_to_tree(text: &str) -> Value {
    let (front, text) = match frontmatter::leading_block(text) {
        Some((map, _, rest)) => (Some(map).filter(|m| !m.is_empty()), rest),
        None => (None, text),
    };

    let mut title: Option<String> = None;
    let mut intro: Vec<String> = Vec::new();
    let mut sections: Vec<Node> = Vec::new();
    let mut cursor = 0;

    for heading in headings(text) {
        let structural = match heading.level {
            HeadingLevel::H1 => title.is_none(),
            HeadingLevel::H2 => true,
            HeadingLevel::H3 => !sections.is_empty(),
            _ => false,
        };
        if !structural {
            continue;
        }

        current_body(&mut intro, &mut sections).push(text[cursor..heading.span.start].to_string());
        cursor = heading.span.end;

        match heading.level {
            HeadingLevel::H1 => title = Some(heading.text),
            HeadingLevel::H2 => sections.push(Node::new(heading.text)),
            _ => {
                if let Some(section) = sections.last_mut() {
                    section.children.push(Node::new(heading.text));
                }
            }
        }
    }
    current_body(&mut intro, &mut sections).push(text[cursor..].to_string());

    let mut root = Mapping::new();
    if let Some(front) = front {
        root.insert("frontmatter".to_string(), Value::Mapping(front));
    }
    if let Some(title) = title {
        root.insert("title".to_string(), Value::String(title));
    }
    let content = join_body(&intro);
    if !content.is_empty() {
        root.insert("content".to_string(), Value::String(content));
    }
    if !sections.is_empty() {
        let sections = sections.into_iter().map(section_value).collect();
        root.insert("sections".to_string(), Value::Sequence(sections));
    }
    Value::Mapping(root)
}

fn section_value(node: Node) -> Value {
    let mut map = Mapping::new();
    map.insert("heading".to_string(), Value::String(node.heading));
    map.insert("content".to_string(), Value::String(join_body(&node.body)));
    if !node.children.is_empty() {
        let subsections = node.children.into_iter().map(section_value).collect();
        map.insert("subsections".to_string(), Value::Sequence(subsections));
    }
    Value::Mapping(map)
}

/// Converts a document tree back into heading-structured text.
///
/// Fields other than those of the tree shape are ignored, as are trees that
/// are not mappings.
///
/// # Example
///
/// ```rust
/// use docweave::convert::{structured_to_tree, tree_to_structured};
///
/// let tree = structured_to_tree("# Doc\n## S1\nbody1\n");
/// let text = tree_to_structured(&tree);
/// assert_eq!(text, "# Doc\n\n## S1\n\nbody1\n");
/// assert_eq!(structured_to_tree(&text), tree);
/// ```
pub fn tree_to_structured(tree: &Value) -> String {
    let Some(root) = tree.as_mapping() else {
        return String::new();
    };

    let mut out = String::new();
    if let Some(front) = root.get("frontmatter").and_then(Value::as_mapping) {
        if !front.is_empty() {
            out.push_str("---\n");
            out.push_str(&syntax::serialize(&Value::Mapping(front.clone())));
            out.push_str("---\n");
        }
    }

    let mut blocks: Vec<String> = Vec::new();
    if let Some(title) = root.get("title").and_then(Value::scalar_text) {
        blocks.push(heading_line(1, &title));
    }
    push_content(&mut blocks, root.get("content"));
    for section in sequence(root.get("sections")) {
        push_node(&mut blocks, section, 2);
        for sub in sequence(section.get("subsections")) {
            push_node(&mut blocks, sub, 3);
        }
    }

    if !blocks.is_empty() {
        let body = blocks.join("\n\n");
        // Leading content that reads as a frontmatter block gets an empty
        // block in front of it.
        if out.is_empty() && frontmatter::leading_block(&body).is_some() {
            out.push_str("---\n---\n");
        }
        out.push_str(&body);
        out.push('\n');
    }
    out
}

fn sequence(value: Option<&Value>) -> impl Iterator<Item = &Value> {
    value
        .and_then(Value::as_sequence)
        .into_iter()
        .flatten()
        .filter(|v| v.as_mapping().is_some())
}

fn push_node(blocks: &mut Vec<String>, node: &Value, level: usize) {
    let text = node
        .get("heading")
        .and_then(Value::scalar_text)
        .unwrap_or_default();
    blocks.push(heading_line(level, &text));
    push_content(blocks, node.get("content"));
}

fn push_content(blocks: &mut Vec<String>, content: Option<&Value>) {
    if let Some(text) = content.and_then(Value::scalar_text) {
        if !text.trim().is_empty() {
            blocks.push(text);
        }
    }
}

/// Renders a heading with its text escaped so it reads back verbatim.
fn heading_line(level: usize, text: &str) -> String {
    let hashes = "#".repeat(level);
    let text = text.replace(['\r', '\n'], " ");
    let text = text.trim();
    if text.is_empty() {
        return hashes;
    }
    let mut line = hashes;
    line.push(' ');
    for c in text.chars() {
        if matches!(c, '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '&' | '#' | '!') {
            line.push('\\');
        }
        line.push(c);
    }
    line
}
