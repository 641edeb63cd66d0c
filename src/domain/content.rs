//! Typed model of CMS-authored rich text.
//!
//! Documents arrive as loosely shaped JSON. They are decoded exactly once, at the
//! boundary, into the sum types below so the renderer never re-checks shape.
//! Decoding is strict only at the document level: a document must be `null`, a
//! string, or an object carrying a `blocks` array. Individual blocks decode
//! leniently so a single malformed entry never takes the whole document down.

use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub const DEFAULT_MAX_HEADING_LEVEL: u8 = 6;

/// Root value handed to the renderer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub enum ContentDocument {
    /// `null` or absent content; renders to nothing.
    Empty,
    /// Plain string content rendered verbatim.
    Text(String),
    /// Structured block document.
    Structured(Document),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    /// Authoring timestamp in milliseconds. Carried through, never interpreted.
    pub time: Option<i64>,
    /// Editor format version. Carried through, never interpreted.
    pub version: Option<String>,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    /// `None` when the source entry had no usable `type`.
    pub kind: Option<BlockKind>,
    pub attrs: Map<String, Value>,
    pub content: InlineContent,
    pub marks: Vec<Mark>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    Heading,
    Blockquote,
    CodeBlock,
    BulletList,
    OrderedList,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum InlineContent {
    #[default]
    Empty,
    Text(String),
    Items(Vec<ListItem>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListItem {
    Text(String),
    Blocks(Vec<Block>),
    /// A single block object. Containers render it directly; lists reject it.
    Block(Block),
    /// Item that is neither a string, an array of blocks, nor a block object.
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mark {
    pub kind: MarkKind,
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkKind {
    Bold,
    Italic,
    Underline,
    Strike,
    Code,
    Link,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("content document must be null, a string, or an object, found {found}")]
    UnexpectedValue { found: &'static str },
    #[error("content document is missing a `blocks` array")]
    MissingBlocks,
}

impl ContentDocument {
    /// Decode a parsed JSON value into a typed document.
    pub fn from_json(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Null => Ok(Self::Empty),
            Value::String(text) => Ok(Self::Text(text.clone())),
            Value::Object(object) => {
                let blocks = object
                    .get("blocks")
                    .and_then(Value::as_array)
                    .ok_or(DecodeError::MissingBlocks)?;

                Ok(Self::Structured(Document {
                    time: object.get("time").and_then(Value::as_i64),
                    version: object
                        .get("version")
                        .and_then(Value::as_str)
                        .map(str::to_owned),
                    blocks: blocks.iter().map(decode_block).collect(),
                }))
            }
            other => Err(DecodeError::UnexpectedValue {
                found: json_kind(other),
            }),
        }
    }
}

impl TryFrom<Value> for ContentDocument {
    type Error = DecodeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(&value)
    }
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            time: None,
            version: None,
            blocks,
        }
    }
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Block without a usable `type`; renders to nothing.
    pub fn untyped() -> Self {
        Self::default()
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Paragraph).with_text(text)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.content = InlineContent::Text(text.into());
        self
    }

    pub fn with_items(mut self, items: Vec<ListItem>) -> Self {
        self.content = InlineContent::Items(items);
        self
    }

    pub fn with_marks(mut self, marks: Vec<Mark>) -> Self {
        self.marks = marks;
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Heading level from `attrs.level`, defaulting to 1 and clamped to `1..=max`.
    pub fn heading_level(&self, max: u8) -> u8 {
        let max = max.clamp(1, DEFAULT_MAX_HEADING_LEVEL);
        let requested = match self.attrs.get("level") {
            Some(Value::Number(number)) => number.as_u64(),
            Some(Value::String(raw)) => raw.trim().parse::<u64>().ok(),
            _ => None,
        };

        match requested {
            None | Some(0) => 1,
            Some(level) => u8::try_from(level).map_or(max, |level| level.min(max)),
        }
    }
}

impl BlockKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "paragraph" => Self::Paragraph,
            "heading" => Self::Heading,
            "blockquote" => Self::Blockquote,
            "codeBlock" => Self::CodeBlock,
            "bulletList" => Self::BulletList,
            "orderedList" => Self::OrderedList,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_tag(&self) -> &str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Heading => "heading",
            Self::Blockquote => "blockquote",
            Self::CodeBlock => "codeBlock",
            Self::BulletList => "bulletList",
            Self::OrderedList => "orderedList",
            Self::Other(tag) => tag.as_str(),
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl Mark {
    pub fn new(kind: MarkKind) -> Self {
        Self { kind, href: None }
    }

    pub fn link(href: impl Into<String>) -> Self {
        Self {
            kind: MarkKind::Link,
            href: Some(href.into()),
        }
    }
}

impl MarkKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "bold" => Self::Bold,
            "italic" => Self::Italic,
            "underline" => Self::Underline,
            "strike" => Self::Strike,
            "code" => Self::Code,
            "link" => Self::Link,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_tag(&self) -> &str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::Strike => "strike",
            Self::Code => "code",
            Self::Link => "link",
            Self::Other(tag) => tag.as_str(),
        }
    }
}

fn decode_block(value: &Value) -> Block {
    let Some(object) = value.as_object() else {
        return Block::untyped();
    };

    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .filter(|tag| !tag.is_empty())
        .map(BlockKind::from_tag);

    let attrs = object
        .get("attrs")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    let content = object
        .get("data")
        .and_then(|data| data.get("text"))
        .map_or(InlineContent::Empty, decode_inline);

    let marks = object
        .get("marks")
        .and_then(Value::as_array)
        .map(|marks| marks.iter().map(decode_mark).collect())
        .unwrap_or_default();

    Block {
        kind,
        attrs,
        content,
        marks,
    }
}

fn decode_inline(value: &Value) -> InlineContent {
    match value {
        Value::String(text) => InlineContent::Text(text.clone()),
        Value::Array(items) => InlineContent::Items(items.iter().map(decode_item).collect()),
        _ => InlineContent::Empty,
    }
}

fn decode_item(value: &Value) -> ListItem {
    match value {
        Value::String(text) => ListItem::Text(text.clone()),
        Value::Array(blocks) => ListItem::Blocks(blocks.iter().map(decode_block).collect()),
        Value::Object(_) => ListItem::Block(decode_block(value)),
        _ => ListItem::Unsupported,
    }
}

fn decode_mark(value: &Value) -> Mark {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .map_or_else(|| MarkKind::Other(String::new()), MarkKind::from_tag);

    let href = value
        .get("attrs")
        .and_then(|attrs| attrs.get("href"))
        .and_then(Value::as_str)
        .map(str::to_owned);

    Mark { kind, href }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
