use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::domain::content::DEFAULT_MAX_HEADING_LEVEL;

pub const DEFAULT_MAX_DEPTH: usize = 32;
pub(crate) const ROOT_CLASS: &str = "block-editor-content";

/// Renderer-produced unit of UI-consumable structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OutputNode {
    Text(String),
    Element(Element),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub tag: Tag,
    /// Identity token derived from the index path. Carries no meaning beyond
    /// stable identity and is never emitted as markup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutputNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Div,
    P,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Blockquote,
    Pre,
    Code,
    Ul,
    Ol,
    Li,
    Strong,
    Em,
    U,
    S,
    A,
}

impl Tag {
    /// Heading tag for a level already clamped to `1..=6`.
    pub fn heading(level: u8) -> Self {
        match level {
            0 | 1 => Self::H1,
            2 => Self::H2,
            3 => Self::H3,
            4 => Self::H4,
            5 => Self::H5,
            _ => Self::H6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Div => "div",
            Self::P => "p",
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 => "h4",
            Self::H5 => "h5",
            Self::H6 => "h6",
            Self::Blockquote => "blockquote",
            Self::Pre => "pre",
            Self::Code => "code",
            Self::Ul => "ul",
            Self::Ol => "ol",
            Self::Li => "li",
            Self::Strong => "strong",
            Self::Em => "em",
            Self::U => "u",
            Self::S => "s",
            Self::A => "a",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl OutputNode {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn element(tag: Tag, children: Vec<OutputNode>) -> Self {
        Self::Element(Element {
            tag,
            key: None,
            attributes: Vec::new(),
            children,
        })
    }

    pub fn keyed(tag: Tag, key: impl Into<String>, children: Vec<OutputNode>) -> Self {
        Self::Element(Element {
            tag,
            key: Some(key.into()),
            attributes: Vec::new(),
            children,
        })
    }

    pub fn with_attribute(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        match self {
            Self::Element(mut element) => {
                element.attributes.push((name.into(), value.into()));
                Self::Element(element)
            }
            text => text,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    pub fn tag(&self) -> Option<Tag> {
        self.as_element().map(|element| element.tag)
    }

    pub fn key(&self) -> Option<&str> {
        self.as_element().and_then(|element| element.key.as_deref())
    }

    pub fn children(&self) -> &[OutputNode] {
        match self {
            Self::Element(element) => &element.children,
            Self::Text(_) => &[],
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.as_element().and_then(|element| {
            element
                .attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        })
    }
}

/// Limits applied while walking a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Deepest block nesting rendered; deeper blocks are dropped with a diagnostic.
    pub max_depth: usize,
    /// Headings above this level are clamped down to it.
    pub max_heading_level: u8,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_heading_level: DEFAULT_MAX_HEADING_LEVEL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Input lacks the shape required at this point; the node renders nothing.
    StructuralMismatch,
    /// Block type outside the known set; rendered as a generic container.
    UnrecognizedBlockType,
    /// Mark type outside the known set; skipped.
    UnrecognizedMarkType,
    /// Marks requested on empty text; the text renders nothing.
    EmptyMarkedText,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StructuralMismatch => "structural_mismatch",
            Self::UnrecognizedBlockType => "unrecognized_block_type",
            Self::UnrecognizedMarkType => "unrecognized_mark_type",
            Self::EmptyMarkedText => "empty_marked_text",
        }
    }
}

/// Render-time anomaly. Never fatal; reported so callers can surface, count,
/// or ignore it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderDiagnostic {
    pub kind: DiagnosticKind,
    pub position: Option<String>,
    pub detail: String,
}

impl RenderDiagnostic {
    pub fn new(kind: DiagnosticKind, position: Option<&str>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            position: position.map(str::to_owned),
            detail: detail.into(),
        }
    }
}

/// Receiver for render diagnostics, injected by the caller.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: RenderDiagnostic);
}

impl DiagnosticSink for Vec<RenderDiagnostic> {
    fn report(&mut self, diagnostic: RenderDiagnostic) {
        self.push(diagnostic);
    }
}

/// Sink that forwards every diagnostic to `tracing` at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: RenderDiagnostic) {
        warn!(
            target = "application::render::blocks",
            kind = diagnostic.kind.as_str(),
            position = diagnostic.position.as_deref().unwrap_or(""),
            detail = %diagnostic.detail,
            "Render diagnostic"
        );
    }
}
