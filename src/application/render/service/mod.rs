mod lists;
mod marks;

use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde_json::Value;
use thiserror::Error;

use crate::application::render::types::{
    DiagnosticKind, DiagnosticSink, OutputNode, ROOT_CLASS, RenderDiagnostic, RenderOptions, Tag,
};
use crate::domain::content::{Block, BlockKind, ContentDocument, InlineContent, Mark};

pub use marks::apply_marks;
use marks::apply_marks_at;

/// Recursive-descent renderer from typed block documents to output trees.
///
/// Rendering is a pure function of the input: no state survives between calls,
/// and every anomaly is absorbed locally and reported to the supplied sink.
#[derive(Debug, Clone, Default)]
pub struct BlockRenderer {
    options: RenderOptions,
}

impl BlockRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Render a whole document. `Empty` and empty `Text` render nothing,
    /// other `Text` renders verbatim, and structured documents render inside a
    /// single container.
    pub fn render(
        &self,
        document: &ContentDocument,
        sink: &mut dyn DiagnosticSink,
    ) -> Option<OutputNode> {
        match document {
            ContentDocument::Empty => None,
            ContentDocument::Text(text) if text.is_empty() => None,
            ContentDocument::Text(text) => Some(OutputNode::text(text.clone())),
            ContentDocument::Structured(document) => {
                let children = document
                    .blocks
                    .iter()
                    .enumerate()
                    .filter_map(|(index, block)| {
                        self.render_at(block, &index.to_string(), 0, sink)
                    })
                    .collect();

                Some(OutputNode::element(Tag::Div, children).with_attribute("class", ROOT_CLASS))
            }
        }
    }

    /// Decode raw JSON and render it. Values that are not a content document
    /// render nothing and report a structural mismatch.
    pub fn render_json(&self, value: &Value, sink: &mut dyn DiagnosticSink) -> Option<OutputNode> {
        match ContentDocument::from_json(value) {
            Ok(document) => self.render(&document, sink),
            Err(err) => {
                sink.report(RenderDiagnostic::new(
                    DiagnosticKind::StructuralMismatch,
                    None,
                    format!("invalid block editor content structure: {err}"),
                ));
                None
            }
        }
    }

    /// Render one top-level block, keyed by `position`.
    pub fn render_block(
        &self,
        block: &Block,
        position: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> Option<OutputNode> {
        self.render_at(block, position, 0, sink)
    }

    fn render_at(
        &self,
        block: &Block,
        position: &str,
        depth: usize,
        sink: &mut dyn DiagnosticSink,
    ) -> Option<OutputNode> {
        if depth > self.options.max_depth {
            sink.report(RenderDiagnostic::new(
                DiagnosticKind::StructuralMismatch,
                Some(position),
                format!("block nesting exceeds {} levels", self.options.max_depth),
            ));
            return None;
        }

        let Some(kind) = block.kind.as_ref() else {
            sink.report(RenderDiagnostic::new(
                DiagnosticKind::StructuralMismatch,
                Some(position),
                "block has no type",
            ));
            return None;
        };

        if let BlockKind::Other(tag) = kind {
            sink.report(RenderDiagnostic::new(
                DiagnosticKind::UnrecognizedBlockType,
                Some(position),
                format!("unknown block type `{tag}`, rendering generic container"),
            ));
        }

        let node = match &block.content {
            InlineContent::Items(items) => self.render_items(kind, items, position, depth, sink),
            InlineContent::Text(text) => {
                let inline = render_inline(text, &block.marks, position, sink);
                self.wrap(kind, block, inline, position)
            }
            InlineContent::Empty => self.wrap(kind, block, Vec::new(), position),
        };

        Some(node)
    }

    fn wrap(
        &self,
        kind: &BlockKind,
        block: &Block,
        inline: Vec<OutputNode>,
        position: &str,
    ) -> OutputNode {
        match kind {
            BlockKind::Paragraph => OutputNode::keyed(Tag::P, position, inline),
            BlockKind::Heading => {
                let level = block.heading_level(self.options.max_heading_level);
                OutputNode::keyed(Tag::heading(level), position, inline)
            }
            BlockKind::Blockquote => OutputNode::keyed(Tag::Blockquote, position, inline),
            BlockKind::CodeBlock => OutputNode::keyed(
                Tag::Pre,
                position,
                vec![OutputNode::element(Tag::Code, inline)],
            ),
            BlockKind::BulletList | BlockKind::OrderedList | BlockKind::Other(_) => {
                OutputNode::keyed(Tag::Div, position, inline)
            }
        }
    }
}

fn render_inline(
    text: &str,
    marks: &[Mark],
    position: &str,
    sink: &mut dyn DiagnosticSink,
) -> Vec<OutputNode> {
    if marks.is_empty() {
        return text_nodes(text);
    }
    apply_marks_at(text, marks, Some(position), sink)
        .into_iter()
        .collect()
}

fn text_nodes(text: &str) -> Vec<OutputNode> {
    if text.is_empty() {
        Vec::new()
    } else {
        vec![OutputNode::text(text)]
    }
}

#[derive(Debug, Error)]
pub enum RenderConfigError {
    #[error("block renderer already configured")]
    AlreadyConfigured,
}

static BLOCK_RENDERER: OnceCell<Arc<BlockRenderer>> = OnceCell::new();

/// Install the process-wide renderer options. Must run before first use.
pub fn configure_block_renderer(options: RenderOptions) -> Result<(), RenderConfigError> {
    BLOCK_RENDERER
        .set(Arc::new(BlockRenderer::new(options)))
        .map_err(|_| RenderConfigError::AlreadyConfigured)
}

/// Access the shared renderer, falling back to default options when unconfigured.
pub fn block_renderer() -> Arc<BlockRenderer> {
    Arc::clone(BLOCK_RENDERER.get_or_init(|| Arc::new(BlockRenderer::default())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::content::{Document, ListItem, MarkKind};
    use serde_json::json;

    fn render(document: &ContentDocument) -> (Option<OutputNode>, Vec<RenderDiagnostic>) {
        let mut sink: Vec<RenderDiagnostic> = Vec::new();
        let node = BlockRenderer::default().render(document, &mut sink);
        (node, sink)
    }

    fn structured(blocks: Vec<Block>) -> ContentDocument {
        ContentDocument::Structured(Document::new(blocks))
    }

    #[test]
    fn empty_document_renders_nothing_silently() {
        let (node, diagnostics) = render(&ContentDocument::Empty);
        assert_eq!(node, None);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn string_document_passes_through() {
        let (node, _) = render(&ContentDocument::Text("hello".into()));
        assert_eq!(node, Some(OutputNode::text("hello")));
    }

    #[test]
    fn empty_string_document_renders_nothing() {
        let (node, diagnostics) = render(&ContentDocument::Text(String::new()));
        assert_eq!(node, None);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn mark_diagnostics_carry_block_position() {
        let block = Block::paragraph("Shiny")
            .with_marks(vec![Mark::new(MarkKind::Other("sparkle".into()))]);
        let (node, diagnostics) = render(&structured(vec![Block::paragraph("a"), block]));

        assert!(node.is_some());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::UnrecognizedMarkType);
        assert_eq!(diagnostics[0].position.as_deref(), Some("1"));
    }

    #[test]
    fn paragraph_renders_inside_root_container() {
        let (node, diagnostics) = render(&structured(vec![Block::paragraph("Hi")]));
        let root = node.expect("root");

        assert_eq!(root.tag(), Some(Tag::Div));
        assert_eq!(root.attribute("class"), Some(ROOT_CLASS));
        assert_eq!(
            root.children(),
            &[OutputNode::keyed(Tag::P, "0", vec![OutputNode::text("Hi")])]
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn heading_level_selects_tag() {
        let heading = Block::new(BlockKind::Heading).with_text("Title");
        let renderer = BlockRenderer::default();
        let mut sink: Vec<RenderDiagnostic> = Vec::new();

        let h3 = renderer
            .render_block(&heading.clone().with_attr("level", 3), "0", &mut sink)
            .expect("heading");
        assert_eq!(h3.tag(), Some(Tag::H3));

        let h1 = renderer
            .render_block(&heading.clone(), "0", &mut sink)
            .expect("heading");
        assert_eq!(h1.tag(), Some(Tag::H1));

        let clamped = renderer
            .render_block(&heading.with_attr("level", 12), "0", &mut sink)
            .expect("heading");
        assert_eq!(clamped.tag(), Some(Tag::H6));
    }

    #[test]
    fn code_block_wraps_pre_and_code() {
        let block = Block::new(BlockKind::CodeBlock).with_text("let x = 1;");
        let (node, _) = render(&structured(vec![block]));
        let root = node.expect("root");

        assert_eq!(
            root.children(),
            &[OutputNode::keyed(
                Tag::Pre,
                "0",
                vec![OutputNode::element(
                    Tag::Code,
                    vec![OutputNode::text("let x = 1;")]
                )]
            )]
        );
    }

    #[test]
    fn blockquote_applies_marks() {
        let block = Block::new(BlockKind::Blockquote)
            .with_text("quoted")
            .with_marks(vec![Mark::new(MarkKind::Italic)]);
        let (node, _) = render(&structured(vec![block]));
        let root = node.expect("root");

        assert_eq!(
            root.children(),
            &[OutputNode::keyed(
                Tag::Blockquote,
                "0",
                vec![OutputNode::element(Tag::Em, vec![OutputNode::text("quoted")])]
            )]
        );
    }

    #[test]
    fn unknown_block_type_degrades_to_container() {
        let block = Block::new(BlockKind::Other("callout".into())).with_text("Note");
        let (node, diagnostics) = render(&structured(vec![block]));
        let root = node.expect("root");

        assert_eq!(
            root.children(),
            &[OutputNode::keyed(Tag::Div, "0", vec![OutputNode::text("Note")])]
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::UnrecognizedBlockType);
    }

    #[test]
    fn untyped_block_is_dropped_but_siblings_survive() {
        let (node, diagnostics) = render(&structured(vec![
            Block::untyped(),
            Block::paragraph("kept"),
        ]));
        let root = node.expect("root");

        assert_eq!(
            root.children(),
            &[OutputNode::keyed(Tag::P, "1", vec![OutputNode::text("kept")])]
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::StructuralMismatch);
        assert_eq!(diagnostics[0].position.as_deref(), Some("0"));
    }

    #[test]
    fn empty_text_with_marks_leaves_block_empty() {
        let block = Block::paragraph("").with_marks(vec![Mark::new(MarkKind::Bold)]);
        let (node, diagnostics) = render(&structured(vec![block]));
        let root = node.expect("root");

        assert_eq!(root.children(), &[OutputNode::keyed(Tag::P, "0", vec![])]);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::EmptyMarkedText);
    }

    #[test]
    fn block_without_content_renders_empty_container() {
        let (node, _) = render(&structured(vec![Block::new(BlockKind::Paragraph)]));
        let root = node.expect("root");
        assert_eq!(root.children(), &[OutputNode::keyed(Tag::P, "0", vec![])]);
    }

    #[test]
    fn list_kind_with_plain_text_uses_generic_container() {
        let block = Block::new(BlockKind::BulletList).with_text("not a list");
        let (node, diagnostics) = render(&structured(vec![block]));
        let root = node.expect("root");

        assert_eq!(
            root.children(),
            &[OutputNode::keyed(
                Tag::Div,
                "0",
                vec![OutputNode::text("not a list")]
            )]
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn nesting_beyond_max_depth_is_dropped() {
        let mut block = Block::paragraph("deepest");
        for _ in 0..3 {
            block = Block::new(BlockKind::BulletList).with_items(vec![ListItem::Blocks(vec![block])]);
        }

        let renderer = BlockRenderer::new(RenderOptions {
            max_depth: 2,
            ..RenderOptions::default()
        });
        let mut sink: Vec<RenderDiagnostic> = Vec::new();
        let node = renderer.render_block(&block, "0", &mut sink).expect("outer list");

        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].kind, DiagnosticKind::StructuralMismatch);
        assert_eq!(sink[0].position.as_deref(), Some("0-0-0-0-0-0-0"));
        assert!(!node.to_html().contains("deepest"));

        let mut sink: Vec<RenderDiagnostic> = Vec::new();
        let node = BlockRenderer::default()
            .render_block(&block, "0", &mut sink)
            .expect("outer list");
        assert!(sink.is_empty());
        assert!(node.to_html().contains("deepest"));
    }

    #[test]
    fn render_json_rejects_malformed_documents() {
        let renderer = BlockRenderer::default();
        let mut sink: Vec<RenderDiagnostic> = Vec::new();

        assert_eq!(renderer.render_json(&json!({ "time": 1 }), &mut sink), None);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].kind, DiagnosticKind::StructuralMismatch);

        let mut sink: Vec<RenderDiagnostic> = Vec::new();
        assert_eq!(renderer.render_json(&Value::Null, &mut sink), None);
        assert!(sink.is_empty());
    }

    #[test]
    fn rendering_twice_is_identical() {
        let document = ContentDocument::from_json(&json!({
            "blocks": [
                { "type": "heading", "attrs": { "level": 2 }, "data": { "text": "Title" } },
                { "type": "paragraph", "data": { "text": "Body" }, "marks": [{ "type": "bold" }] },
                { "type": "orderedList", "data": { "text": ["a", [{ "type": "paragraph", "data": { "text": "b" } }]] } }
            ]
        }))
        .expect("valid document");

        let (first, _) = render(&document);
        let (second, _) = render(&document);
        assert_eq!(first, second);
    }
}
