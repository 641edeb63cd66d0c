use crate::application::render::types::{
    DiagnosticKind, DiagnosticSink, OutputNode, RenderDiagnostic, Tag,
};
use crate::domain::content::{BlockKind, ListItem};

use super::{BlockRenderer, text_nodes};

impl BlockRenderer {
    /// Render a block whose inline content is a sequence of items.
    ///
    /// List kinds produce one keyed `li` per item. Any other kind flattens the
    /// item contents into a generic container, rendering block objects in place
    /// at `{position}-{item}`.
    pub(super) fn render_items(
        &self,
        kind: &BlockKind,
        items: &[ListItem],
        position: &str,
        depth: usize,
        sink: &mut dyn DiagnosticSink,
    ) -> OutputNode {
        match kind {
            BlockKind::BulletList => {
                OutputNode::keyed(Tag::Ul, position, self.list_items(items, position, depth, sink))
            }
            BlockKind::OrderedList => {
                OutputNode::keyed(Tag::Ol, position, self.list_items(items, position, depth, sink))
            }
            _ => {
                let children = items
                    .iter()
                    .enumerate()
                    .flat_map(|(item_index, item)| match item {
                        ListItem::Block(block) => {
                            let item_position = format!("{position}-{item_index}");
                            self.render_at(block, &item_position, depth + 1, sink)
                                .into_iter()
                                .collect::<Vec<_>>()
                        }
                        _ => self.item_content(item, position, item_index, depth, sink),
                    })
                    .collect();
                OutputNode::keyed(Tag::Div, position, children)
            }
        }
    }

    fn list_items(
        &self,
        items: &[ListItem],
        position: &str,
        depth: usize,
        sink: &mut dyn DiagnosticSink,
    ) -> Vec<OutputNode> {
        items
            .iter()
            .enumerate()
            .map(|(item_index, item)| {
                let children = self.item_content(item, position, item_index, depth, sink);
                OutputNode::keyed(Tag::Li, format!("{position}-{item_index}"), children)
            })
            .collect()
    }

    fn item_content(
        &self,
        item: &ListItem,
        position: &str,
        item_index: usize,
        depth: usize,
        sink: &mut dyn DiagnosticSink,
    ) -> Vec<OutputNode> {
        match item {
            ListItem::Text(text) => text_nodes(text),
            ListItem::Blocks(blocks) => blocks
                .iter()
                .enumerate()
                .filter_map(|(nested_index, block)| {
                    let nested_position = format!("{position}-{item_index}-{nested_index}");
                    self.render_at(block, &nested_position, depth + 1, sink)
                })
                .collect(),
            ListItem::Block(_) | ListItem::Unsupported => {
                let item_position = format!("{position}-{item_index}");
                sink.report(RenderDiagnostic::new(
                    DiagnosticKind::StructuralMismatch,
                    Some(&item_position),
                    "list item must be a string or an array of blocks",
                ));
                Vec::new()
            }
        }
    }
}
