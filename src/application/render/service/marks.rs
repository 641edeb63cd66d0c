use crate::application::render::types::{
    DiagnosticKind, DiagnosticSink, OutputNode, RenderDiagnostic, Tag,
};
use crate::domain::content::{Mark, MarkKind};

const DEFAULT_LINK_HREF: &str = "#";

/// Wrap `text` in the decorations named by `marks`.
///
/// Marks fold in sequence order: each one wraps the result so far, so the first
/// mark ends up innermost and the last one outermost. Unknown marks are skipped
/// with a diagnostic. Empty text renders nothing.
pub fn apply_marks(
    text: &str,
    marks: &[Mark],
    sink: &mut dyn DiagnosticSink,
) -> Option<OutputNode> {
    apply_marks_at(text, marks, None, sink)
}

/// [`apply_marks`] for text owned by the block at `position`; diagnostics carry
/// that position.
pub(super) fn apply_marks_at(
    text: &str,
    marks: &[Mark],
    position: Option<&str>,
    sink: &mut dyn DiagnosticSink,
) -> Option<OutputNode> {
    if text.is_empty() {
        sink.report(RenderDiagnostic::new(
            DiagnosticKind::EmptyMarkedText,
            position,
            "content must be a non-empty string",
        ));
        return None;
    }

    let decorated = marks
        .iter()
        .fold(OutputNode::text(text), |current, mark| {
            decorate(current, mark, position, sink)
        });

    Some(decorated)
}

fn decorate(
    current: OutputNode,
    mark: &Mark,
    position: Option<&str>,
    sink: &mut dyn DiagnosticSink,
) -> OutputNode {
    let tag = match &mark.kind {
        MarkKind::Bold => Tag::Strong,
        MarkKind::Italic => Tag::Em,
        MarkKind::Underline => Tag::U,
        MarkKind::Strike => Tag::S,
        MarkKind::Code => Tag::Code,
        MarkKind::Link => {
            let href = mark
                .href
                .as_deref()
                .filter(|href| !href.is_empty())
                .unwrap_or(DEFAULT_LINK_HREF);
            return OutputNode::element(Tag::A, vec![current]).with_attribute("href", href);
        }
        MarkKind::Other(tag) => {
            sink.report(RenderDiagnostic::new(
                DiagnosticKind::UnrecognizedMarkType,
                position,
                format!("unknown mark type `{tag}`"),
            ));
            return current;
        }
    };

    OutputNode::element(tag, vec![current])
}
