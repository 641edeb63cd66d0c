//! Block-content rendering.
//!
//! The renderer is kept pure: it accepts a decoded content document, produces a
//! deterministic output tree, and reports anomalies to an injected
//! [`DiagnosticSink`] instead of failing. Turning the tree into markup is a
//! separate step (`OutputNode::to_html`).

mod html;
mod service;
mod source;
mod types;

pub use html::render_html;
pub use service::{
    BlockRenderer, RenderConfigError, apply_marks, block_renderer, configure_block_renderer,
};
pub use source::{read_source, render_source};
pub use types::{
    DEFAULT_MAX_DEPTH, DiagnosticKind, DiagnosticSink, Element, OutputNode, RenderDiagnostic,
    RenderOptions, Tag, TracingSink,
};
