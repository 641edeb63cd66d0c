//! Markup serialisation for output trees.

use super::types::{Element, OutputNode};

impl OutputNode {
    /// Serialise the tree to HTML. Text and attribute values are escaped; keys
    /// are identity-only and never emitted.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        self.write_html(&mut html);
        html
    }

    /// Concatenated text of every descendant text node, in document order.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn write_html(&self, out: &mut String) {
        match self {
            OutputNode::Text(text) => out.push_str(&escape_text(text)),
            OutputNode::Element(element) => write_element(element, out),
        }
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            OutputNode::Text(text) => out.push_str(text),
            OutputNode::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// Serialise an optional tree, rendering nothing for `None`.
pub fn render_html(node: Option<&OutputNode>) -> String {
    node.map(OutputNode::to_html).unwrap_or_default()
}

fn write_element(element: &Element, out: &mut String) {
    let tag = element.tag.as_str();
    out.push('<');
    out.push_str(tag);
    for (name, value) in &element.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attribute(value));
        out.push('"');
    }
    out.push('>');
    for child in &element.children {
        child.write_html(out);
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\n' | '\r' | '\t' => escaped.push(' '),
            _ => escaped.push(ch),
        }
    }
    escaped
}
