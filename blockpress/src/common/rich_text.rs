//! Composition of inline rich text into nested inline nodes.
//!
//! Each span is wrapped in a fixed order, innermost first:
//!
//! ```text
//! text → bold → italic → strikethrough → underline → code → link → color
//! ```
//!
//! The order does not depend on which annotations are present, so the same
//! span always produces the same nesting. A span that is both bold and
//! linked yields `Link(Bold(Text))`, never the reverse.
//!
//! Spans are composed independently: composing `[a, b]` yields exactly
//! `compose([a])` followed by `compose([b])`. The key attached to each span
//! is derived from its content alone for that reason.

use crate::model::{RichText, SpanKind};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// A nested inline node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InlineNode {
    Text { text: String },
    Bold { child: Box<InlineNode> },
    Italic { child: Box<InlineNode> },
    Strikethrough { child: Box<InlineNode> },
    Underline { child: Box<InlineNode> },
    Code { child: Box<InlineNode> },
    Link { href: String, child: Box<InlineNode> },
    Color { color: String, child: Box<InlineNode> },
}

impl InlineNode {
    pub fn text(text: &str) -> Self {
        InlineNode::Text {
            text: text.to_string(),
        }
    }

    /// The wrapped child, or `None` for text leaves.
    pub fn child(&self) -> Option<&InlineNode> {
        match self {
            InlineNode::Text { .. } => None,
            InlineNode::Bold { child }
            | InlineNode::Italic { child }
            | InlineNode::Strikethrough { child }
            | InlineNode::Underline { child }
            | InlineNode::Code { child }
            | InlineNode::Link { child, .. }
            | InlineNode::Color { child, .. } => Some(&**child),
        }
    }

    /// The text at the bottom of the wrapper chain.
    pub fn text_content(&self) -> &str {
        match self {
            InlineNode::Text { text } => text.as_str(),
            _ => self.child().map(InlineNode::text_content).unwrap_or_default(),
        }
    }
}

/// One composed span and its stable key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposedSpan {
    pub key: String,
    pub node: InlineNode,
}

/// Compose a run of spans into keyed inline nodes.
pub fn compose(spans: &[RichText]) -> Vec<ComposedSpan> {
    spans
        .iter()
        .map(|span| ComposedSpan {
            key: span_key(span),
            node: compose_span(span),
        })
        .collect()
}

/// Compose a single span.
pub fn compose_span(span: &RichText) -> InlineNode {
    let mut node = InlineNode::text(&span.plain_text);
    if span.kind != SpanKind::Text {
        return node;
    }

    let annotations = &span.annotations;
    let wrappers: [(bool, fn(Box<InlineNode>) -> InlineNode); 5] = [
        (annotations.bold, |child| InlineNode::Bold { child }),
        (annotations.italic, |child| InlineNode::Italic { child }),
        (annotations.strikethrough, |child| InlineNode::Strikethrough { child }),
        (annotations.underline, |child| InlineNode::Underline { child }),
        (annotations.code, |child| InlineNode::Code { child }),
    ];
    for (enabled, wrap) in wrappers {
        if enabled {
            node = wrap(Box::new(node));
        }
    }

    if let Some(href) = &span.href {
        node = InlineNode::Link {
            href: href.clone(),
            child: Box::new(node),
        };
    }
    if let Some(color) = annotations.effective_color() {
        node = InlineNode::Color {
            color: color.to_string(),
            child: Box::new(node),
        };
    }
    node
}

fn span_key(span: &RichText) -> String {
    let annotations = &span.annotations;
    let flags = [
        annotations.bold,
        annotations.italic,
        annotations.strikethrough,
        annotations.underline,
        annotations.code,
    ]
    .map(|flag| if flag { b'1' } else { b'0' });

    let mut hasher = Sha256::new();
    hasher.update(format!("{:?}", span.kind).as_bytes());
    hasher.update([0u8]);
    hasher.update(span.plain_text.as_bytes());
    hasher.update([0u8]);
    hasher.update(span.href.as_deref().unwrap_or_default().as_bytes());
    hasher.update([0u8]);
    hasher.update(flags);
    hasher.update(annotations.effective_color().unwrap_or_default().as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..16].to_string()
}
