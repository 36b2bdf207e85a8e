//! Structured renderer
//!
//! Renders blocks into [`RenderedNode`]s: a plain tree with the block kind,
//! id, string attributes, composed inline content and children. The tree
//! serializes with serde (the CLI's `--to json`) and prints as an indented
//! outline for quick inspection (`--to outline`).
//!
//! Outline format, two spaces per level:
//!
//! ```text
//! heading_1 Hello
//! numbered_list
//!   numbered_list_item First item
//!   numbered_list_item Second item
//! ```
//!
//! Labels are the item's plain text, truncated to 30 characters.

use crate::common::grouping::GroupedList;
use crate::common::rich_text::{compose, ComposedSpan};
use crate::error::Error;
use crate::model::rich_text::plain_text;
use crate::model::{BlockKind, ResolvedBlock};
use crate::render::{ImageLocation, RenderContext, Renderer, UnsupportedPolicy};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

const LABEL_WIDTH: usize = 30;

/// A rendered block, list or placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedNode {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<ComposedSpan>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RenderedNode>,
}

impl RenderedNode {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            id: None,
            attrs: BTreeMap::new(),
            content: Vec::new(),
            children: Vec::new(),
        }
    }

    fn with_attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(key.to_string(), value.into());
        self
    }

    /// Concatenated text of the node's own inline content.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|span| span.node.text_content())
            .collect()
    }

    /// Indented outline of this node and its descendants.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(&mut out, 0);
        out
    }

    fn write_outline(&self, out: &mut String, depth: usize) {
        let label = self
            .attrs
            .get("title")
            .or_else(|| self.attrs.get("src"))
            .or_else(|| self.attrs.get("url"))
            .cloned()
            .unwrap_or_else(|| self.text());
        let label = truncate_label(&label);
        let indent = "  ".repeat(depth);
        if label.is_empty() {
            let _ = writeln!(out, "{indent}{}", self.kind);
        } else {
            let _ = writeln!(out, "{indent}{} {label}", self.kind);
        }
        for child in &self.children {
            child.write_outline(out, depth + 1);
        }
    }
}

/// Outline of a sequence of sibling nodes.
pub fn outline(nodes: &[RenderedNode]) -> String {
    nodes.iter().map(RenderedNode::outline).collect()
}

fn truncate_label(label: &str) -> String {
    let single_line = label.replace('\n', " ");
    if single_line.chars().count() <= LABEL_WIDTH {
        return single_line;
    }
    let mut cut: String = single_line.chars().take(LABEL_WIDTH - 1).collect();
    cut.push('…');
    cut
}

/// Renders blocks to [`RenderedNode`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeRenderer;

impl Renderer for TreeRenderer {
    type Output = RenderedNode;

    fn render_block(
        &self,
        block: ResolvedBlock<RenderedNode>,
        cx: &RenderContext<'_>,
    ) -> Result<Option<RenderedNode>, Error> {
        let ResolvedBlock { record, children } = block;
        let mut node = RenderedNode::new(record.kind.block_type().as_str());
        node.id = Some(record.id.to_string());
        node.children = children.unwrap_or_default();
        if let Some(spans) = record.kind.rich_text() {
            node.content = compose(spans);
        }

        let node = match record.kind {
            BlockKind::Code(code) => node.with_attr("language", code.effective_language()),
            BlockKind::Image(image) => {
                let node = if image.caption.is_empty() {
                    node
                } else {
                    node.with_attr("caption", image.caption_text())
                };
                match cx.resolve_image(&image.source) {
                    ImageLocation::Available(src) => node.with_attr("src", src),
                    ImageLocation::Unavailable { url, reason } => {
                        let mut placeholder = node.with_attr("url", url).with_attr("reason", reason);
                        placeholder.kind = "image_unavailable".to_string();
                        placeholder
                    }
                }
            }
            BlockKind::Table(table) => node
                .with_attr("width", table.table_width.to_string())
                .with_attr("column_header", table.has_column_header.to_string())
                .with_attr("row_header", table.has_row_header.to_string()),
            BlockKind::TableRow(row) => {
                let mut node = node;
                node.children = row
                    .cells
                    .iter()
                    .map(|cell| RenderedNode {
                        content: compose(cell),
                        ..RenderedNode::new("table_cell")
                    })
                    .collect();
                node
            }
            BlockKind::ChildPage(page) => {
                let mut node = node.with_attr("title", page.title);
                node.children.clear();
                node
            }
            BlockKind::Bookmark(bookmark) => {
                let mut node = node.with_attr("url", bookmark.url.clone());
                if !bookmark.caption.is_empty() {
                    node = node.with_attr("caption", plain_text(&bookmark.caption));
                }
                if let Some(preview) = cx.link_preview(&bookmark.url) {
                    for (key, value) in [
                        ("preview_title", preview.title.clone()),
                        ("preview_description", preview.short_description()),
                        ("preview_image", preview.image.clone()),
                        ("favicon", preview.favicon.clone()),
                    ] {
                        if let Some(value) = value {
                            node = node.with_attr(key, value);
                        }
                    }
                }
                node
            }
            BlockKind::Unsupported(unsupported) => match cx.options().unsupported {
                UnsupportedPolicy::Skip => return Ok(None),
                UnsupportedPolicy::Placeholder => {
                    let mut placeholder = node.with_attr("block_type", unsupported.kind);
                    placeholder.kind = "placeholder".to_string();
                    placeholder
                }
            },
            _ => node,
        };
        Ok(Some(node))
    }

    fn render_list(
        &self,
        list: GroupedList<RenderedNode>,
        cx: &RenderContext<'_>,
    ) -> Result<Option<RenderedNode>, Error> {
        let mut node = RenderedNode::new(list.kind.as_str());
        node.id = list.first_id().map(ToString::to_string);
        for item in list.items {
            if let Some(rendered) = self.render_block(item, cx)? {
                node.children.push(rendered);
            }
        }
        Ok(Some(node))
    }
}
