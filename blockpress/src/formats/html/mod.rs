//! HTML renderer
//!
//! Renders resolved blocks into an rcdom tree (`markup5ever_rcdom`) and
//! serializes it with html5ever, so escaping and void elements follow the
//! HTML5 serializer rather than hand-written string formatting.
//!
//! # Element Mapping Table
//!
//! | Block              | HTML                                                             |
//! |--------------------|------------------------------------------------------------------|
//! | Heading 1/2/3      | `<h1>`/`<h2>`/`<h3>`                                             |
//! | Paragraph          | `<p>`                                                            |
//! | Bulleted list      | `<ul class="bp-list">` of `<li>`; children nested inside the `li` |
//! | Numbered list      | `<ol class="bp-list">` of `<li>`                                 |
//! | Quote              | `<blockquote>`; children nested inside                           |
//! | Code               | `<pre data-language="x"><code class="language-x">`               |
//! | Divider            | `<hr>`                                                           |
//! | Image              | `<img src alt="">`, or `<figure>` + `<figcaption>` with a caption |
//! | Table / row        | `<table class="bp-table">` with `<thead>`/`<tbody>`, `<tr>`/`<td>` |
//! | Child page         | `<p class="bp-child-page">`                                      |
//! | Bookmark           | preview card `<div class="bp-bookmark">`, or a plain link        |
//! | Unsupported        | `<div class="bp-unsupported" data-kind="x">` or nothing          |
//!
//! Other blocks that own children are wrapped as
//! `<div class="bp-block">` + element + `<div class="bp-children">`.
//!
//! Inline wrappers map to `<strong>`, `<em>`, `<s>`, `<u>`, `<code>`,
//! `<a href>` and `<span style="color: x">` (`background-color` for
//! `*_background` colors).
//!
//! # Output
//!
//! [`serialize_nodes`] produces a fragment; [`HtmlRenderer::to_html_page`]
//! wraps a whole document in an HTML5 page with embedded CSS.

mod dom;

pub use dom::serialize_nodes;

use crate::common::grouping::GroupedList;
use crate::common::rich_text::{compose, InlineNode};
use crate::document::Document;
use crate::error::Error;
use crate::model::rich_text::plain_text;
use crate::model::{
    BlockKind, BookmarkBlock, CodeBlock, ImageBlock, ListKind, ResolvedBlock,
    RichText, TableBlock, TableRowBlock,
};
use crate::preview::LinkPreview;
use crate::render::{ImageLocation, RenderContext, Renderer, UnsupportedPolicy};
use dom::{
    append, append_all, create_element, create_text, html_escape, is_element, text_element,
};
use markup5ever_rcdom::Handle;

/// Renders blocks to rcdom element handles.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        HtmlRenderer
    }

    /// Serialize rendered nodes to an HTML fragment.
    pub fn to_html(&self, nodes: &[Handle]) -> Result<String, Error> {
        serialize_nodes(nodes)
    }

    /// Wrap a rendered document in a complete HTML5 page.
    pub fn to_html_page(&self, document: &Document<Handle>) -> Result<String, Error> {
        let body_html = serialize_nodes(&document.body)?;
        let css = include_str!("../../../css/page.css");
        let title = html_escape(&document.metadata.title);
        let date = html_escape(&document.metadata.created_at);

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <meta name="generator" content="blockpress">
  <title>{title}</title>
  <style>
{css}
  </style>
</head>
<body>
<article class="bp-document">
<header class="bp-document-header">
<h1>{title}</h1>
<time datetime="{date}">{date}</time>
</header>
{body_html}
</article>
</body>
</html>"#
        ))
    }
}

impl Renderer for HtmlRenderer {
    type Output = Handle;

    fn render_block(
        &self,
        block: ResolvedBlock<Handle>,
        cx: &RenderContext<'_>,
    ) -> Result<Option<Handle>, Error> {
        let ResolvedBlock { record, children } = block;
        let children = children.unwrap_or_default();
        let element = match &record.kind {
            BlockKind::Heading1(text) => inline_element("h1", &text.rich_text),
            BlockKind::Heading2(text) => inline_element("h2", &text.rich_text),
            BlockKind::Heading3(text) => inline_element("h3", &text.rich_text),
            BlockKind::Paragraph(text) => inline_element("p", &text.rich_text),
            BlockKind::Quote(text) => {
                let quote = inline_element("blockquote", &text.rich_text);
                append_all(&quote, children);
                return Ok(Some(quote));
            }
            BlockKind::Code(code) => code_element(code),
            BlockKind::Divider => create_element("hr", vec![]),
            BlockKind::Image(image) => image_element(image, cx),
            BlockKind::Table(table) => return Ok(Some(table_element(table, children))),
            BlockKind::TableRow(row) => row_element(row),
            // The sub-page body is its own document; only the title is shown.
            BlockKind::ChildPage(page) => {
                return Ok(Some(text_element(
                    "p",
                    vec![("class", "bp-child-page"), ("data-page-id", record.id.as_str())],
                    &page.title,
                )))
            }
            BlockKind::Bookmark(bookmark) => bookmark_element(bookmark, cx),
            BlockKind::Unsupported(unsupported) => match cx.options().unsupported {
                UnsupportedPolicy::Skip => return Ok(None),
                UnsupportedPolicy::Placeholder => text_element(
                    "div",
                    vec![("class", "bp-unsupported"), ("data-kind", &unsupported.kind)],
                    &format!("Unsupported block: {}", unsupported.kind),
                ),
            },
            // A lone item outside a grouped run still gets its list container.
            BlockKind::BulletedListItem(text) | BlockKind::NumberedListItem(text) => {
                let list = list_element(record.kind.list_kind().unwrap_or(ListKind::Bulleted));
                append(&list, list_item(&text.rich_text, children));
                return Ok(Some(list));
            }
        };

        if children.is_empty() {
            return Ok(Some(element));
        }
        let wrapper = create_element("div", vec![("class", "bp-block")]);
        let nested = create_element("div", vec![("class", "bp-children")]);
        append_all(&nested, children);
        append(&wrapper, element);
        append(&wrapper, nested);
        Ok(Some(wrapper))
    }

    fn render_list(
        &self,
        list: GroupedList<Handle>,
        _cx: &RenderContext<'_>,
    ) -> Result<Option<Handle>, Error> {
        let element = list_element(list.kind);
        for ResolvedBlock { record, children } in list.items {
            let spans = record.kind.rich_text().unwrap_or_default();
            append(&element, list_item(spans, children.unwrap_or_default()));
        }
        Ok(Some(element))
    }
}

fn list_element(kind: ListKind) -> Handle {
    let tag = match kind {
        ListKind::Bulleted => "ul",
        ListKind::Numbered => "ol",
    };
    create_element(tag, vec![("class", "bp-list")])
}

fn list_item(spans: &[RichText], children: Vec<Handle>) -> Handle {
    let li = inline_element("li", spans);
    append_all(&li, children);
    li
}

fn inline_element(tag: &str, spans: &[RichText]) -> Handle {
    let element = create_element(tag, vec![]);
    append_inline(&element, spans);
    element
}

fn append_inline(parent: &Handle, spans: &[RichText]) {
    append_all(parent, compose(spans).iter().map(|span| inline_node(&span.node)));
}

fn inline_node(node: &InlineNode) -> Handle {
    let (element, child) = match node {
        InlineNode::Text { text } => return create_text(text),
        InlineNode::Bold { child } => (create_element("strong", vec![]), child),
        InlineNode::Italic { child } => (create_element("em", vec![]), child),
        InlineNode::Strikethrough { child } => (create_element("s", vec![]), child),
        InlineNode::Underline { child } => (create_element("u", vec![]), child),
        InlineNode::Code { child } => (create_element("code", vec![]), child),
        InlineNode::Link { href, child } => (create_element("a", vec![("href", href)]), child),
        InlineNode::Color { color, child } => {
            let style = match color.strip_suffix("_background") {
                Some(base) => format!("background-color: {base}"),
                None => format!("color: {color}"),
            };
            (create_element("span", vec![("style", &style)]), child)
        }
    };
    append(&element, inline_node(child));
    element
}

fn code_element(code: &CodeBlock) -> Handle {
    let language = code.effective_language();
    let (pre, inner) = if language.is_empty() {
        (create_element("pre", vec![]), create_element("code", vec![]))
    } else {
        let class = format!("language-{language}");
        (
            create_element("pre", vec![("data-language", &language)]),
            create_element("code", vec![("class", &class)]),
        )
    };
    append(&inner, create_text(&code.source()));
    append(&pre, inner);
    pre
}

fn image_element(image: &ImageBlock, cx: &RenderContext<'_>) -> Handle {
    let caption = image.caption_text();
    match cx.resolve_image(&image.source) {
        ImageLocation::Available(src) if image.caption.is_empty() => {
            create_element("img", vec![("src", &src), ("alt", "")])
        }
        ImageLocation::Available(src) => {
            let figure = create_element("figure", vec![("class", "bp-image")]);
            append(&figure, create_element("img", vec![("src", &src), ("alt", &caption)]));
            let figcaption = inline_element("figcaption", &image.caption);
            append(&figure, figcaption);
            figure
        }
        ImageLocation::Unavailable { url, .. } => {
            let placeholder = create_element(
                "div",
                vec![("class", "bp-image-unavailable"), ("data-src", &url)],
            );
            let label = if caption.is_empty() {
                "Image unavailable".to_string()
            } else {
                format!("Image unavailable: {caption}")
            };
            append(&placeholder, create_text(&label));
            placeholder
        }
    }
}

fn table_element(table: &TableBlock, rows: Vec<Handle>) -> Handle {
    let element = create_element("table", vec![("class", "bp-table")]);
    let row_header_cells = usize::from(table.has_row_header);
    let mut rows = rows.into_iter().filter(|row| is_element(row, "tr"));

    if table.has_column_header {
        if let Some(first) = rows.next() {
            let thead = create_element("thead", vec![]);
            append(&thead, promote_cells(&first, usize::MAX));
            append(&element, thead);
        }
    }
    let tbody = create_element("tbody", vec![]);
    for row in rows {
        append(&tbody, promote_cells(&row, row_header_cells));
    }
    append(&element, tbody);
    element
}

/// Copy a row, turning its first `count` cells into header cells.
fn promote_cells(row: &Handle, count: usize) -> Handle {
    if count == 0 {
        return row.clone();
    }
    let promoted = create_element("tr", vec![]);
    for (index, cell) in row.children.borrow().iter().enumerate() {
        if index < count && is_element(cell, "td") {
            let th = create_element("th", vec![]);
            append_all(&th, cell.children.borrow().iter().cloned());
            append(&promoted, th);
        } else {
            append(&promoted, cell.clone());
        }
    }
    promoted
}

fn row_element(row: &TableRowBlock) -> Handle {
    let tr = create_element("tr", vec![]);
    for cell in &row.cells {
        append(&tr, inline_element("td", cell));
    }
    tr
}

fn bookmark_element(bookmark: &BookmarkBlock, cx: &RenderContext<'_>) -> Handle {
    match cx.link_preview(&bookmark.url) {
        Some(preview) => bookmark_card(&preview),
        None => {
            let paragraph = create_element("p", vec![("class", "bp-bookmark-link")]);
            let caption = plain_text(&bookmark.caption);
            let label = if caption.is_empty() {
                bookmark.url.as_str()
            } else {
                caption.as_str()
            };
            append(
                &paragraph,
                text_element("a", vec![("href", &bookmark.url)], label),
            );
            paragraph
        }
    }
}

fn bookmark_card(preview: &LinkPreview) -> Handle {
    let card = create_element("div", vec![("class", "bp-bookmark")]);
    let link = create_element("a", vec![("href", &preview.url)]);
    let text = create_element("div", vec![("class", "bp-bookmark-text")]);

    if let Some(title) = &preview.title {
        append(&text, text_element("h4", vec![], title));
    }
    if let Some(description) = preview.short_description() {
        append(
            &text,
            text_element("p", vec![("class", "bp-bookmark-description")], &description),
        );
    }
    let source = create_element("div", vec![("class", "bp-bookmark-source")]);
    if let Some(favicon) = &preview.favicon {
        append(&source, create_element("img", vec![("src", favicon), ("alt", "")]));
    }
    append(&source, text_element("span", vec![], &preview.short_url()));
    append(&text, source);
    append(&link, text);

    if let Some(image) = &preview.image {
        append(
            &link,
            create_element(
                "img",
                vec![("class", "bp-bookmark-image"), ("src", image), ("alt", "")],
            ),
        );
    }
    append(&card, link);
    card
}
