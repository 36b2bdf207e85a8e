//! HTML output for whole block trees and pages.

use crate::common::{
    bullet, full, numbered, paragraph, parent, published_page, CountingFetcher, PagedStore, Pages,
};
use blockpress::model::{
    BlockId, BlockKind, BookmarkBlock, RichText, TableBlock, TableRowBlock, TextBlock,
};
use blockpress::{HtmlRenderer, Publisher, RenderContext, TreeBuilder};
use insta::assert_snapshot;

fn body_html(store: &PagedStore, context: &RenderContext<'_>) -> String {
    let nodes = TreeBuilder::new(store, &HtmlRenderer, context)
        .build(&BlockId::new("root"))
        .unwrap();
    HtmlRenderer.to_html(&nodes).unwrap()
}

#[test]
fn hello_page() {
    let store = PagedStore::new(2).with(
        "page-hello",
        vec![
            paragraph("b1", "Hi"),
            numbered("b2", "One"),
            numbered("b3", "Two"),
            paragraph("b4", "Bye"),
        ],
    );
    let pages = Pages(vec![published_page(
        "page-hello",
        "hello",
        "Hello & welcome",
        "2024-01-05T00:00Z",
    )]);
    let context = RenderContext::default();
    let document = Publisher::new(&store, &pages, &HtmlRenderer, &context)
        .document("hello")
        .unwrap();

    let html = HtmlRenderer.to_html_page(&document).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Hello &amp; welcome</title>"));
    assert!(html.contains(r#"<time datetime="2024-01-05">2024-01-05</time>"#));
    assert!(html.contains("<style>"));

    assert_snapshot!(
        HtmlRenderer.to_html(&document.body).unwrap(),
        @r#"<p>Hi</p><ol class="bp-list"><li>One</li><li>Two</li></ol><p>Bye</p>"#
    );
}

#[test]
fn mixed_list_kinds_stay_separate() {
    let store = PagedStore::new(10).with(
        "root",
        vec![bullet("a", "dot"), numbered("b", "first"), bullet("c", "dot again")],
    );
    assert_eq!(
        body_html(&store, &RenderContext::default()),
        r#"<ul class="bp-list"><li>dot</li></ul><ol class="bp-list"><li>first</li></ol><ul class="bp-list"><li>dot again</li></ul>"#
    );
}

#[test]
fn nested_list_renders_inside_item() {
    let store = PagedStore::new(10)
        .with(
            "root",
            vec![parent("a", BlockKind::BulletedListItem(TextBlock::plain("outer")))],
        )
        .with("a", vec![numbered("a1", "inner")]);
    assert_eq!(
        body_html(&store, &RenderContext::default()),
        r#"<ul class="bp-list"><li>outer<ol class="bp-list"><li>inner</li></ol></li></ul>"#
    );
}

#[test]
fn table_rows_come_from_children() {
    let row = |cells: &[&str]| TableRowBlock {
        cells: cells.iter().map(|c| vec![RichText::plain(c)]).collect(),
    };
    let store = PagedStore::new(1)
        .with(
            "root",
            vec![parent(
                "t",
                BlockKind::Table(TableBlock {
                    table_width: 2,
                    has_column_header: true,
                    has_row_header: false,
                }),
            )],
        )
        .with(
            "t",
            vec![
                full("r1", BlockKind::TableRow(row(&["Name", "Age"]))),
                full("r2", BlockKind::TableRow(row(&["Ada", "36"]))),
            ],
        );
    assert_eq!(
        body_html(&store, &RenderContext::default()),
        "<table class=\"bp-table\">\
         <thead><tr><th>Name</th><th>Age</th></tr></thead>\
         <tbody><tr><td>Ada</td><td>36</td></tr></tbody>\
         </table>"
    );
}

#[test]
fn bookmark_preview_is_fetched_through_the_context() {
    let page = r#"<html><head>
        <meta property="og:title" content="Example Domain">
        <meta property="og:description" content="For use in documents">
        </head><body></body></html>"#;
    let fetcher = CountingFetcher::serving(page.as_bytes());
    let store = PagedStore::new(10).with(
        "root",
        vec![full(
            "bm",
            BlockKind::Bookmark(BookmarkBlock {
                url: "https://example.com/".to_string(),
                caption: Vec::new(),
            }),
        )],
    );
    let context = RenderContext::default().with_fetcher(&fetcher);

    let html = body_html(&store, &context);
    assert_eq!(fetcher.count(), 1);
    assert!(html.starts_with(r#"<div class="bp-bookmark"><a href="https://example.com/">"#));
    assert!(html.contains("<h4>Example Domain</h4>"));
    assert!(html.contains("For use in documents"));
    assert!(html.contains(r#"<img src="https://example.com/favicon.ico" alt="">"#));
}
