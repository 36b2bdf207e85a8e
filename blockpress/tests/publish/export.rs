//! Publishing from an on-disk export directory.

use blockpress::{ExportSource, HtmlRenderer, Publisher, RenderContext, TreeRenderer};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn text(s: &str) -> serde_json::Value {
    json!({ "rich_text": [{ "type": "text", "plain_text": s }] })
}

fn write_export(root: &Path) {
    fs::create_dir_all(root.join("blocks")).unwrap();
    fs::write(
        root.join("pages.json"),
        json!([{
            "object": "page",
            "id": "page-hello",
            "created_time": "2024-01-05T00:00:00.000Z",
            "properties": {
                "slug": { "type": "title", "title": [{ "plain_text": "hello" }] },
                "title": { "type": "rich_text", "rich_text": [{ "plain_text": "Hello" }] },
                "published": { "type": "checkbox", "checkbox": true }
            }
        }])
        .to_string(),
    )
    .unwrap();
    fs::write(
        root.join("blocks").join("page-hello.json"),
        json!([
            { "id": "b1", "type": "heading_1", "heading_1": text("Greeting") },
            { "id": "b2", "type": "quote", "has_children": true, "quote": text("Said") },
            { "id": "b3", "type": "divider", "divider": {} },
            { "id": "b4", "type": "child_page", "child_page": { "title": "Appendix" } }
        ])
        .to_string(),
    )
    .unwrap();
    fs::write(
        root.join("blocks").join("b2.json"),
        json!([{ "id": "b2a", "type": "paragraph", "paragraph": text("nested") }]).to_string(),
    )
    .unwrap();
}

#[test]
fn export_renders_to_tree() {
    let dir = tempdir().unwrap();
    write_export(dir.path());
    let export = ExportSource::new(dir.path()).with_page_size(1);
    let context = RenderContext::default();

    let document = Publisher::new(&export, &export, &TreeRenderer, &context)
        .document("hello")
        .unwrap();
    let kinds: Vec<_> = document.body.iter().map(|n| n.kind.as_str()).collect();
    assert_eq!(kinds, ["heading_1", "quote", "divider", "child_page"]);
    assert_eq!(document.body[1].children[0].text(), "nested");
    assert_eq!(document.body[3].attrs["title"], "Appendix");
}

#[test]
fn export_renders_to_html() {
    let dir = tempdir().unwrap();
    write_export(dir.path());
    let export = ExportSource::new(dir.path());
    let context = RenderContext::default();

    let document = Publisher::new(&export, &export, &HtmlRenderer, &context)
        .document("hello")
        .unwrap();
    let html = HtmlRenderer.to_html(&document.body).unwrap();
    assert_eq!(
        html,
        "<h1>Greeting</h1>\
         <blockquote>Said<p>nested</p></blockquote>\
         <hr>\
         <p class=\"bp-child-page\" data-page-id=\"b4\">Appendix</p>"
    );
}
