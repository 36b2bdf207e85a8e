use serde_json::json;
use std::fs;
use std::path::Path;

/// Write a small export: one published page ("hello"), one draft, and a
/// hosted image served from a local mirror root.
pub fn write_export(root: &Path) {
    fs::create_dir_all(root.join("blocks")).unwrap();
    let pages = json!([
        {
            "id": "page-hello",
            "created_time": "2024-01-05T00:00:00.000Z",
            "properties": {
                "slug": { "type": "title", "title": [{ "plain_text": "hello" }] },
                "title": { "type": "rich_text", "rich_text": [{ "plain_text": "Hello" }] },
                "published": { "type": "checkbox", "checkbox": true }
            }
        },
        {
            "id": "page-draft",
            "created_time": "2024-02-01T00:00:00.000Z",
            "properties": {
                "slug": { "type": "title", "title": [{ "plain_text": "draft" }] },
                "title": { "type": "rich_text", "rich_text": [{ "plain_text": "Draft" }] },
                "published": { "type": "checkbox", "checkbox": false }
            }
        }
    ]);
    fs::write(root.join("pages.json"), pages.to_string()).unwrap();

    let text = |s: &str| json!({ "rich_text": [{ "type": "text", "plain_text": s }] });
    let blocks = json!([
        { "id": "b1", "type": "paragraph", "paragraph": text("Hi") },
        { "id": "b2", "type": "numbered_list_item", "numbered_list_item": text("One") },
        { "id": "b3", "type": "numbered_list_item", "numbered_list_item": text("Two") },
        { "id": "b4", "type": "paragraph", "paragraph": text("Bye") }
    ]);
    fs::write(
        root.join("blocks").join("page-hello.json"),
        blocks.to_string(),
    )
    .unwrap();
}

/// Write an export whose published pages carry the given slugs, each with a
/// one-paragraph body.
pub fn write_export_with_slugs(root: &Path, slugs: &[&str]) {
    fs::create_dir_all(root.join("blocks")).unwrap();
    let pages: Vec<_> = slugs
        .iter()
        .enumerate()
        .map(|(i, slug)| {
            json!({
                "id": format!("page-{i}"),
                "created_time": format!("2024-01-0{}T00:00:00.000Z", i + 1),
                "properties": {
                    "slug": { "type": "title", "title": [{ "plain_text": slug }] },
                    "title": { "type": "rich_text", "rich_text": [{ "plain_text": format!("Page {i}") }] },
                    "published": { "type": "checkbox", "checkbox": true }
                }
            })
        })
        .collect();
    fs::write(root.join("pages.json"), json!(pages).to_string()).unwrap();
    for i in 0..slugs.len() {
        let blocks = json!([{
            "id": format!("b{i}"),
            "type": "paragraph",
            "paragraph": { "rich_text": [{ "type": "text", "plain_text": "body" }] }
        }]);
        fs::write(
            root.join("blocks").join(format!("page-{i}.json")),
            blocks.to_string(),
        )
        .unwrap();
    }
}
