//! Depth-first traversal against a paginated store.

use crate::common::{bullet, numbered, paragraph, parent, PagedStore};
use blockpress::error::{Error, SourceError};
use blockpress::formats::tree::{outline, RenderedNode, TreeRenderer};
use blockpress::model::{BlockId, BlockKind, TextBlock, UnsupportedBlock};
use blockpress::source::BlockEntry;
use blockpress::{RenderContext, RenderOptions, TreeBuilder, UnsupportedPolicy};

fn build(store: &PagedStore, root: &str) -> Result<Vec<RenderedNode>, Error> {
    let context = RenderContext::default();
    TreeBuilder::new(store, &TreeRenderer, &context).build(&BlockId::new(root))
}

/// A chain of quotes `depth` levels deep under `root`, ending in a paragraph.
fn nested_chain(depth: usize, page_size: usize) -> PagedStore {
    let mut store = PagedStore::new(page_size);
    let mut current = "root".to_string();
    for level in 0..depth {
        let id = format!("q{level}");
        store = store.with(
            &current,
            vec![parent(&id, BlockKind::Quote(TextBlock::plain(&id)))],
        );
        current = id;
    }
    store.with(&current, vec![paragraph("leaf", "leaf")])
}

fn depth_of(nodes: &[RenderedNode]) -> usize {
    nodes
        .iter()
        .map(|node| 1 + depth_of(&node.children))
        .max()
        .unwrap_or(0)
}

#[test]
fn empty_parent_renders_nothing() {
    let store = PagedStore::new(10);
    assert!(build(&store, "root").unwrap().is_empty());
    assert_eq!(store.calls(), ["root"]);
}

#[test]
fn nesting_depth_is_preserved() {
    for depth in 0..=5 {
        let store = nested_chain(depth, 10);
        let nodes = build(&store, "root").unwrap();
        assert_eq!(depth_of(&nodes), depth + 1, "depth {depth}");
        // One request per level: the root plus every quote.
        assert_eq!(store.calls().len(), depth + 1, "depth {depth}");
    }
}

#[test]
fn sibling_counts_survive_page_boundaries() {
    for count in [0, 1, 50] {
        let entries: Vec<_> = (0..count)
            .map(|i| paragraph(&format!("p{i}"), &format!("text {i}")))
            .collect();
        let store = PagedStore::new(7).with("root", entries);
        let nodes = build(&store, "root").unwrap();

        assert_eq!(nodes.len(), count);
        let ids: Vec<_> = nodes.iter().filter_map(|n| n.id.clone()).collect();
        let expected: Vec<_> = (0..count).map(|i| format!("p{i}")).collect();
        assert_eq!(ids, expected);
        assert_eq!(store.calls_for("root"), count.div_ceil(7).max(1));
    }
}

#[test]
fn every_parent_is_listed_exactly_once() {
    let store = PagedStore::new(2)
        .with(
            "root",
            vec![
                parent("a", BlockKind::Paragraph(TextBlock::plain("a"))),
                paragraph("b", "b"),
                parent("c", BlockKind::Quote(TextBlock::plain("c"))),
            ],
        )
        .with("a", vec![paragraph("a1", "a1"), paragraph("a2", "a2"), paragraph("a3", "a3")])
        .with("c", vec![parent("c1", BlockKind::Quote(TextBlock::plain("c1")))])
        .with("c1", vec![paragraph("c11", "c11")]);

    let nodes = build(&store, "root").unwrap();
    assert_eq!(nodes.len(), 3);

    // Two pages for root and for "a", one for each other parent; leaves are never listed.
    let mut calls = store.calls();
    calls.sort();
    assert_eq!(calls, ["a", "a", "c", "c1", "root", "root"]);
    assert_eq!(
        nodes[0].children.iter().map(RenderedNode::text).collect::<Vec<_>>(),
        ["a1", "a2", "a3"]
    );
}

#[test]
fn list_runs_are_grouped_across_pages() {
    let store = PagedStore::new(2).with(
        "root",
        vec![
            paragraph("p1", "Hi"),
            numbered("n1", "One"),
            numbered("n2", "Two"),
            numbered("n3", "Three"),
            bullet("b1", "Dot"),
            paragraph("p2", "Bye"),
        ],
    );
    let nodes = build(&store, "root").unwrap();
    assert_eq!(
        outline(&nodes),
        "paragraph Hi\n\
         numbered_list\n  \
         numbered_list_item One\n  \
         numbered_list_item Two\n  \
         numbered_list_item Three\n\
         bulleted_list\n  \
         bulleted_list_item Dot\n\
         paragraph Bye\n"
    );
    assert_eq!(nodes[1].id.as_deref(), Some("n1"));
}

#[test]
fn list_items_keep_their_nested_children() {
    let store = PagedStore::new(10)
        .with(
            "root",
            vec![
                parent("b1", BlockKind::BulletedListItem(TextBlock::plain("outer"))),
                bullet("b2", "second"),
            ],
        )
        .with("b1", vec![bullet("b1a", "inner one"), bullet("b1b", "inner two")]);

    let nodes = build(&store, "root").unwrap();
    assert_eq!(nodes.len(), 1);
    let outer = &nodes[0].children[0];
    assert_eq!(outer.text(), "outer");
    assert_eq!(outer.children.len(), 1);
    assert_eq!(outer.children[0].kind, "bulleted_list");
    assert_eq!(outer.children[0].children.len(), 2);
}

#[test]
fn partial_entries_are_skipped() {
    let store = PagedStore::new(10).with(
        "root",
        vec![
            paragraph("p1", "kept"),
            BlockEntry::Partial { id: "hidden".into() },
            paragraph("p2", "also kept"),
        ],
    );
    let nodes = build(&store, "root").unwrap();
    let ids: Vec<_> = nodes.iter().filter_map(|n| n.id.as_deref()).collect();
    assert_eq!(ids, ["p1", "p2"]);
}

#[test]
fn nested_source_error_aborts_the_build() {
    let store = PagedStore::new(10)
        .with(
            "root",
            vec![
                paragraph("p1", "before"),
                parent("q", BlockKind::Quote(TextBlock::plain("q"))),
                paragraph("p2", "after"),
            ],
        )
        .failing_on("q");

    let err = build(&store, "root").unwrap_err();
    assert!(matches!(err, Error::Source(SourceError::Transport(ref msg)) if msg.contains("503")));
}

#[test]
fn unsupported_blocks_follow_the_policy() {
    let store = PagedStore::new(10).with(
        "root",
        vec![
            paragraph("p1", "text"),
            crate::common::full(
                "x",
                BlockKind::Unsupported(UnsupportedBlock {
                    kind: "synced_block".to_string(),
                }),
            ),
        ],
    );

    let nodes = build(&store, "root").unwrap();
    assert_eq!(nodes[1].kind, "placeholder");
    assert_eq!(nodes[1].attrs["block_type"], "synced_block");

    let context = RenderContext::new(RenderOptions {
        unsupported: UnsupportedPolicy::Skip,
        ..RenderOptions::default()
    });
    let nodes = TreeBuilder::new(&store, &TreeRenderer, &context)
        .build(&BlockId::new("root"))
        .unwrap();
    assert_eq!(nodes.len(), 1);
}
