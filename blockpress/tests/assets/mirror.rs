//! Asset mirroring through the full build pipeline and directly.

use crate::common::{full, hosted_image, parent, CountingFetcher, OfflineFetcher, PagedStore};
use blockpress::formats::tree::TreeRenderer;
use blockpress::model::{BlockId, BlockKind, BookmarkBlock, ChildPageBlock};
use blockpress::{
    AssetMirror, AssetNaming, HtmlRenderer, MirrorOptions, RenderContext, TreeBuilder,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

const CAT_URL: &str = "https://files.example/space/a1b2/pics/cat.png?X-Amz-Signature=abc";

fn file_name_options(root: &Path) -> MirrorOptions {
    MirrorOptions {
        directory: root.join("public").join("notion-files"),
        public_prefix: "/notion-files".to_string(),
        naming: AssetNaming::FileName,
    }
}

fn image_store() -> PagedStore {
    PagedStore::new(10).with("root", vec![hosted_image("img", CAT_URL)])
}

fn render_src(mirror: &AssetMirror) -> String {
    let store = image_store();
    let context = RenderContext::default().with_assets(mirror);
    let nodes = TreeBuilder::new(&store, &TreeRenderer, &context)
        .build(&BlockId::new("root"))
        .unwrap();
    assert_eq!(nodes[0].kind, "image");
    nodes[0].attrs["src"].clone()
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn cached_asset_is_not_fetched() {
    let dir = tempdir().unwrap();
    let options = file_name_options(dir.path());
    fs::create_dir_all(&options.directory).unwrap();
    fs::write(options.directory.join("cat.png"), b"already here").unwrap();

    let fetcher = Arc::new(CountingFetcher::serving(b"fresh"));
    let mirror = AssetMirror::new(options.clone(), fetcher.clone());

    assert_eq!(render_src(&mirror), "/notion-files/cat.png");
    assert_eq!(fetcher.count(), 0);
    assert_eq!(
        fs::read(options.directory.join("cat.png")).unwrap(),
        b"already here"
    );
}

#[test]
fn missing_asset_is_fetched_and_written_once() {
    let dir = tempdir().unwrap();
    let options = file_name_options(dir.path());
    let fetcher = Arc::new(CountingFetcher::serving(b"meow"));
    let mirror = AssetMirror::new(options.clone(), fetcher.clone());

    assert_eq!(render_src(&mirror), "/notion-files/cat.png");
    assert_eq!(fetcher.count(), 1);
    assert_eq!(fetcher.urls(), [CAT_URL]);
    assert_eq!(entries(&options.directory), ["cat.png"]);
    assert_eq!(fs::read(options.directory.join("cat.png")).unwrap(), b"meow");
}

#[test]
fn second_build_reuses_the_mirrored_file() {
    let dir = tempdir().unwrap();
    let fetcher = Arc::new(CountingFetcher::serving(b"meow"));
    let mirror = AssetMirror::new(file_name_options(dir.path()), fetcher.clone());

    let first = render_src(&mirror);
    let second = render_src(&mirror);
    assert_eq!(first, second);
    assert_eq!(fetcher.count(), 1);
}

#[test]
fn concurrent_builds_fetch_once() {
    let dir = tempdir().unwrap();
    let fetcher = Arc::new(CountingFetcher::serving(b"meow"));
    let mirror = AssetMirror::new(file_name_options(dir.path()), fetcher.clone());

    let paths: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| mirror.mirror(CAT_URL).unwrap().public_path))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(paths.iter().all(|p| p == "/notion-files/cat.png"));
    assert_eq!(fetcher.count(), 1);
}

#[test]
fn hashed_names_keep_same_named_files_apart() {
    let dir = tempdir().unwrap();
    let options = MirrorOptions {
        naming: AssetNaming::Hashed,
        ..file_name_options(dir.path())
    };
    let fetcher = Arc::new(CountingFetcher::serving(b"meow"));
    let mirror = AssetMirror::new(options.clone(), fetcher.clone());

    let a = mirror.mirror("https://files.example/one/cat.png?sig=1").unwrap();
    let a_again = mirror.mirror("https://files.example/one/cat.png?sig=2").unwrap();
    let b = mirror.mirror("https://files.example/two/cat.png?sig=1").unwrap();

    assert_eq!(a, a_again);
    assert_ne!(a.file_name, b.file_name);
    assert!(a.public_path.starts_with("/notion-files/"));
    assert!(a.public_path.ends_with("-cat.png"));
    assert_eq!(fetcher.count(), 2);
    assert_eq!(entries(&options.directory).len(), 2);
}

#[test]
fn failed_fetch_renders_placeholder_and_writes_nothing() {
    let dir = tempdir().unwrap();
    let options = file_name_options(dir.path());
    let mirror = AssetMirror::new(options.clone(), Arc::new(OfflineFetcher));
    let store = image_store();
    let context = RenderContext::default().with_assets(&mirror);

    let nodes = TreeBuilder::new(&store, &HtmlRenderer, &context)
        .build(&BlockId::new("root"))
        .unwrap();
    let html = HtmlRenderer.to_html(&nodes).unwrap();
    assert!(html.starts_with(r#"<div class="bp-image-unavailable""#));
    assert!(html.contains("Image unavailable"));
    assert!(!options.directory.join("cat.png").exists());
}

#[test]
fn child_page_bodies_mirror_nothing() {
    let dir = tempdir().unwrap();
    let options = file_name_options(dir.path());
    let fetcher = Arc::new(CountingFetcher::serving(b"meow"));
    let mirror = AssetMirror::new(options.clone(), fetcher.clone());
    let store = PagedStore::new(10)
        .with(
            "root",
            vec![parent(
                "sub",
                BlockKind::ChildPage(ChildPageBlock {
                    title: "Appendix".to_string(),
                }),
            )],
        )
        .with(
            "sub",
            vec![
                hosted_image("img", CAT_URL),
                full(
                    "bm",
                    BlockKind::Bookmark(BookmarkBlock {
                        url: "https://example.com/".to_string(),
                        caption: Vec::new(),
                    }),
                ),
            ],
        );
    let context = RenderContext::default()
        .with_assets(&mirror)
        .with_fetcher(fetcher.as_ref());

    let nodes = TreeBuilder::new(&store, &TreeRenderer, &context)
        .build(&BlockId::new("root"))
        .unwrap();

    assert_eq!(nodes[0].kind, "child_page");
    assert_eq!(nodes[0].attrs["title"], "Appendix");
    // The subtree was listed but nothing in it touched the network or disk.
    assert_eq!(store.calls_for("sub"), 1);
    assert_eq!(fetcher.count(), 0);
    assert!(!options.directory.exists());
}
