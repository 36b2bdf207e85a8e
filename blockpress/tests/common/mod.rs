//! Fake collaborators and fixture builders shared by the integration tests.

#![allow(dead_code)]

use blockpress::error::{AssetError, SourceError};
use blockpress::model::{
    BlockId, BlockKind, BlockRecord, ImageBlock, PageRecord, TextBlock,
};
use blockpress::source::{BlockEntry, BlockPage, BlockSource, PageFilter, PageResolver};
use blockpress::Fetch;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use url::Url;

/// In-memory block store that serves children `page_size` at a time and
/// records every call it receives.
pub struct PagedStore {
    children: HashMap<String, Vec<BlockEntry>>,
    page_size: usize,
    failing: Option<String>,
    calls: RefCell<Vec<String>>,
}

impl PagedStore {
    pub fn new(page_size: usize) -> Self {
        Self {
            children: HashMap::new(),
            page_size,
            failing: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with(mut self, parent: &str, entries: Vec<BlockEntry>) -> Self {
        self.children.insert(parent.to_string(), entries);
        self
    }

    /// Fail every request for `parent`'s children.
    pub fn failing_on(mut self, parent: &str) -> Self {
        self.failing = Some(parent.to_string());
        self
    }

    /// Parents whose children were requested, one entry per page request.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn calls_for(&self, parent: &str) -> usize {
        self.calls.borrow().iter().filter(|p| *p == parent).count()
    }
}

impl BlockSource for PagedStore {
    fn list_children(
        &self,
        parent: &BlockId,
        cursor: Option<&str>,
    ) -> Result<BlockPage, SourceError> {
        self.calls.borrow_mut().push(parent.to_string());
        if self.failing.as_deref() == Some(parent.as_str()) {
            return Err(SourceError::Transport(format!("{parent}: 503")));
        }
        let entries = self.children.get(parent.as_str()).cloned().unwrap_or_default();
        let offset: usize = cursor.map_or(0, |c| c.parse().unwrap());
        let end = (offset + self.page_size).min(entries.len());
        Ok(BlockPage {
            results: entries[offset.min(end)..end].to_vec(),
            next_cursor: (end < entries.len()).then(|| end.to_string()),
        })
    }
}

/// Page resolver over a fixed list of page records.
pub struct Pages(pub Vec<PageRecord>);

impl PageResolver for Pages {
    fn query_pages(&self, filter: &PageFilter) -> Result<Vec<PageRecord>, SourceError> {
        let mut pages: Vec<_> = self
            .0
            .iter()
            .filter(|page| filter.matches(page))
            .cloned()
            .collect();
        filter.sort_pages(&mut pages);
        Ok(pages)
    }
}

/// Serves fixed bytes and counts fetches.
#[derive(Default)]
pub struct CountingFetcher {
    pub bytes: Vec<u8>,
    count: AtomicUsize,
    urls: Mutex<Vec<String>>,
}

impl CountingFetcher {
    pub fn serving(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
            ..Self::default()
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

impl Fetch for CountingFetcher {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, AssetError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        Ok(self.bytes.clone())
    }
}

/// Fails every fetch.
pub struct OfflineFetcher;

impl Fetch for OfflineFetcher {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, AssetError> {
        Err(AssetError::Fetch {
            url: url.to_string(),
            reason: "offline".to_string(),
        })
    }
}

pub fn full(id: &str, kind: BlockKind) -> BlockEntry {
    BlockEntry::Full(BlockRecord::new(id, kind))
}

/// A block that owns children.
pub fn parent(id: &str, kind: BlockKind) -> BlockEntry {
    BlockEntry::Full(BlockRecord::new(id, kind).with_children())
}

pub fn paragraph(id: &str, text: &str) -> BlockEntry {
    full(id, BlockKind::Paragraph(TextBlock::plain(text)))
}

pub fn bullet(id: &str, text: &str) -> BlockEntry {
    full(id, BlockKind::BulletedListItem(TextBlock::plain(text)))
}

pub fn numbered(id: &str, text: &str) -> BlockEntry {
    full(id, BlockKind::NumberedListItem(TextBlock::plain(text)))
}

pub fn hosted_image(id: &str, url: &str) -> BlockEntry {
    full(id, BlockKind::Image(ImageBlock::hosted(url)))
}

/// A published page with the default property names.
pub fn published_page(id: &str, slug: &str, title: &str, created: &str) -> PageRecord {
    PageRecord::new(id)
        .with_title_property("slug", slug)
        .with_text_property("title", title)
        .with_checkbox_property("published", true)
        .with_created_time(created)
}
