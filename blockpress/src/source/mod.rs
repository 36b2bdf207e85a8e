//! Collaborator contracts for the remote document store.
//!
//! The engine never talks to the network itself. It consumes two traits:
//!
//! - [`BlockSource`]: one page of child blocks for a parent, plus a cursor to
//!   the next page. [`Paginated`] turns that into a lazy iterator that walks
//!   every page in store order.
//! - [`PageResolver`]: page records matching a [`PageFilter`].
//!
//! [`export::ExportSource`] implements both over an on-disk snapshot of the
//! store, and [`json`] decodes the store's wire shapes.

pub mod export;
pub mod json;

use crate::error::SourceError;
use crate::model::{BlockId, BlockRecord, PageRecord, PropertyNames};

/// An entry in a page of child blocks.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockEntry {
    /// A fully resolved block.
    Full(BlockRecord),
    /// A permission-restricted or deleted stub. Skipped by the builder.
    Partial { id: BlockId },
}

/// One page of sibling blocks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockPage {
    pub results: Vec<BlockEntry>,
    /// Cursor for the next page; `None` on the last page.
    pub next_cursor: Option<String>,
}

/// Paged access to the children of a block (or of a page).
pub trait BlockSource {
    fn list_children(
        &self,
        parent: &BlockId,
        cursor: Option<&str>,
    ) -> Result<BlockPage, SourceError>;
}

impl<S: BlockSource + ?Sized> BlockSource for &S {
    fn list_children(
        &self,
        parent: &BlockId,
        cursor: Option<&str>,
    ) -> Result<BlockPage, SourceError> {
        (**self).list_children(parent, cursor)
    }
}

/// Lazy, finite sequence of the children of one parent.
///
/// Pages are requested on demand. The sequence cannot be rewound; call
/// [`iterate_children`] again to restart it. After an error the iterator
/// is fused.
pub struct Paginated<'a, S: ?Sized> {
    source: &'a S,
    parent: BlockId,
    buffer: std::vec::IntoIter<BlockEntry>,
    cursor: Option<String>,
    exhausted: bool,
}

/// Iterate over every child of `parent`, across all pages.
pub fn iterate_children<'a, S: BlockSource + ?Sized>(
    source: &'a S,
    parent: &BlockId,
) -> Paginated<'a, S> {
    Paginated {
        source,
        parent: parent.clone(),
        buffer: Vec::new().into_iter(),
        cursor: None,
        exhausted: false,
    }
}

impl<S: BlockSource + ?Sized> Iterator for Paginated<'_, S> {
    type Item = Result<BlockEntry, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.buffer.next() {
                return Some(Ok(entry));
            }
            if self.exhausted {
                return None;
            }
            match self
                .source
                .list_children(&self.parent, self.cursor.as_deref())
            {
                Ok(page) => {
                    self.exhausted = page.next_cursor.is_none();
                    self.cursor = page.next_cursor;
                    self.buffer = page.results.into_iter();
                }
                Err(err) => {
                    self.exhausted = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

/// Ordering applied to query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSort {
    /// Keep the store's order.
    #[default]
    Store,
    /// Newest creation time first.
    CreatedDescending,
    CreatedAscending,
}

/// Predicate over page records, with an ordering for multi-page queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFilter {
    pub slug: Option<String>,
    pub published_only: bool,
    pub sort: PageSort,
    pub properties: PropertyNames,
}

impl PageFilter {
    /// Every page, in store order.
    pub fn all(properties: &PropertyNames) -> Self {
        Self {
            slug: None,
            published_only: false,
            sort: PageSort::Store,
            properties: properties.clone(),
        }
    }

    /// Published pages only.
    pub fn published(properties: &PropertyNames) -> Self {
        Self {
            published_only: true,
            ..Self::all(properties)
        }
    }

    /// The published page whose slug equals `slug`.
    pub fn by_slug(slug: &str, properties: &PropertyNames) -> Self {
        Self {
            slug: Some(slug.to_string()),
            ..Self::published(properties)
        }
    }

    pub fn sorted(mut self, sort: PageSort) -> Self {
        self.sort = sort;
        self
    }

    /// Whether `page` satisfies this filter. Unreadable properties never match.
    pub fn matches(&self, page: &PageRecord) -> bool {
        if self.published_only && page.checkbox_property(&self.properties.published) != Ok(true)
        {
            return false;
        }
        match &self.slug {
            Some(slug) => page
                .text_property(&self.properties.slug)
                .is_ok_and(|found| &found == slug),
            None => true,
        }
    }

    /// Apply the filter's ordering in place. The sort is stable.
    pub fn sort_pages(&self, pages: &mut [PageRecord]) {
        match self.sort {
            PageSort::Store => {}
            PageSort::CreatedAscending => pages.sort_by(|a, b| a.created_time.cmp(&b.created_time)),
            PageSort::CreatedDescending => {
                pages.sort_by(|a, b| b.created_time.cmp(&a.created_time))
            }
        }
    }
}

/// Query access to page records.
pub trait PageResolver {
    /// All full page records matching `filter`, ordered per `filter.sort`.
    fn query_pages(&self, filter: &PageFilter) -> Result<Vec<PageRecord>, SourceError>;

    /// The first matching page, if any.
    fn find_page(&self, filter: &PageFilter) -> Result<Option<PageRecord>, SourceError> {
        Ok(self.query_pages(filter)?.into_iter().next())
    }
}
