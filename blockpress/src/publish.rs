//! Document publishing pipeline.
//!
//! [`Publisher`] ties the collaborators together: it resolves a page through
//! the [`PageResolver`], builds its body from the [`BlockSource`] with the
//! configured renderer, and assembles the result into a [`Document`].
//!
//! ```ignore
//! let export = ExportSource::new("export");
//! let context = RenderContext::new(RenderOptions::default()).with_assets(&mirror);
//! let publisher = Publisher::new(&export, &export, &HtmlRenderer, &context);
//! let document = publisher.document("hello")?;
//! ```
//!
//! A slug that matches no published page is [`Error::NotFound`]; a page that
//! matches but lacks required metadata is [`Error::MalformedRecord`].

use crate::document::{assemble, Document};
use crate::error::Error;
use crate::model::{BlockId, PageRecord, PropertyNames};
use crate::render::{RenderContext, Renderer};
use crate::source::{BlockSource, PageFilter, PageResolver, PageSort};
use crate::tree::TreeBuilder;
use log::info;

/// Builds documents from a block source and a page resolver.
pub struct Publisher<'a, S: ?Sized, P: ?Sized, R> {
    blocks: &'a S,
    pages: &'a P,
    renderer: &'a R,
    context: &'a RenderContext<'a>,
    properties: PropertyNames,
}

impl<'a, S, P, R> Publisher<'a, S, P, R>
where
    S: BlockSource + ?Sized,
    P: PageResolver + ?Sized,
    R: Renderer,
{
    pub fn new(
        blocks: &'a S,
        pages: &'a P,
        renderer: &'a R,
        context: &'a RenderContext<'a>,
    ) -> Self {
        Self {
            blocks,
            pages,
            renderer,
            context,
            properties: PropertyNames::default(),
        }
    }

    /// Read metadata from differently named page properties.
    pub fn with_properties(mut self, properties: PropertyNames) -> Self {
        self.properties = properties;
        self
    }

    pub fn properties(&self) -> &PropertyNames {
        &self.properties
    }

    /// The published document with the given slug.
    pub fn document(&self, slug: &str) -> Result<Document<R::Output>, Error> {
        let filter = PageFilter::by_slug(slug, &self.properties);
        let page = self
            .pages
            .find_page(&filter)?
            .ok_or_else(|| Error::NotFound(slug.to_string()))?;
        self.render_page(&page)
    }

    /// Published documents, newest first.
    pub fn published_documents(&self) -> Result<Vec<Document<R::Output>>, Error> {
        self.documents(&self.listing_filter())
    }

    /// Every document matching `filter`, in the filter's order.
    pub fn documents(&self, filter: &PageFilter) -> Result<Vec<Document<R::Output>>, Error> {
        let pages = self.pages.query_pages(filter)?;
        info!("Rendering {} documents", pages.len());
        pages.iter().map(|page| self.render_page(page)).collect()
    }

    /// The filter used by [`Publisher::published_documents`].
    pub fn listing_filter(&self) -> PageFilter {
        PageFilter::published(&self.properties).sorted(PageSort::CreatedDescending)
    }

    fn render_page(&self, page: &PageRecord) -> Result<Document<R::Output>, Error> {
        let builder = TreeBuilder::new(self.blocks, self.renderer, self.context);
        let body = builder.build(&BlockId::new(page.id.as_str()))?;
        let document = assemble(page, body, &self.properties)?;
        info!(
            "Assembled document '{}' ({} top-level nodes)",
            document.metadata.slug,
            document.body.len()
        );
        Ok(document)
    }
}
