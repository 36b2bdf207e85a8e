//! Renderer plug-in contract.
//!
//! The tree builder is polymorphic over its output: a [`Renderer`] turns a
//! resolved block (children already rendered) or a grouped list into one
//! output node, or into nothing. Renderers reach shared services (the asset
//! mirror, the fetcher used for link previews) through [`RenderContext`].

use crate::assets::AssetMirror;
use crate::common::grouping::{Grouped, GroupedList};
use crate::error::Error;
use crate::fetch::Fetch;
use crate::model::{ImageSource, ResolvedBlock};
use crate::preview::{fetch_preview, LinkPreview};
use log::{debug, warn};

/// What to do with block kinds the renderer has no mapping for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnsupportedPolicy {
    /// Render a visible placeholder naming the kind.
    #[default]
    Placeholder,
    /// Render nothing.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub unsupported: UnsupportedPolicy,
    /// Fetch bookmarked pages to render preview cards.
    pub bookmark_previews: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            unsupported: UnsupportedPolicy::Placeholder,
            bookmark_previews: true,
        }
    }
}

/// Where an image should be loaded from in the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLocation {
    /// Usable reference: an external URL or a mirrored local path.
    Available(String),
    /// Mirroring failed; the remote URL is kept for the placeholder.
    Unavailable { url: String, reason: String },
}

/// Per-build services handed to the renderer.
pub struct RenderContext<'a> {
    options: RenderOptions,
    assets: Option<&'a AssetMirror>,
    fetcher: Option<&'a dyn Fetch>,
}

impl<'a> RenderContext<'a> {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            assets: None,
            fetcher: None,
        }
    }

    /// Mirror hosted images through `assets`.
    pub fn with_assets(mut self, assets: &'a AssetMirror) -> Self {
        self.assets = Some(assets);
        self
    }

    /// Use `fetcher` for link previews.
    pub fn with_fetcher(mut self, fetcher: &'a dyn Fetch) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// A context with the same options but no asset mirror or fetcher, for
    /// subtrees whose output is discarded. Hosted images there are linked
    /// directly and bookmarks render as plain links.
    pub fn detached(&self) -> RenderContext<'a> {
        RenderContext::new(self.options.clone())
    }

    /// Resolve an image source to the reference the output should use.
    ///
    /// External images are hot-linked. Hosted images go through the asset
    /// mirror when one is configured; a mirror failure is isolated to this
    /// image.
    pub fn resolve_image(&self, source: &ImageSource) -> ImageLocation {
        match (source, self.assets) {
            (ImageSource::External { url }, _) => ImageLocation::Available(url.clone()),
            (ImageSource::File { url, .. }, None) => {
                debug!("No asset mirror configured; linking {url} directly");
                ImageLocation::Available(url.clone())
            }
            (ImageSource::File { url, .. }, Some(mirror)) => match mirror.mirror(url) {
                Ok(asset) => ImageLocation::Available(asset.public_path),
                Err(err) => {
                    warn!("Image could not be mirrored, rendering placeholder: {err}");
                    ImageLocation::Unavailable {
                        url: url.clone(),
                        reason: err.to_string(),
                    }
                }
            },
        }
    }

    /// Preview card data for `url`, or `None` when previews are disabled,
    /// no fetcher is configured, or the page could not be read.
    pub fn link_preview(&self, url: &str) -> Option<LinkPreview> {
        if !self.options.bookmark_previews {
            return None;
        }
        let fetcher = self.fetcher?;
        match fetch_preview(fetcher, url) {
            Ok(preview) => Some(preview),
            Err(err) => {
                warn!("Bookmark preview for {url} failed, rendering plain link: {err}");
                None
            }
        }
    }
}

impl Default for RenderContext<'_> {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

/// Turns resolved blocks into output nodes.
pub trait Renderer {
    type Output;

    /// Render one standalone block. `Ok(None)` drops it from the output.
    fn render_block(
        &self,
        block: ResolvedBlock<Self::Output>,
        cx: &RenderContext<'_>,
    ) -> Result<Option<Self::Output>, Error>;

    /// Render a run of grouped list items as one list node.
    fn render_list(
        &self,
        list: GroupedList<Self::Output>,
        cx: &RenderContext<'_>,
    ) -> Result<Option<Self::Output>, Error>;

    /// Dispatch a grouper unit to the matching method.
    fn render(
        &self,
        unit: Grouped<Self::Output>,
        cx: &RenderContext<'_>,
    ) -> Result<Option<Self::Output>, Error> {
        match unit {
            Grouped::Single(block) => self.render_block(block, cx),
            Grouped::List(list) => self.render_list(list, cx),
        }
    }
}

impl<R: Renderer + ?Sized> Renderer for &R {
    type Output = R::Output;

    fn render_block(
        &self,
        block: ResolvedBlock<Self::Output>,
        cx: &RenderContext<'_>,
    ) -> Result<Option<Self::Output>, Error> {
        (**self).render_block(block, cx)
    }

    fn render_list(
        &self,
        list: GroupedList<Self::Output>,
        cx: &RenderContext<'_>,
    ) -> Result<Option<Self::Output>, Error> {
        (**self).render_list(list, cx)
    }
}
