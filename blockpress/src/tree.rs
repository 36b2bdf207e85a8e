//! Block tree traversal.
//!
//! [`TreeBuilder::build`] walks the children of a parent depth-first:
//!
//!     1. Page through the parent's children in store order, skipping partial
//!        entries.
//!     2. For each block that owns children, build its subtree first, so the
//!        renderer always sees fully rendered children.
//!     3. Once every page is consumed, group the resolved siblings into lists
//!        and render each unit; units the renderer drops are left out.
//!
//! Each level makes its own round-trips to the block source, one per page.
//! There is no depth limit. A source error aborts the build and propagates.
//!
//! Child pages are documents of their own and renderers show only their
//! title. Their subtree is still built, but under a detached context, so it
//! mirrors no assets and fetches no link previews.

use crate::common::grouping::group_siblings;
use crate::error::Error;
use crate::model::{BlockId, BlockKind, ResolvedBlock};
use crate::render::{RenderContext, Renderer};
use crate::source::{iterate_children, BlockEntry, BlockSource};
use log::debug;

/// Builds rendered block trees from a block source.
pub struct TreeBuilder<'a, S: ?Sized, R> {
    source: &'a S,
    renderer: &'a R,
    context: &'a RenderContext<'a>,
}

impl<'a, S, R> TreeBuilder<'a, S, R>
where
    S: BlockSource + ?Sized,
    R: Renderer,
{
    pub fn new(source: &'a S, renderer: &'a R, context: &'a RenderContext<'a>) -> Self {
        Self {
            source,
            renderer,
            context,
        }
    }

    /// Render the children of `parent` (a page or a block).
    pub fn build(&self, parent: &BlockId) -> Result<Vec<R::Output>, Error> {
        self.build_level(parent, 0, self.context)
    }

    fn build_level(
        &self,
        parent: &BlockId,
        depth: usize,
        cx: &RenderContext<'_>,
    ) -> Result<Vec<R::Output>, Error> {
        let mut siblings = Vec::new();
        for entry in iterate_children(self.source, parent) {
            let record = match entry? {
                BlockEntry::Full(record) => record,
                BlockEntry::Partial { id } => {
                    debug!("Skipping partial block {id}");
                    continue;
                }
            };
            let block = if record.has_children {
                let children = if matches!(record.kind, BlockKind::ChildPage(_)) {
                    self.build_level(&record.id, depth + 1, &cx.detached())?
                } else {
                    self.build_level(&record.id, depth + 1, cx)?
                };
                ResolvedBlock::with_children(record, children)
            } else {
                ResolvedBlock::leaf(record)
            };
            siblings.push(block);
        }
        debug!(
            "Resolved {} children of {parent} at depth {depth}",
            siblings.len()
        );

        let mut rendered = Vec::with_capacity(siblings.len());
        for unit in group_siblings(siblings) {
            if let Some(node) = self.renderer.render(unit, cx)? {
                rendered.push(node);
            }
        }
        Ok(rendered)
    }
}
