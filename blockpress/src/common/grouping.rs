//! Grouping of consecutive list items into lists.
//!
//! The store delivers list items as independent sibling blocks. Output
//! formats want a list container around each run of same-kind items, so
//! sibling runs pass through a run-length grouping step before rendering.
//!
//! # The Rule
//!
//! A block joins the open group iff the group is non-empty, the block is a
//! list item, and its list kind equals the group's. Anything else closes the
//! open group (emitting it) and then either opens a new group (a list item
//! of the other kind) or is emitted on its own. Whatever is open at the end
//! of the run is emitted last.
//!
//! ```text
//! paragraph, numbered, numbered, bulleted, paragraph
//!     → Single(paragraph), List(numbered ×2), List(bulleted ×1), Single(paragraph)
//! ```
//!
//! Runs split only on kind change, and a list occupies the position of its
//! first member, so flattening the output reproduces the input order.
//!
//! The scan is a single forward pass without lookahead; [`BlockGrouper`]
//! exposes it incrementally and [`group_siblings`] as an iterator adapter.

use crate::model::{BlockId, ListKind, ResolvedBlock};
use std::collections::VecDeque;

/// A run of consecutive same-kind list items.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedList<N> {
    pub kind: ListKind,
    pub items: Vec<ResolvedBlock<N>>,
}

impl<N> GroupedList<N> {
    pub fn first_id(&self) -> Option<&BlockId> {
        self.items.first().map(ResolvedBlock::id)
    }
}

/// One unit emitted by the grouper.
#[derive(Debug, Clone, PartialEq)]
pub enum Grouped<N> {
    Single(ResolvedBlock<N>),
    List(GroupedList<N>),
}

impl<N> Grouped<N> {
    /// Identifiers of the original blocks, in order.
    pub fn block_ids(&self) -> Vec<&BlockId> {
        match self {
            Grouped::Single(block) => vec![block.id()],
            Grouped::List(list) => list.items.iter().map(ResolvedBlock::id).collect(),
        }
    }
}

/// Incremental run-length grouper.
#[derive(Debug)]
pub struct BlockGrouper<N> {
    open: Option<GroupedList<N>>,
}

impl<N> Default for BlockGrouper<N> {
    fn default() -> Self {
        Self { open: None }
    }
}

impl<N> BlockGrouper<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next sibling. Returns the units this block closes or
    /// completes, in order (at most two: a closed list, then the block).
    pub fn push(&mut self, block: ResolvedBlock<N>) -> impl Iterator<Item = Grouped<N>> {
        let list_kind = block.kind().list_kind();
        let joins_open = match (&self.open, list_kind) {
            (Some(open), Some(kind)) => open.kind == kind,
            _ => false,
        };

        let mut closed = None;
        let mut standalone = None;
        if joins_open {
            if let Some(open) = self.open.as_mut() {
                open.items.push(block);
            }
        } else {
            closed = self.open.take().map(Grouped::List);
            match list_kind {
                Some(kind) => {
                    self.open = Some(GroupedList {
                        kind,
                        items: vec![block],
                    })
                }
                None => standalone = Some(Grouped::Single(block)),
            }
        }
        closed.into_iter().chain(standalone)
    }

    /// Close the run, emitting any open list.
    pub fn finish(self) -> Option<Grouped<N>> {
        self.open.map(Grouped::List)
    }
}

/// Iterator adapter over [`BlockGrouper`].
pub struct GroupSiblings<I, N> {
    inner: I,
    grouper: Option<BlockGrouper<N>>,
    ready: VecDeque<Grouped<N>>,
}

/// Group a sibling run.
pub fn group_siblings<I, N>(siblings: I) -> GroupSiblings<I::IntoIter, N>
where
    I: IntoIterator<Item = ResolvedBlock<N>>,
{
    GroupSiblings {
        inner: siblings.into_iter(),
        grouper: Some(BlockGrouper::new()),
        ready: VecDeque::new(),
    }
}

impl<I, N> Iterator for GroupSiblings<I, N>
where
    I: Iterator<Item = ResolvedBlock<N>>,
{
    type Item = Grouped<N>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(unit) = self.ready.pop_front() {
                return Some(unit);
            }
            let grouper = self.grouper.as_mut()?;
            match self.inner.next() {
                Some(block) => self.ready.extend(grouper.push(block)),
                None => return self.grouper.take().and_then(BlockGrouper::finish),
            }
        }
    }
}
