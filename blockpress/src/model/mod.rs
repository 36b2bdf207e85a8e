//! Data model for block-tree documents.
//!
//! This module defines the records delivered by the remote block store:
//! typed content blocks, inline rich-text spans and page records. The block
//! set is closed; kinds the store knows but we do not are carried as
//! [`BlockKind::Unsupported`] so renderers can decide how to degrade.

pub mod blocks;
pub mod page;
pub mod rich_text;

pub use blocks::{
    BlockId, BlockKind, BlockRecord, BlockType, BookmarkBlock, ChildPageBlock, CodeBlock,
    ImageBlock, ImageSource, ListKind, TableBlock, TableRowBlock, TextBlock, UnsupportedBlock,
};
pub use page::{PageRecord, PropertyError, PropertyNames};
pub use rich_text::{Annotations, RichText, SpanKind};

/// A block whose children have already been fetched and rendered.
///
/// `children` is `Some` exactly when the record's `has_children` flag was set
/// at resolution time, and then holds the complete child sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBlock<N> {
    pub record: BlockRecord,
    pub children: Option<Vec<N>>,
}

impl<N> ResolvedBlock<N> {
    /// Resolve a leaf block (one without children).
    pub fn leaf(record: BlockRecord) -> Self {
        Self {
            record,
            children: None,
        }
    }

    pub fn with_children(record: BlockRecord, children: Vec<N>) -> Self {
        Self {
            record,
            children: Some(children),
        }
    }

    pub fn id(&self) -> &BlockId {
        &self.record.id
    }

    pub fn kind(&self) -> &BlockKind {
        &self.record.kind
    }

    /// Rendered children, empty for leaf blocks.
    pub fn children(&self) -> &[N] {
        self.children.as_deref().unwrap_or(&[])
    }
}
