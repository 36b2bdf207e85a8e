//! Store access backed by an on-disk export snapshot.
//!
//! Layout:
//!
//! ```text
//! <root>/pages.json              array of page objects
//! <root>/blocks/<parent-id>.json array of the parent's child block objects
//! ```
//!
//! A parent without a blocks file has no children. Children are served in
//! pages of `page_size` entries with numeric offset cursors, so traversal
//! exercises the same pagination path as a remote store.

use crate::error::SourceError;
use crate::model::{BlockId, PageRecord};
use crate::source::json::{decode_blocks, decode_pages};
use crate::source::{BlockPage, BlockSource, PageFilter, PageResolver};
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Filesystem-backed [`BlockSource`] and [`PageResolver`].
#[derive(Debug, Clone)]
pub struct ExportSource {
    root: PathBuf,
    page_size: usize,
}

impl ExportSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Set the number of entries served per page (at least one).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The blocks file of `parent`. Ids must be a single plain path segment.
    fn blocks_path(&self, parent: &BlockId) -> Result<PathBuf, SourceError> {
        let id = parent.as_str();
        if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\', '\0']) {
            return Err(SourceError::InvalidId(id.to_string()));
        }
        Ok(self.root.join("blocks").join(format!("{id}.json")))
    }

    fn read(path: &Path) -> Result<Option<String>, SourceError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SourceError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl BlockSource for ExportSource {
    fn list_children(
        &self,
        parent: &BlockId,
        cursor: Option<&str>,
    ) -> Result<BlockPage, SourceError> {
        let offset = match cursor {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|_| SourceError::Transport(format!("invalid cursor '{raw}'")))?,
            None => 0,
        };
        let path = self.blocks_path(parent)?;
        let Some(text) = Self::read(&path)? else {
            debug!("No blocks file for {parent}; treating as empty");
            return Ok(BlockPage::default());
        };
        let mut entries = decode_blocks(&text, &path.display().to_string())?;
        let end = offset.saturating_add(self.page_size).min(entries.len());
        let next_cursor = (end < entries.len()).then(|| end.to_string());
        let results = if offset < entries.len() {
            entries.drain(offset..end).collect()
        } else {
            Vec::new()
        };
        Ok(BlockPage {
            results,
            next_cursor,
        })
    }
}

impl PageResolver for ExportSource {
    fn query_pages(&self, filter: &PageFilter) -> Result<Vec<PageRecord>, SourceError> {
        let path = self.root.join("pages.json");
        let text = Self::read(&path)?.ok_or_else(|| SourceError::Io {
            path: path.clone(),
            source: std::io::Error::new(ErrorKind::NotFound, "pages.json is missing"),
        })?;
        let mut pages: Vec<PageRecord> = decode_pages(&text, &path.display().to_string())?
            .into_iter()
            .filter(|page| filter.matches(page))
            .collect();
        filter.sort_pages(&mut pages);
        Ok(pages)
    }
}
