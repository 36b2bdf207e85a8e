//! Byte transport used by the asset mirror and link previews.
//!
//! The library ships no network client. Callers plug one in through
//! [`Fetch`]; [`LocalFetcher`] maps `http(s)` URLs onto a local mirror tree
//! so exports can be rendered offline. `file://` URLs are refused unless a
//! file root is configured, and then only resolve to files inside it.

use crate::error::AssetError;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, AssetError>;
}

impl<F: Fetch + ?Sized> Fetch for std::sync::Arc<F> {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, AssetError> {
        (**self).fetch(url)
    }
}

/// Fetches from the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct LocalFetcher {
    mirror_root: Option<PathBuf>,
    file_root: Option<PathBuf>,
}

impl LocalFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `http(s)://host/path` from `<root>/host/path`.
    pub fn with_mirror_root(mut self, root: impl AsRef<Path>) -> Self {
        self.mirror_root = Some(root.as_ref().to_path_buf());
        self
    }

    /// Allow `file://` URLs that resolve inside `root`.
    pub fn with_file_root(mut self, root: impl AsRef<Path>) -> Self {
        self.file_root = Some(root.as_ref().to_path_buf());
        self
    }

    fn local_path(&self, url: &Url) -> Result<PathBuf, AssetError> {
        let unsupported = |reason: &str| AssetError::Fetch {
            url: url.to_string(),
            reason: reason.to_string(),
        };
        match url.scheme() {
            "file" => {
                let root = self
                    .file_root
                    .as_ref()
                    .ok_or_else(|| unsupported("file URLs are not enabled"))?;
                let path = url
                    .to_file_path()
                    .map_err(|_| unsupported("not a local file path"))?;
                let (Ok(root), Ok(path)) = (root.canonicalize(), path.canonicalize()) else {
                    return Err(unsupported("file does not exist"));
                };
                if !path.starts_with(&root) {
                    return Err(unsupported("file is outside the allowed root"));
                }
                Ok(path)
            }
            "http" | "https" => {
                let root = self
                    .mirror_root
                    .as_ref()
                    .ok_or_else(|| unsupported("no mirror root configured for remote URLs"))?;
                let host = url.host_str().ok_or_else(|| unsupported("URL has no host"))?;
                let mut path = root.join(host);
                for segment in url.path_segments().into_iter().flatten() {
                    if segment.is_empty() || segment == "." || segment == ".." {
                        continue;
                    }
                    path.push(segment);
                }
                Ok(path)
            }
            other => Err(unsupported(&format!("unsupported scheme '{other}'"))),
        }
    }
}

impl Fetch for LocalFetcher {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, AssetError> {
        let path = self.local_path(url)?;
        fs::read(&path).map_err(|err| AssetError::Fetch {
            url: url.to_string(),
            reason: format!("{}: {err}", path.display()),
        })
    }
}
