//! Local mirror of remote image assets.
//!
//! Store-hosted images sit behind expiring URLs, so they are copied into a
//! flat asset directory and referenced from there. The cache is
//! write-once per derived file name: an existing file is returned as-is,
//! without re-fetching or comparing bytes.
//!
//! Naming
//!
//!     - [`AssetNaming::Hashed`] (default): `<12 hex of sha256(host + path)>-<last segment>`.
//!       The query string is ignored so refreshed signatures map to the same
//!       file, and two remote files that share a final segment do not collide.
//!     - [`AssetNaming::FileName`]: the last path segment only. Distinct
//!       assets with the same file name collide; kept for existing layouts.
//!
//! Writes go to a temporary file in the asset directory and are renamed
//! into place, and concurrent mirrors of the same name are serialized, so a
//! reader never observes a partially written asset.

use crate::error::AssetError;
use crate::fetch::Fetch;
use log::{debug, info};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tempfile::NamedTempFile;
use url::Url;

/// How cached file names are derived from remote URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetNaming {
    #[default]
    Hashed,
    FileName,
}

impl AssetNaming {
    /// Derive the cache file name for `url`.
    pub fn file_name(self, url: &Url) -> Result<String, AssetError> {
        let segment = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
            .ok_or_else(|| AssetError::InvalidUrl(url.to_string()))?;
        match self {
            AssetNaming::FileName => Ok(segment.to_string()),
            AssetNaming::Hashed => {
                let mut hasher = Sha256::new();
                hasher.update(url.host_str().unwrap_or_default().as_bytes());
                hasher.update(url.path().as_bytes());
                let digest = format!("{:x}", hasher.finalize());
                Ok(format!("{}-{segment}", &digest[..12]))
            }
        }
    }
}

/// Where mirrored assets live and how they are addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorOptions {
    /// Directory the cached files are written to.
    pub directory: PathBuf,
    /// URL prefix under which `directory` is served.
    pub public_prefix: String,
    pub naming: AssetNaming,
}

impl Default for MirrorOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("public/notion-files"),
            public_prefix: "/notion-files".to_string(),
            naming: AssetNaming::default(),
        }
    }
}

/// A mirrored asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalAsset {
    pub file_name: String,
    /// Location on disk.
    pub path: PathBuf,
    /// Reference to use in rendered output.
    pub public_path: String,
}

/// Handle on the asset cache. Create one per process (or per test) and
/// share it across document builds.
pub struct AssetMirror {
    options: MirrorOptions,
    fetcher: Arc<dyn Fetch>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl AssetMirror {
    pub fn new(options: MirrorOptions, fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            options,
            fetcher,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn options(&self) -> &MirrorOptions {
        &self.options
    }

    /// Ensure a local copy of `remote_url` exists and return its reference.
    pub fn mirror(&self, remote_url: &str) -> Result<LocalAsset, AssetError> {
        let url = Url::parse(remote_url).map_err(|_| AssetError::InvalidUrl(remote_url.into()))?;
        let file_name = self.options.naming.file_name(&url)?;
        let asset = self.local_asset(file_name);

        if asset.path.exists() {
            debug!("Asset cache hit: {}", asset.file_name);
            return Ok(asset);
        }

        let lock = self.lock_for(&asset.file_name);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        // Another build may have written it while we waited.
        if asset.path.exists() {
            debug!("Asset cache hit after wait: {}", asset.file_name);
            return Ok(asset);
        }

        let directory = &self.options.directory;
        fs::create_dir_all(directory).map_err(|source| AssetError::Write {
            path: directory.clone(),
            source,
        })?;
        let bytes = self.fetcher.fetch(&url)?;
        write_atomically(directory, &asset.path, &bytes)?;
        info!(
            "Mirrored {} ({} bytes) to {}",
            url.path(),
            bytes.len(),
            asset.path.display()
        );
        Ok(asset)
    }

    fn local_asset(&self, file_name: String) -> LocalAsset {
        let prefix = self.options.public_prefix.trim_end_matches('/');
        LocalAsset {
            path: self.options.directory.join(&file_name),
            public_path: format!("{prefix}/{file_name}"),
            file_name,
        }
    }

    fn lock_for(&self, file_name: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(file_name.to_string()).or_default().clone()
    }
}

fn write_atomically(directory: &Path, target: &Path, bytes: &[u8]) -> Result<(), AssetError> {
    let write_error = |source| AssetError::Write {
        path: target.to_path_buf(),
        source,
    };
    let mut file = NamedTempFile::new_in(directory).map_err(write_error)?;
    file.write_all(bytes).map_err(write_error)?;
    file.persist(target)
        .map_err(|err| write_error(err.error))?;
    Ok(())
}
