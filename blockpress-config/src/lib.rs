//! Shared configuration loader for blockpress.
//!
//! `defaults/blockpress.default.toml` is embedded into every binary so that
//! docs and runtime behavior stay in sync. Applications layer user-specific
//! files on top of those defaults via [`Loader`] before deserializing into
//! [`BlockpressConfig`].

use blockpress::model::PropertyNames;
use blockpress::{AssetNaming, MirrorOptions, RenderOptions, UnsupportedPolicy};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/blockpress.default.toml");

/// Top-level configuration consumed by blockpress applications.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockpressConfig {
    pub source: SourceConfig,
    pub assets: AssetsConfig,
    pub render: RenderConfig,
    pub properties: PropertiesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub page_size: usize,
}

/// Where mirrored images go and how they are named.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetsConfig {
    pub directory: PathBuf,
    pub public_prefix: String,
    pub naming: NamingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamingConfig {
    Hashed,
    FileName,
}

impl From<NamingConfig> for AssetNaming {
    fn from(naming: NamingConfig) -> Self {
        match naming {
            NamingConfig::Hashed => AssetNaming::Hashed,
            NamingConfig::FileName => AssetNaming::FileName,
        }
    }
}

impl From<&AssetsConfig> for MirrorOptions {
    fn from(config: &AssetsConfig) -> Self {
        MirrorOptions {
            directory: config.directory.clone(),
            public_prefix: config.public_prefix.clone(),
            naming: config.naming.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub unsupported: UnsupportedConfig,
    pub bookmark_previews: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnsupportedConfig {
    Placeholder,
    Skip,
}

impl From<&RenderConfig> for RenderOptions {
    fn from(config: &RenderConfig) -> Self {
        RenderOptions {
            unsupported: match config.unsupported {
                UnsupportedConfig::Placeholder => UnsupportedPolicy::Placeholder,
                UnsupportedConfig::Skip => UnsupportedPolicy::Skip,
            },
            bookmark_previews: config.bookmark_previews,
        }
    }
}

/// Page property names holding document metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct PropertiesConfig {
    pub slug: String,
    pub title: String,
    pub published: String,
}

impl From<&PropertiesConfig> for PropertyNames {
    fn from(config: &PropertiesConfig) -> Self {
        PropertyNames {
            slug: config.slug.clone(),
            title: config.title.clone(),
            published: config.published.clone(),
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<BlockpressConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<BlockpressConfig, ConfigError> {
    Loader::new().build()
}
