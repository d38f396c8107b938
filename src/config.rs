//! Project configuration loader describing the content tree and its variants.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::Deserialize;
use thiserror::Error;

use crate::manifest::ManifestMode;
use crate::models::VariantDescriptor;
use crate::variants::{VariantSet, VariantSetError};

/// Configuration file names searched for, in order, by [`BundleConfig::discover`].
pub const CONFIG_FILE_NAMES: &[&str] = &[
  "variants.config.json",
  "variants.config.yaml",
  "variants.config.yml",
];

/// Errors that can occur while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// Failed to read the configuration file from disk.
  #[error("failed to read {}: {source}", .path.display())]
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// Failed to parse a JSON configuration file.
  #[error("failed to parse {}: {source}", .path.display())]
  Json {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_json::Error,
  },
  /// Failed to parse a YAML configuration file.
  #[error("failed to parse {}: {source}", .path.display())]
  Yaml {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_yaml::Error,
  },
}

/// Content tree layout and variant definitions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BundleConfig {
  /// Directory holding the assets to bundle.
  pub content_root: String,
  /// Directory that receives built bundles and their manifests.
  pub output_root: String,
  /// Folder name of the canonical, full-quality variant.
  pub default_variant: String,
  /// Variant folders and the import settings applied to their clones.
  pub variants: Vec<VariantDescriptor>,
  /// How many entries the manifest parser reads per section.
  pub manifest_mode: ManifestMode,
  /// Platform name handed to the packager.
  pub build_target: String,
}

impl Default for BundleConfig {
  fn default() -> Self {
    Self {
      content_root: String::new(),
      output_root: String::new(),
      default_variant: String::new(),
      variants: Vec::new(),
      manifest_mode: ManifestMode::default(),
      build_target: "standalone".into(),
    }
  }
}

impl BundleConfig {
  /// Look for a configuration file in `dir`.
  ///
  /// Returns `Ok(None)` when no candidate file exists so that callers can treat an unconfigured
  /// project as a no-op.
  pub fn discover(dir: &Path) -> Result<Option<Self>, ConfigError> {
    for name in CONFIG_FILE_NAMES {
      let candidate = dir.join(name);
      if candidate.is_file() {
        return Self::load(&candidate).map(Some);
      }
    }
    Ok(None)
  }

  /// Read configuration from a specific file, choosing the format from its extension.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;

    let is_yaml = path
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
      serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
      })
    } else {
      serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
      })
    }
  }

  /// Read configuration from `path` along with the directory holding it, which relative roots
  /// are resolved against.
  pub fn load_with_base(path: &Path) -> Result<(Self, PathBuf), ConfigError> {
    let config = Self::load(path)?;
    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok((config, base_dir))
  }

  /// Configuration for a pipeline run and its base directory.
  ///
  /// `explicit` is loaded when given, otherwise `project` is searched. Returns `Ok(None)`, after
  /// logging a warning, when nothing is found or no content root is set; such projects are left
  /// alone.
  pub fn resolve(
    project: &Path,
    explicit: Option<&Path>,
  ) -> Result<Option<(Self, PathBuf)>, ConfigError> {
    let found = match explicit {
      Some(path) => Some(Self::load_with_base(path)?),
      None => Self::discover(project)?.map(|config| (config, project.to_path_buf())),
    };

    match found {
      None => {
        warn!("no configuration found in {}, nothing to do", project.display());
        Ok(None)
      }
      Some((config, _)) if !config.is_configured() => {
        warn!("no content root configured, nothing to do");
        Ok(None)
      }
      found => Ok(found),
    }
  }

  /// Whether a content root has been configured at all.
  pub fn is_configured(&self) -> bool {
    !self.content_root.trim().is_empty()
  }

  /// Build the variant set described by this configuration.
  pub fn variant_set(&self) -> Result<VariantSet, VariantSetError> {
    VariantSet::from_config(&self.default_variant, &self.variants)
  }

  /// Content root resolved against the directory holding the configuration.
  pub fn content_root_path(&self, base_dir: &Path) -> PathBuf {
    base_dir.join(&self.content_root)
  }

  /// Output root resolved against the directory holding the configuration.
  ///
  /// Returns `None` when no output root is configured.
  pub fn output_root_path(&self, base_dir: &Path) -> Option<PathBuf> {
    let trimmed = self.output_root.trim();
    (!trimmed.is_empty()).then(|| base_dir.join(trimmed))
  }
}
