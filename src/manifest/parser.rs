//! Parser for the line-oriented `.manifest` files written next to each bundle.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::asset_paths::path_segments;
use crate::config::BundleConfig;

/// Header line opening the asset section.
pub const ASSETS_HEADER: &str = "Assets:";
/// Header line opening the dependency section.
pub const DEPENDENCIES_HEADER: &str = "Dependencies:";

/// How many entry lines are read after each section header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestMode {
  /// Read only the line directly after the header, minus its first two characters.
  Single,
  /// Read every consecutive entry line after the header.
  #[default]
  Multi,
}

/// Errors raised while reading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
  /// The manifest file does not exist.
  #[error("manifest {} not found", .0.display())]
  NotFound(PathBuf),
  /// The manifest exists but could not be read.
  #[error("failed to read manifest {}: {source}", .path.display())]
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
}

/// A dependency entry and the source-tree path it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestDependency {
  /// Entry text with its marker removed.
  pub entry: String,
  /// Entry mapped back into the content tree.
  pub resolved: PathBuf,
}

/// Parsed contents of a bundle manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BundleManifest {
  /// Asset entries listed by the manifest.
  pub assets: Vec<String>,
  /// Dependency entries listed by the manifest.
  pub dependencies: Vec<ManifestDependency>,
}

/// Reads manifests and maps dependency entries back into the content tree.
#[derive(Debug, Clone)]
pub struct ManifestParser {
  mode: ManifestMode,
  content_root: PathBuf,
  output_prefix: String,
}

impl ManifestParser {
  /// Create a parser for manifests written below `output_root` describing `content_root`.
  pub fn new(mode: ManifestMode, content_root: impl Into<PathBuf>, output_root: &str) -> Self {
    // Entries are dotted, so the prefix is compared in the same dotted-then-slashed form.
    let output_prefix = path_segments(&output_root.replace('.', "/")).join("/");
    Self {
      mode,
      content_root: content_root.into(),
      output_prefix,
    }
  }

  /// Parser for the roots and mode of `config`, resolved against `base_dir`.
  pub fn from_config(config: &BundleConfig, base_dir: &Path) -> Self {
    Self::new(
      config.manifest_mode,
      config.content_root_path(base_dir),
      &config.output_root,
    )
  }

  /// Number of leading characters removed from a dependency entry that starts with the output
  /// root.
  pub fn bundle_offset(&self) -> usize {
    if self.output_prefix.is_empty() {
      0
    } else {
      self.output_prefix.len() + 1
    }
  }

  /// Read and parse a manifest file. A missing file is an error.
  pub fn parse_file(&self, path: &Path) -> Result<BundleManifest, ManifestError> {
    let text = match fs::read_to_string(path) {
      Ok(text) => text,
      Err(err) if err.kind() == ErrorKind::NotFound => {
        return Err(ManifestError::NotFound(path.to_path_buf()));
      }
      Err(err) => {
        return Err(ManifestError::Io {
          path: path.to_path_buf(),
          source: err,
        });
      }
    };
    Ok(self.parse_str(&text))
  }

  /// Parse manifest text.
  pub fn parse_str(&self, text: &str) -> BundleManifest {
    let lines: Vec<&str> = text.lines().map(|line| line.trim_end_matches('\r')).collect();

    let assets = self
      .section_entries(&lines, ASSETS_HEADER)
      .into_iter()
      .map(str::to_string)
      .collect();

    let dependencies = self
      .section_entries(&lines, DEPENDENCIES_HEADER)
      .into_iter()
      .map(|entry| ManifestDependency {
        entry: entry.to_string(),
        resolved: self.resolve_dependency(entry),
      })
      .collect();

    BundleManifest {
      assets,
      dependencies,
    }
  }

  /// Map a dependency entry into the content tree.
  pub fn resolve_dependency(&self, entry: &str) -> PathBuf {
    let slashed = entry.replace('.', "/");
    let offset = self.bundle_offset();
    let relative = if offset > 0 && self.starts_with_output(&slashed) {
      slashed.get(offset..).unwrap_or_default()
    } else {
      slashed.as_str()
    };

    path_segments(relative)
      .into_iter()
      .fold(self.content_root.clone(), |path, segment| path.join(segment))
  }

  fn starts_with_output(&self, slashed: &str) -> bool {
    slashed
      .strip_prefix(&self.output_prefix)
      .is_some_and(|rest| rest.starts_with('/'))
  }

  fn section_entries<'t>(&self, lines: &[&'t str], header: &str) -> Vec<&'t str> {
    let Some(start) = lines.iter().position(|line| *line == header) else {
      return Vec::new();
    };

    let following = lines[start + 1..].iter().copied();
    match self.mode {
      ManifestMode::Single => following
        .take(1)
        .filter(|line| !is_section_header(line))
        .filter_map(|line| line.get(2..))
        .filter(|entry| !entry.is_empty())
        .collect(),
      ManifestMode::Multi => following.map_while(strip_marker).collect(),
    }
  }
}

fn is_section_header(line: &str) -> bool {
  line.starts_with(ASSETS_HEADER) || line.starts_with(DEPENDENCIES_HEADER)
}

/// Entry text of a marker-prefixed line such as `- path`.
fn strip_marker(line: &str) -> Option<&str> {
  let mut chars = line.chars();
  let marker = chars.next()?;
  if marker.is_alphanumeric() || marker.is_whitespace() || chars.next()? != ' ' {
    return None;
  }
  let entry = chars.as_str();
  (!entry.is_empty()).then_some(entry)
}
