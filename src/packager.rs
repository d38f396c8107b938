//! Packager collaborator: turns labelled assets into bundle outputs.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use crate::manifest::render_manifest;
use crate::models::{BundleLabel, LabelPlan};

/// Builds bundles for a labelled content tree.
pub trait Packager {
  /// Build every bundle described by `labels` into `output_dir` for `target`.
  ///
  /// Returns the companion manifest files that were written.
  fn build(&mut self, output_dir: &Path, target: &str, labels: &LabelPlan) -> Result<Vec<PathBuf>>;
}

/// File name of the manifest describing a bundle.
pub fn manifest_file_name(label: &BundleLabel) -> String {
  if label.variant.is_empty() {
    format!("{}.manifest", label.name)
  } else {
    format!("{}.{}.manifest", label.name, label.variant)
  }
}

/// Packager that writes only the text manifests, one per bundle and variant.
///
/// Output lands in `<output_dir>/<target>/`; nested bundle names become nested directories.
/// Assets without a bundle name are not packaged.
#[derive(Debug, Default)]
pub struct ManifestPackager;

impl ManifestPackager {
  /// Create a packager.
  pub fn new() -> Self {
    Self
  }
}

impl Packager for ManifestPackager {
  fn build(&mut self, output_dir: &Path, target: &str, labels: &LabelPlan) -> Result<Vec<PathBuf>> {
    let mut bundles: BTreeMap<BundleLabel, Vec<&str>> = BTreeMap::new();
    for record in &labels.records {
      if record.bundle_name.is_empty() {
        continue;
      }
      bundles
        .entry(record.label())
        .or_default()
        .push(record.relative_path.as_str());
    }

    let target_dir = output_dir.join(target);
    let mut written = Vec::with_capacity(bundles.len());
    for (label, mut assets) in bundles {
      assets.sort_unstable();
      let path = target_dir.join(manifest_file_name(&label));
      if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
          .with_context(|| format!("failed to create {}", parent.display()))?;
      }

      let text = render_manifest(&assets, std::iter::empty::<&str>());
      fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))?;
      written.push(path);
    }

    info!(
      "wrote {} bundle manifests for {} into {}",
      written.len(),
      target,
      target_dir.display()
    );
    Ok(written)
  }
}
