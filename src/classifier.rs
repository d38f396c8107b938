//! Classification of a content tree into bundle labels, fan-out and teardown plans.
//!
//! The classifier only reads the filesystem. Every plan it returns is a description of work; the
//! [`crate::builder::VariantPipeline`] is the part that carries it out.

use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;
use walkdir::WalkDir;

use crate::asset_paths::{
  is_ignored_file, relative_slash_path, remap_into_variant, resolve_bundle_label,
};
use crate::config::BundleConfig;
use crate::models::{
  AssetRecord, BundleLabel, ClassificationPlan, DirectoryPlanEntry, FanOutAction, FanOutPlan,
  FileCopyOperation, LabelPlan, TeardownPlan,
};
use crate::variants::{VariantSet, VariantSetError};

/// Errors raised while classifying a content tree.
#[derive(Debug, Error)]
pub enum ClassifierError {
  /// The content root does not exist or is not a directory.
  #[error("content root {} not found", .0.display())]
  RootNotFound(PathBuf),
  /// The configured variants are unusable.
  #[error(transparent)]
  Variants(#[from] VariantSetError),
  /// Walking the content tree failed.
  #[error("failed to scan content tree: {0}")]
  Walk(#[from] walkdir::Error),
}

/// Computes bundle labels and variant plans for one content root.
#[derive(Debug, Clone)]
pub struct VariantClassifier {
  root: PathBuf,
  variants: VariantSet,
}

impl VariantClassifier {
  /// Create a classifier, failing immediately when the root directory is missing.
  pub fn new(root: impl Into<PathBuf>, variants: VariantSet) -> Result<Self, ClassifierError> {
    let root = root.into();
    if !root.is_dir() {
      return Err(ClassifierError::RootNotFound(root));
    }
    Ok(Self { root, variants })
  }

  /// Create a classifier for the content root of `config`, resolved against `base_dir`.
  pub fn from_config(config: &BundleConfig, base_dir: &Path) -> Result<Self, ClassifierError> {
    let variants = config.variant_set()?;
    Self::new(config.content_root_path(base_dir), variants)
  }

  /// Content root being classified.
  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Variant descriptors used for matching.
  pub fn variants(&self) -> &VariantSet {
    &self.variants
  }

  /// Bundle label for a single asset path.
  pub fn resolve(&self, asset_path: &Path) -> BundleLabel {
    resolve_bundle_label(&self.root, asset_path, &self.variants)
  }

  /// Every variant directory under the root.
  ///
  /// Only the shallowest variant directory on any branch is reported: a variant-named folder
  /// inside another variant folder is ordinary content of the outer one.
  pub fn variant_directories(&self) -> Result<Vec<PathBuf>, ClassifierError> {
    let mut found = Vec::new();
    let mut walker = WalkDir::new(&self.root)
      .min_depth(1)
      .sort_by_file_name()
      .into_iter();

    while let Some(entry) = walker.next() {
      let entry = entry?;
      if !entry.file_type().is_dir() {
        continue;
      }

      let is_variant = self
        .variants
        .is_variant_folder(&entry.file_name().to_string_lossy());
      if is_variant {
        found.push(entry.into_path());
        walker.skip_current_dir();
      }
    }

    Ok(found)
  }

  /// Label every non-ignored file currently under the root.
  pub fn label_plan(&self) -> Result<LabelPlan, ClassifierError> {
    let records = list_files(&self.root)?
      .into_iter()
      .map(|path| {
        let label = self.resolve(&path);
        AssetRecord {
          relative_path: relative_slash_path(&self.root, &path),
          absolute_path: path,
          bundle_name: label.name,
          bundle_variant: label.variant,
        }
      })
      .collect();

    Ok(LabelPlan { records })
  }

  /// Plan the clones of every default variant directory into its sibling variants.
  ///
  /// For each target directory the create actions come before any copy into it. Copies whose
  /// target already exists are reported as skipped, so planning an already cloned tree yields no
  /// copies at all.
  pub fn fan_out_plan(&self) -> Result<FanOutPlan, ClassifierError> {
    let mut plan = FanOutPlan::default();

    for source in self.variant_directories()? {
      let is_default = source
        .file_name()
        .is_some_and(|name| self.variants.is_default_folder(&name.to_string_lossy()));
      if !is_default {
        continue;
      }
      let Some(parent) = source.parent() else {
        continue;
      };

      let nested_dirs = list_directories(&source)?;
      let files = list_files(&source)?;

      for variant in self.variants.derived() {
        let target = parent.join(&variant.name);
        debug!("planning {} -> {}", source.display(), target.display());

        plan.entries.push(DirectoryPlanEntry {
          source_directory: source.clone(),
          target_directory: target.clone(),
          variant: variant.clone(),
        });

        if !target.is_dir() {
          plan.actions.push(FanOutAction::CreateDirectory {
            path: target.clone(),
          });
        }
        for dir in &nested_dirs {
          let target_dir = remap_into_variant(&source, &target, dir);
          if !target_dir.is_dir() {
            plan
              .actions
              .push(FanOutAction::CreateDirectory { path: target_dir });
          }
        }

        for file in &files {
          let operation = FileCopyOperation {
            source_path: file.clone(),
            target_path: remap_into_variant(&source, &target, file),
            variant: variant.clone(),
          };
          if operation.target_path.exists() {
            plan.skipped.push(operation);
          } else {
            plan.actions.push(FanOutAction::CopyFile(operation));
          }
        }
      }
    }

    Ok(plan)
  }

  /// Plan the removal of every derived variant directory.
  pub fn teardown_plan(&self) -> Result<TeardownPlan, ClassifierError> {
    let directories = self
      .variant_directories()?
      .into_iter()
      .filter(|dir| {
        dir
          .file_name()
          .is_some_and(|name| !self.variants.is_default_folder(&name.to_string_lossy()))
      })
      .filter(|dir| dir.is_dir())
      .collect();

    Ok(TeardownPlan { directories })
  }

  /// Fan-out and label plans for the tree as it currently exists.
  pub fn plan(&self) -> Result<ClassificationPlan, ClassifierError> {
    Ok(ClassificationPlan {
      fan_out: self.fan_out_plan()?,
      labels: self.label_plan()?,
    })
  }
}

/// Non-ignored files below `dir`, sorted by path.
fn list_files(dir: &Path) -> Result<Vec<PathBuf>, walkdir::Error> {
  let mut files = Vec::new();
  for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
    let entry = entry?;
    if entry.file_type().is_file() && !is_ignored_file(&entry.file_name().to_string_lossy()) {
      files.push(entry.into_path());
    }
  }
  Ok(files)
}

/// Directories below `dir`, parents before children.
fn list_directories(dir: &Path) -> Result<Vec<PathBuf>, walkdir::Error> {
  let mut dirs = Vec::new();
  for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
    let entry = entry?;
    if entry.file_type().is_dir() {
      dirs.push(entry.into_path());
    }
  }
  Ok(dirs)
}
