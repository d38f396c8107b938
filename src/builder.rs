//! Variant pipeline orchestrating fan-out, labelling, packaging and teardown.
//!
//! Every phase runs synchronously to completion. The content tree is modified in place, so two
//! pipelines must never run against the same tree at the same time.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;

use crate::classifier::VariantClassifier;
use crate::importer::Importer;
use crate::models::{FanOutAction, FileCopyOperation};
use crate::packager::Packager;
use crate::texture::TextureSettings;

/// Outcome of applying a fan-out plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FanOutReport {
  /// Directories created.
  pub directories_created: usize,
  /// Files cloned into variant directories.
  pub copied: usize,
  /// Copies left out at planning time because the target already existed.
  pub skipped: usize,
  /// Copies refused or failed at apply time.
  pub rejected: usize,
}

/// Outcome of a full create, label, build and delete cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
  /// Result of the fan-out phase.
  pub fan_out: FanOutReport,
  /// Number of labelled assets.
  pub labelled: usize,
  /// Manifests written by the packager.
  pub manifests: Vec<PathBuf>,
  /// Variant directories removed afterwards.
  pub deleted: usize,
}

/// High-level helper running the variant phases against one content tree.
pub struct VariantPipeline<I, P> {
  classifier: VariantClassifier,
  output_root: Option<PathBuf>,
  importer: I,
  packager: P,
}

impl<I: Importer, P: Packager> VariantPipeline<I, P> {
  /// Create a pipeline. Without an output root the build phase does nothing.
  pub fn new(
    classifier: VariantClassifier,
    output_root: Option<PathBuf>,
    importer: I,
    packager: P,
  ) -> Self {
    Self {
      classifier,
      output_root,
      importer,
      packager,
    }
  }

  /// Classifier driving the pipeline.
  pub fn classifier(&self) -> &VariantClassifier {
    &self.classifier
  }

  /// Importer receiving labels and import settings.
  pub fn importer(&self) -> &I {
    &self.importer
  }

  /// Clone every default variant directory into its derived variants.
  pub fn create_variants(&mut self) -> Result<FanOutReport> {
    let plan = self.classifier.fan_out_plan()?;
    let mut report = FanOutReport {
      skipped: plan.skipped.len(),
      ..FanOutReport::default()
    };

    for action in &plan.actions {
      match action {
        FanOutAction::CreateDirectory { path } => {
          fs::create_dir_all(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
          report.directories_created += 1;
        }
        FanOutAction::CopyFile(operation) => {
          if self.apply_copy(operation)? {
            report.copied += 1;
          } else {
            report.rejected += 1;
          }
        }
      }
    }

    info!(
      "asset variants created: {} directories, {} copies, {} skipped, {} rejected",
      report.directories_created, report.copied, report.skipped, report.rejected
    );
    Ok(report)
  }

  fn apply_copy(&mut self, operation: &FileCopyOperation) -> Result<bool> {
    let FileCopyOperation {
      source_path,
      target_path,
      variant,
    } = operation;

    if let Some(reason) = self.importer.validate_copy(source_path, target_path) {
      warn!("skipping {}: {reason}", source_path.display());
      return Ok(false);
    }
    if let Err(err) = self.importer.copy_asset(source_path, target_path) {
      warn!("skipping {}: {err:#}", source_path.display());
      return Ok(false);
    }

    if let Some(dimensions) = self.importer.texture_dimensions(source_path) {
      let settings = TextureSettings::for_variant(variant, dimensions);
      self.importer.set_texture_settings(target_path, settings)?;
    }
    Ok(true)
  }

  /// Persist bundle labels for every asset currently in the tree.
  pub fn set_labels(&mut self) -> Result<usize> {
    let plan = self.classifier.label_plan()?;
    for record in &plan.records {
      self.importer.set_label(&record.absolute_path, &record.label())?;
    }

    info!("asset bundle labels set on {} assets", plan.records.len());
    Ok(plan.records.len())
  }

  /// Build the labelled bundles into the output root.
  pub fn build_bundles(&mut self, target: &str) -> Result<Vec<PathBuf>> {
    let Some(output_root) = &self.output_root else {
      warn!("no output root configured, skipping bundle build");
      return Ok(Vec::new());
    };

    if !output_root.exists() {
      fs::create_dir_all(output_root)
        .with_context(|| format!("failed to create {}", output_root.display()))?;
    }

    let labels = self.classifier.label_plan()?;
    let manifests = self.packager.build(output_root, target, &labels)?;
    info!("asset bundles built for {target}");
    Ok(manifests)
  }

  /// Remove every derived variant directory.
  pub fn delete_variants(&mut self) -> Result<usize> {
    let plan = self.classifier.teardown_plan()?;
    for dir in &plan.directories {
      fs::remove_dir_all(dir).with_context(|| format!("failed to delete {}", dir.display()))?;
    }

    info!("asset variants deleted: {}", plan.directories.len());
    Ok(plan.directories.len())
  }

  /// Create variants, label, build, then delete the variants again.
  ///
  /// A failing phase stops the run; the derived directories are left in place so the run can be
  /// repeated once the cause is fixed.
  pub fn run_all(&mut self, target: &str) -> Result<PipelineReport> {
    let fan_out = self.create_variants()?;
    let labelled = self.set_labels()?;
    let manifests = self.build_bundles(target)?;
    let deleted = self.delete_variants()?;

    Ok(PipelineReport {
      fan_out,
      labelled,
      manifests,
      deleted,
    })
  }
}
