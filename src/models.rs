//! Data structures produced while classifying and fanning out a content tree.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Texture quality applied to assets cloned into a variant directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureScale {
  /// Keep the source resolution.
  #[default]
  #[serde(alias = "none")]
  Full,
  /// Halve the longest side of the source texture.
  Half,
}

/// A named variant folder and the import settings applied to its clones.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantDescriptor {
  /// Folder name as it appears on disk.
  pub name: String,
  /// Whether this variant is the canonical source tree.
  #[serde(default, skip_deserializing)]
  pub is_default: bool,
  /// Texture scale applied to clones of this variant.
  #[serde(default)]
  pub texture_scale: TextureScale,
  /// Whether cloned textures keep mip maps.
  #[serde(default = "default_mip_maps")]
  pub mip_maps: bool,
}

fn default_mip_maps() -> bool {
  true
}

impl VariantDescriptor {
  /// Create a non-default descriptor.
  pub fn new(name: impl Into<String>, texture_scale: TextureScale, mip_maps: bool) -> Self {
    Self {
      name: name.into(),
      is_default: false,
      texture_scale,
      mip_maps,
    }
  }

  /// A descriptor is only usable when it names a folder.
  pub fn is_valid(&self) -> bool {
    !self.name.is_empty()
  }

  /// Case-insensitive comparison against a directory segment.
  pub fn matches(&self, segment: &str) -> bool {
    self.is_valid() && self.name.eq_ignore_ascii_case(segment)
  }
}

/// Bundle name and variant computed for a single asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BundleLabel {
  /// Lower-cased, slash-joined directories between the root and the variant folder.
  pub name: String,
  /// Lower-cased variant folder name, empty when the asset is not inside one.
  pub variant: String,
}

/// Classification result for one file under the content root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetRecord {
  /// Path of the file on disk.
  pub absolute_path: PathBuf,
  /// Slash-separated path relative to the content root.
  pub relative_path: String,
  /// Bundle name assigned to the file.
  pub bundle_name: String,
  /// Bundle variant assigned to the file.
  pub bundle_variant: String,
}

impl AssetRecord {
  /// Label view of the record.
  pub fn label(&self) -> BundleLabel {
    BundleLabel {
      name: self.bundle_name.clone(),
      variant: self.bundle_variant.clone(),
    }
  }
}

/// Pairing of a default variant directory with one derived variant directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryPlanEntry {
  /// Default variant directory cloned from.
  pub source_directory: PathBuf,
  /// Sibling directory named after the derived variant.
  pub target_directory: PathBuf,
  /// Variant applied to files copied into the target.
  pub variant: VariantDescriptor,
}

/// One file cloned from a default variant directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileCopyOperation {
  /// File inside the default variant directory.
  pub source_path: PathBuf,
  /// Destination inside the derived variant directory.
  pub target_path: PathBuf,
  /// Variant whose import settings apply to the copy.
  pub variant: VariantDescriptor,
}

/// Ordered filesystem action emitted by the fan-out planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum FanOutAction {
  /// Create a missing directory.
  CreateDirectory {
    /// Directory to create.
    path: PathBuf,
  },
  /// Clone a file into a variant directory.
  CopyFile(FileCopyOperation),
}

/// Complete fan-out plan for a content tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FanOutPlan {
  /// Directory pairs discovered while planning.
  pub entries: Vec<DirectoryPlanEntry>,
  /// Actions in execution order; directories always precede copies into them.
  pub actions: Vec<FanOutAction>,
  /// Copies left out because their target already exists.
  pub skipped: Vec<FileCopyOperation>,
}

impl FanOutPlan {
  /// Iterate over the planned copies.
  pub fn copies(&self) -> impl Iterator<Item = &FileCopyOperation> {
    self.actions.iter().filter_map(|action| match action {
      FanOutAction::CopyFile(op) => Some(op),
      FanOutAction::CreateDirectory { .. } => None,
    })
  }

  /// Iterate over the directories that will be created.
  pub fn created_directories(&self) -> impl Iterator<Item = &PathBuf> {
    self.actions.iter().filter_map(|action| match action {
      FanOutAction::CreateDirectory { path } => Some(path),
      FanOutAction::CopyFile(_) => None,
    })
  }
}

/// Variant directories scheduled for recursive deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeardownPlan {
  /// Existing non-default variant directories.
  pub directories: Vec<PathBuf>,
}

/// Labels for every asset under the content root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabelPlan {
  /// One record per non-ignored file.
  pub records: Vec<AssetRecord>,
}

/// Output of a full classification pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationPlan {
  /// Directory and file clones to produce.
  pub fan_out: FanOutPlan,
  /// Labels for the tree as it currently exists.
  pub labels: LabelPlan,
}
