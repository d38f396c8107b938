//! The ordered set of variant descriptors used to classify a content tree.

use thiserror::Error;

use crate::models::{TextureScale, VariantDescriptor};

/// Errors raised while assembling a [`VariantSet`].
#[derive(Debug, Error)]
pub enum VariantSetError {
  /// No default variant name was configured.
  #[error("no default variant folder configured")]
  MissingDefault,
  /// More than one descriptor claims the default variant name.
  #[error("variant `{0}` is listed more than once")]
  DuplicateDefault(String),
  /// Two derived descriptors name the same folder, ignoring case.
  #[error("variant folder `{0}` is configured more than once")]
  DuplicateVariant(String),
}

/// Variant descriptors with exactly one default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSet {
  descriptors: Vec<VariantDescriptor>,
  default_index: usize,
}

impl VariantSet {
  /// Build a set from the configured default folder name and variant list.
  ///
  /// The entry named after the default folder is flagged as the default. When the list does not
  /// mention the default folder at all a full-resolution, mip-mapped descriptor is prepended.
  pub fn from_config(
    default_variant: &str,
    variants: &[VariantDescriptor],
  ) -> Result<Self, VariantSetError> {
    let default_name = default_variant.trim();
    if default_name.is_empty() {
      return Err(VariantSetError::MissingDefault);
    }

    let mut descriptors: Vec<VariantDescriptor> = variants
      .iter()
      .cloned()
      .map(|mut descriptor| {
        descriptor.is_default = false;
        descriptor
      })
      .collect();

    let matches: Vec<usize> = descriptors
      .iter()
      .enumerate()
      .filter(|(_, descriptor)| descriptor.matches(default_name))
      .map(|(index, _)| index)
      .collect();

    let default_index = match matches.as_slice() {
      [] => {
        descriptors.insert(0, VariantDescriptor::new(default_name, TextureScale::Full, true));
        0
      }
      [index] => *index,
      _ => return Err(VariantSetError::DuplicateDefault(default_name.to_string())),
    };
    descriptors[default_index].is_default = true;

    for (index, descriptor) in descriptors.iter().enumerate() {
      if !descriptor.is_valid() {
        continue;
      }
      if descriptors[..index]
        .iter()
        .any(|earlier| earlier.matches(&descriptor.name))
      {
        return Err(VariantSetError::DuplicateVariant(descriptor.name.clone()));
      }
    }

    Ok(Self {
      descriptors,
      default_index,
    })
  }

  /// The canonical source variant.
  pub fn default_variant(&self) -> &VariantDescriptor {
    &self.descriptors[self.default_index]
  }

  /// Every descriptor in configuration order, default included.
  pub fn iter(&self) -> impl Iterator<Item = &VariantDescriptor> {
    self.descriptors.iter()
  }

  /// Valid descriptors other than the default, in configuration order.
  pub fn derived(&self) -> impl Iterator<Item = &VariantDescriptor> {
    self
      .descriptors
      .iter()
      .filter(|descriptor| !descriptor.is_default && descriptor.is_valid())
  }

  /// Find the descriptor matching a directory segment, if any.
  pub fn find(&self, segment: &str) -> Option<&VariantDescriptor> {
    self.descriptors.iter().find(|descriptor| descriptor.matches(segment))
  }

  /// Whether a directory name is a variant folder.
  pub fn is_variant_folder(&self, segment: &str) -> bool {
    self.find(segment).is_some()
  }

  /// Whether a directory name is the default variant folder.
  pub fn is_default_folder(&self, segment: &str) -> bool {
    self.default_variant().matches(segment)
  }
}
