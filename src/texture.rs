//! Import settings derived for textures cloned into a variant directory.

use serde::Serialize;

use crate::models::{TextureScale, VariantDescriptor};

/// Smallest maximum texture size the import pipeline accepts.
pub const MIN_TEXTURE_SIZE: u32 = 32;

/// Maximum texture dimension for a clone of a `width` x `height` texture.
pub fn scaled_max_dimension(width: u32, height: u32, scale: TextureScale) -> u32 {
  let longest = width.max(height);
  match scale {
    TextureScale::Full => longest,
    TextureScale::Half => (longest / 2).max(MIN_TEXTURE_SIZE),
  }
}

/// Import settings applied to a cloned texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextureSettings {
  /// Largest side the imported texture may have.
  pub max_dimension: u32,
  /// Whether mip maps are generated.
  pub mip_maps: bool,
}

impl TextureSettings {
  /// Settings for a texture of the given source dimensions copied into `variant`.
  pub fn for_variant(variant: &VariantDescriptor, (width, height): (u32, u32)) -> Self {
    Self {
      max_dimension: scaled_max_dimension(width, height, variant.texture_scale),
      mip_maps: variant.mip_maps,
    }
  }
}
