//! Importer collaborator: persists bundle labels and texture import settings.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use same_file::is_same_file;
use serde::{Deserialize, Serialize};

use crate::models::BundleLabel;
use crate::texture::TextureSettings;

/// Host-side operations the pipeline needs for each asset.
pub trait Importer {
  /// Persist the bundle label of an asset.
  fn set_label(&mut self, asset: &Path, label: &BundleLabel) -> Result<()>;

  /// Check whether `source` may be copied to `target`.
  ///
  /// Returns a human readable reason when the copy is not allowed.
  fn validate_copy(&self, source: &Path, target: &Path) -> Option<String>;

  /// Copy an asset. Callers validate the copy first.
  fn copy_asset(&mut self, source: &Path, target: &Path) -> Result<()>;

  /// Change the import settings of a texture asset.
  fn set_texture_settings(&mut self, asset: &Path, settings: TextureSettings) -> Result<()>;

  /// Width and height of a texture asset, `None` for anything that is not a texture.
  fn texture_dimensions(&self, asset: &Path) -> Option<(u32, u32)>;
}

/// Texture import settings stored in a sidecar file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureImporterMeta {
  /// Largest side of the imported texture.
  pub max_texture_size: u32,
  /// Whether mip maps are generated.
  pub mipmap_enabled: bool,
}

/// Contents of an asset's `.meta` sidecar.
///
/// Keys written by other tools are kept in `extra` and written back untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssetMeta {
  /// Bundle the asset is packaged into.
  pub asset_bundle_name: String,
  /// Variant of that bundle.
  pub asset_bundle_variant: String,
  /// Texture import settings, present only for textures.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub texture_importer: Option<TextureImporterMeta>,
  /// Every other key found in the sidecar.
  #[serde(flatten)]
  pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Path of the sidecar file describing `asset`.
pub fn meta_path(asset: &Path) -> PathBuf {
  let mut name = OsString::from(asset.as_os_str());
  name.push(".meta");
  PathBuf::from(name)
}

/// Importer that works directly on the filesystem and keeps its state in YAML sidecars.
///
/// Sidecars are named `<asset>.meta` and are therefore never picked up as content.
#[derive(Debug, Default)]
pub struct FsImporter;

impl FsImporter {
  /// Create an importer.
  pub fn new() -> Self {
    Self
  }

  /// Read the sidecar of `asset`, returning defaults when it does not exist yet.
  pub fn read_meta(&self, asset: &Path) -> Result<AssetMeta> {
    let path = meta_path(asset);
    if !path.exists() {
      return Ok(AssetMeta::default());
    }
    let text =
      fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
  }

  fn update_meta(&self, asset: &Path, update: impl FnOnce(&mut AssetMeta)) -> Result<()> {
    let mut meta = self.read_meta(asset)?;
    update(&mut meta);

    let path = meta_path(asset);
    let text = serde_yaml::to_string(&meta)
      .with_context(|| format!("failed to serialise {}", path.display()))?;
    fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))
  }
}

impl Importer for FsImporter {
  fn set_label(&mut self, asset: &Path, label: &BundleLabel) -> Result<()> {
    debug!(
      "labelling {} as {}.{}",
      asset.display(),
      label.name,
      label.variant
    );
    self.update_meta(asset, |meta| {
      meta.asset_bundle_name = label.name.clone();
      meta.asset_bundle_variant = label.variant.clone();
    })
  }

  fn validate_copy(&self, source: &Path, target: &Path) -> Option<String> {
    if !source.is_file() {
      return Some(format!("source {} is not a file", source.display()));
    }
    if target.exists() {
      if is_same_file(source, target).unwrap_or(false) {
        return Some(format!("{} is the source file", target.display()));
      }
      return Some(format!("destination {} already exists", target.display()));
    }
    match target.parent() {
      Some(parent) if parent.is_dir() => None,
      _ => Some(format!(
        "destination directory for {} does not exist",
        target.display()
      )),
    }
  }

  fn copy_asset(&mut self, source: &Path, target: &Path) -> Result<()> {
    fs::copy(source, target)
      .map(|_| ())
      .with_context(|| format!("failed to copy {} to {}", source.display(), target.display()))
  }

  fn set_texture_settings(&mut self, asset: &Path, settings: TextureSettings) -> Result<()> {
    self.update_meta(asset, |meta| {
      meta.texture_importer = Some(TextureImporterMeta {
        max_texture_size: settings.max_dimension,
        mipmap_enabled: settings.mip_maps,
      });
    })
  }

  fn texture_dimensions(&self, asset: &Path) -> Option<(u32, u32)> {
    image::image_dimensions(asset).ok()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn meta_path_appends_extension() {
    assert_eq!(
      meta_path(Path::new("Globals/x1/hero.png")),
      PathBuf::from("Globals/x1/hero.png.meta")
    );
  }

  #[test]
  fn labels_round_trip_through_sidecar() -> Result<()> {
    let temp = tempdir()?;
    let asset = temp.path().join("hero.png");
    fs::write(&asset, b"png")?;

    let mut importer = FsImporter::new();
    importer.set_label(&asset, &BundleLabel {
      name: "globals".into(),
      variant: "x1".into(),
    })?;
    importer.set_texture_settings(&asset, TextureSettings {
      max_dimension: 256,
      mip_maps: false,
    })?;

    let meta = importer.read_meta(&asset)?;
    assert_eq!(meta.asset_bundle_name, "globals");
    assert_eq!(meta.asset_bundle_variant, "x1");
    assert_eq!(
      meta.texture_importer,
      Some(TextureImporterMeta {
        max_texture_size: 256,
        mipmap_enabled: false
      })
    );
    Ok(())
  }

  #[test]
  fn foreign_sidecar_keys_survive_updates() -> Result<()> {
    let temp = tempdir()?;
    let asset = temp.path().join("hero.png");
    fs::write(&asset, b"png")?;
    fs::write(meta_path(&asset), "fileFormatVersion: 2\nguid: 0123abcd\n")?;

    let mut importer = FsImporter::new();
    importer.set_label(&asset, &BundleLabel {
      name: "globals".into(),
      variant: "x2".into(),
    })?;

    let meta = importer.read_meta(&asset)?;
    assert_eq!(meta.asset_bundle_variant, "x2");
    assert_eq!(meta.extra["guid"].as_str(), Some("0123abcd"));
    assert_eq!(meta.extra["fileFormatVersion"].as_u64(), Some(2));

    let text = fs::read_to_string(meta_path(&asset))?;
    assert!(text.contains("0123abcd"));
    Ok(())
  }

  #[test]
  fn validate_copy_rejects_existing_targets() -> Result<()> {
    let temp = tempdir()?;
    let source = temp.path().join("a.txt");
    let target = temp.path().join("b.txt");
    fs::write(&source, b"a")?;

    let importer = FsImporter::new();
    assert_eq!(importer.validate_copy(&source, &target), None);
    assert!(importer.validate_copy(&source, &source).is_some());

    fs::write(&target, b"b")?;
    let reason = importer.validate_copy(&source, &target).unwrap();
    assert!(reason.contains("already exists"));
    Ok(())
  }

  #[test]
  fn validate_copy_requires_target_directory() -> Result<()> {
    let temp = tempdir()?;
    let source = temp.path().join("a.txt");
    fs::write(&source, b"a")?;

    let importer = FsImporter::new();
    assert!(
      importer
        .validate_copy(&source, &temp.path().join("missing/a.txt"))
        .is_some()
    );
    assert!(
      importer
        .validate_copy(&temp.path().join("nope.txt"), &temp.path().join("b.txt"))
        .is_some()
    );
    Ok(())
  }

  #[test]
  fn reads_texture_dimensions() -> Result<()> {
    let temp = tempdir()?;
    let texture = temp.path().join("hero.png");
    image::RgbaImage::new(64, 128).save(&texture)?;
    let text = temp.path().join("notes.txt");
    fs::write(&text, b"not an image")?;

    let importer = FsImporter::new();
    assert_eq!(importer.texture_dimensions(&texture), Some((64, 128)));
    assert_eq!(importer.texture_dimensions(&text), None);

    for name in ["hero.tga", "hero.bmp", "hero.tif"] {
      let path = temp.path().join(name);
      image::RgbaImage::new(48, 96).save(&path)?;
      assert_eq!(importer.texture_dimensions(&path), Some((48, 96)), "{name}");
    }
    Ok(())
  }
}
