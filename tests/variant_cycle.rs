use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;
use variant_bundler::importer::meta_path;
use variant_bundler::models::{FanOutPlan, TextureScale, VariantDescriptor};
use variant_bundler::{
  BundleConfig, FsImporter, ManifestPackager, VariantClassifier, VariantPipeline, VariantSet,
};

fn variants() -> VariantSet {
  VariantSet::from_config(
    "x1",
    &[
      VariantDescriptor::new("x1", TextureScale::Full, true),
      VariantDescriptor::new("x2", TextureScale::Half, false),
    ],
  )
  .unwrap()
}

fn content_tree(root: &Path) -> anyhow::Result<()> {
  fs::create_dir_all(root.join("Globals/x1/Characters"))?;
  image::RgbaImage::new(512, 1024).save(root.join("Globals/x1/Characters/hero.png"))?;
  fs::write(root.join("Globals/x1/Characters/hero.png.meta"), b"assetBundleName: ''\n")?;
  fs::write(root.join("Globals/x1/.DS_Store"), b"")?;
  fs::create_dir_all(root.join("Levels/Forest/x1"))?;
  fs::write(root.join("Levels/Forest/x1/map.json"), b"{}")?;
  fs::write(root.join("top.txt"), b"root level")?;
  Ok(())
}

fn copy_set(plan: &FanOutPlan) -> BTreeSet<(PathBuf, PathBuf)> {
  plan
    .copies()
    .map(|op| (op.source_path.clone(), op.target_path.clone()))
    .collect()
}

#[test]
fn hero_texture_scenario() -> anyhow::Result<()> {
  let temp = tempdir()?;
  let root = temp.path().join("AssetsToBundle");
  content_tree(&root)?;

  let classifier = VariantClassifier::new(&root, variants())?;
  let hero = root.join("Globals/x1/Characters/hero.png");
  let label = classifier.resolve(&hero);
  assert_eq!(label.name, "globals");
  assert_eq!(label.variant, "x1");

  let plan = classifier.fan_out_plan()?;
  assert!(
    plan
      .created_directories()
      .any(|dir| dir == &root.join("Globals/x2/Characters"))
  );
  let copy = plan
    .copies()
    .find(|op| op.source_path == hero)
    .expect("hero.png should be cloned");
  assert_eq!(copy.target_path, root.join("Globals/x2/Characters/hero.png"));

  let mut pipeline = VariantPipeline::new(classifier, None, FsImporter::new(), ManifestPackager::new());
  pipeline.create_variants()?;

  let meta = FsImporter::new().read_meta(&copy.target_path)?;
  let texture = meta.texture_importer.expect("clone should carry texture settings");
  assert_eq!(texture.max_texture_size, 512);
  assert!(!texture.mipmap_enabled);
  Ok(())
}

#[test]
fn fan_out_is_idempotent() -> anyhow::Result<()> {
  let temp = tempdir()?;
  let root = temp.path().join("content");
  content_tree(&root)?;

  let mut pipeline = VariantPipeline::new(
    VariantClassifier::new(&root, variants())?,
    None,
    FsImporter::new(),
    ManifestPackager::new(),
  );
  let first = pipeline.create_variants()?;
  assert_eq!(first.copied, 2);

  let replanned = pipeline.classifier().fan_out_plan()?;
  assert_eq!(replanned.copies().count(), 0);
  assert_eq!(replanned.created_directories().count(), 0);
  assert_eq!(replanned.skipped.len(), 2);

  let second = pipeline.create_variants()?;
  assert_eq!(second.copied, 0);
  assert_eq!(second.skipped, 2);
  Ok(())
}

#[test]
fn teardown_then_fan_out_restores_the_same_plan() -> anyhow::Result<()> {
  let temp = tempdir()?;
  let root = temp.path().join("content");
  content_tree(&root)?;

  let classifier = VariantClassifier::new(&root, variants())?;
  let original = classifier.fan_out_plan()?;

  let mut pipeline = VariantPipeline::new(classifier, None, FsImporter::new(), ManifestPackager::new());
  pipeline.create_variants()?;
  assert_eq!(pipeline.delete_variants()?, 2);

  let restored = pipeline.classifier().fan_out_plan()?;
  assert_eq!(copy_set(&restored), copy_set(&original));
  assert_eq!(
    restored.created_directories().collect::<Vec<_>>(),
    original.created_directories().collect::<Vec<_>>()
  );
  Ok(())
}

#[test]
fn ignored_files_never_appear() -> anyhow::Result<()> {
  let temp = tempdir()?;
  let root = temp.path().join("content");
  content_tree(&root)?;

  let classifier = VariantClassifier::new(&root, variants())?;
  let plan = classifier.plan()?;

  let is_ignored = |path: &Path| {
    let name = path.file_name().unwrap().to_string_lossy();
    name.contains(".meta") || name.contains(".DS_Store")
  };
  assert!(plan.labels.records.iter().all(|r| !is_ignored(&r.absolute_path)));
  assert!(plan.fan_out.copies().all(|op| !is_ignored(&op.source_path)));
  assert_eq!(plan.labels.records.len(), 3);
  Ok(())
}

#[test]
fn root_level_files_have_no_bundle() -> anyhow::Result<()> {
  let temp = tempdir()?;
  let root = temp.path().join("content");
  content_tree(&root)?;

  let classifier = VariantClassifier::new(&root, variants())?;
  let labels = classifier.label_plan()?;
  let top = labels
    .records
    .iter()
    .find(|r| r.relative_path == "top.txt")
    .unwrap();
  assert_eq!(top.bundle_name, "");
  assert_eq!(top.bundle_variant, "");

  let forest = labels
    .records
    .iter()
    .find(|r| r.relative_path == "Levels/Forest/x1/map.json")
    .unwrap();
  assert_eq!(forest.bundle_name, "levels/forest");
  assert_eq!(forest.bundle_variant, "x1");
  Ok(())
}

#[test]
fn full_cycle_from_discovered_config() -> anyhow::Result<()> {
  let temp = tempdir()?;
  let project = temp.path();
  content_tree(&project.join("AssetsToBundle"))?;
  fs::write(
    project.join("variants.config.json"),
    r#"{
      "contentRoot": "AssetsToBundle",
      "outputRoot": "Bundles",
      "defaultVariant": "x1",
      "variants": [{ "name": "x2", "textureScale": "half", "mipMaps": false }]
    }"#,
  )?;

  let config = BundleConfig::discover(project)?.expect("config should be discovered");
  let classifier = VariantClassifier::from_config(&config, project)?;
  let mut pipeline = VariantPipeline::new(
    classifier,
    config.output_root_path(project),
    FsImporter::new(),
    ManifestPackager::new(),
  );
  let report = pipeline.run_all(&config.build_target)?;

  let bundles = project.join("Bundles/standalone");
  assert_eq!(report.manifests, vec![
    bundles.join("globals.x1.manifest"),
    bundles.join("globals.x2.manifest"),
    bundles.join("levels/forest.x1.manifest"),
    bundles.join("levels/forest.x2.manifest"),
  ]);
  assert!(!project.join("AssetsToBundle/Globals/x2").exists());
  assert!(!project.join("AssetsToBundle/Levels/Forest/x2").exists());
  assert!(meta_path(&project.join("AssetsToBundle/top.txt")).exists());
  Ok(())
}

#[test]
fn explicit_config_in_subdirectory_drives_its_own_tree() -> anyhow::Result<()> {
  let temp = tempdir()?;
  let sub = temp.path().join("sub");
  content_tree(&sub.join("AssetsToBundle"))?;
  let config_path = sub.join("variants.config.json");
  fs::write(
    &config_path,
    r#"{
      "contentRoot": "AssetsToBundle",
      "defaultVariant": "x1",
      "variants": [{ "name": "x2", "textureScale": "half" }]
    }"#,
  )?;

  let (config, base_dir) =
    BundleConfig::resolve(temp.path(), Some(config_path.as_path()))?.expect("config should load");
  let classifier = VariantClassifier::from_config(&config, &base_dir)?;
  assert_eq!(classifier.root(), sub.join("AssetsToBundle"));
  assert_eq!(classifier.fan_out_plan()?.copies().count(), 2);
  Ok(())
}
