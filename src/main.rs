use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use variant_bundler::{
  BundleConfig, FsImporter, ManifestPackager, ManifestParser, VariantClassifier, VariantPipeline,
};

#[derive(Debug, Parser)]
#[command(name = "variant-bundler", version, about)]
struct Cli {
  /// Configuration file. Searched for in the project directory when omitted.
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,
  /// Project directory searched for a configuration when `--config` is omitted.
  #[arg(short, long, global = true, default_value = ".")]
  project: PathBuf,
  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// Print the fan-out and label plans as JSON without touching the tree.
  Plan,
  /// Print the bundle label of every asset as JSON.
  Labels,
  /// Clone the default variant directories into every other variant.
  CreateVariants,
  /// Write bundle labels for every asset.
  SetLabels,
  /// Build bundles into the output root.
  Build {
    /// Platform to build for, overriding the configured one.
    #[arg(short, long)]
    target: Option<String>,
  },
  /// Delete every derived variant directory.
  DeleteVariants,
  /// Create variants, label, build and delete variants in one go.
  RunAll {
    /// Platform to build for, overriding the configured one.
    #[arg(short, long)]
    target: Option<String>,
  },
  /// Parse a bundle manifest and print it as JSON.
  Manifest {
    /// Manifest file to read.
    path: PathBuf,
  },
}

fn main() -> Result<()> {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
  let cli = Cli::parse();

  let Some((config, base_dir)) = BundleConfig::resolve(&cli.project, cli.config.as_deref())
    .context("failed to load configuration")?
  else {
    return Ok(());
  };

  let base_dir = base_dir.as_path();
  if let Command::Manifest { path } = &cli.command {
    let manifest = ManifestParser::from_config(&config, base_dir).parse_file(path)?;
    return print_json(&manifest);
  }

  let classifier = VariantClassifier::from_config(&config, base_dir)?;
  match cli.command {
    Command::Plan => print_json(&classifier.plan()?),
    Command::Labels => print_json(&classifier.label_plan()?),
    command => {
      let mut pipeline = VariantPipeline::new(
        classifier,
        config.output_root_path(base_dir),
        FsImporter::new(),
        ManifestPackager::new(),
      );
      run_phase(&mut pipeline, command, &config)
    }
  }
}

fn run_phase(
  pipeline: &mut VariantPipeline<FsImporter, ManifestPackager>,
  command: Command,
  config: &BundleConfig,
) -> Result<()> {
  let target_or_default = |target: Option<String>| target.unwrap_or_else(|| config.build_target.clone());

  match command {
    Command::CreateVariants => print_json(&pipeline.create_variants()?),
    Command::SetLabels => print_json(&pipeline.set_labels()?),
    Command::Build { target } => print_json(&pipeline.build_bundles(&target_or_default(target))?),
    Command::DeleteVariants => print_json(&pipeline.delete_variants()?),
    Command::RunAll { target } => print_json(&pipeline.run_all(&target_or_default(target))?),
    Command::Plan | Command::Labels | Command::Manifest { .. } => Ok(()),
  }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}
