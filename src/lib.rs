#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod builder;
pub mod classifier;
pub mod config;
pub mod importer;
pub mod manifest;
pub mod models;
pub mod packager;
pub mod texture;
pub mod variants;

pub use builder::{FanOutReport, PipelineReport, VariantPipeline};
pub use classifier::{ClassifierError, VariantClassifier};
pub use config::{BundleConfig, ConfigError};
pub use importer::{FsImporter, Importer};
pub use manifest::{BundleManifest, ManifestError, ManifestMode, ManifestParser};
pub use packager::{ManifestPackager, Packager};
pub use variants::{VariantSet, VariantSetError};
