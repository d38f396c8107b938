//! Bundle manifest reading and writing, split so the text format can be tested on its own.

mod parser;
mod render;

pub use parser::{
  ASSETS_HEADER, BundleManifest, DEPENDENCIES_HEADER, ManifestDependency, ManifestError,
  ManifestMode, ManifestParser,
};
pub use render::render_manifest;
