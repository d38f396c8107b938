//! Pure helpers for naming assets and mapping them between variant directories.
//!
//! Nothing in this module touches the filesystem, so the same rules can be checked in unit tests
//! and reused by the classifier, the planners, and the manifest parser.

mod bundle;
mod filters;
mod segments;

pub use bundle::resolve_bundle_label;
pub use filters::is_ignored_file;
pub use segments::{path_segments, relative_segments, relative_slash_path, remap_into_variant};
