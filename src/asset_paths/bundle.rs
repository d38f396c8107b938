use std::path::Path;

use crate::asset_paths::relative_segments;
use crate::models::BundleLabel;
use crate::variants::VariantSet;

/// Compute the bundle name and variant for an asset.
///
/// The directories between the content root and the asset's parent are walked from the
/// shallowest down. The first directory that names a variant ends the walk and becomes the
/// variant; every directory before it joins the bundle name. Both outputs are lower-cased, the
/// match itself is not case-sensitive.
///
/// ```text
/// Globals/Prefabs/x1/Characters/hero.png  ->  ("globals/prefabs", "x1")
/// Globals/Prefabs/hero.png                ->  ("globals/prefabs", "")
/// hero.png                                ->  ("", "")
/// ```
pub fn resolve_bundle_label(root: &Path, asset_path: &Path, variants: &VariantSet) -> BundleLabel {
    let segments = relative_segments(root, asset_path);
    let Some((_, directories)) = segments.split_last() else {
        return BundleLabel::default();
    };

    let mut name_segments = Vec::new();
    let mut variant = String::new();
    for segment in directories {
        if variants.is_variant_folder(segment) {
            variant = segment.to_lowercase();
            break;
        }
        name_segments.push(segment.to_lowercase());
    }

    BundleLabel {
        name: name_segments.join("/"),
        variant,
    }
}
