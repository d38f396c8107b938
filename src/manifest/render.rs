//! Writer for the `.manifest` text format understood by [`super::ManifestParser`].

use super::parser::{ASSETS_HEADER, DEPENDENCIES_HEADER};

/// Version line written at the top of every manifest.
const VERSION_LINE: &str = "ManifestFileVersion: 0";

/// Render a manifest listing `assets` and dotted `dependencies`.
///
/// Sections without entries are written in the inline `Header: []` form, which the parser reads
/// back as an empty list.
pub fn render_manifest<A, D>(assets: A, dependencies: D) -> String
where
  A: IntoIterator,
  A::Item: AsRef<str>,
  D: IntoIterator,
  D::Item: AsRef<str>,
{
  let mut lines = vec![VERSION_LINE.to_string()];
  push_section(&mut lines, ASSETS_HEADER, assets);
  push_section(&mut lines, DEPENDENCIES_HEADER, dependencies);

  let mut text = lines.join("\n");
  text.push('\n');
  text
}

fn push_section<I>(lines: &mut Vec<String>, header: &str, entries: I)
where
  I: IntoIterator,
  I::Item: AsRef<str>,
{
  let entries: Vec<String> = entries
    .into_iter()
    .map(|entry| format!("- {}", entry.as_ref()))
    .collect();

  if entries.is_empty() {
    lines.push(format!("{header} []"));
  } else {
    lines.push(header.to_string());
    lines.extend(entries);
  }
}

#[cfg(test)]
mod tests {
  use super::render_manifest;
  use crate::manifest::{ManifestMode, ManifestParser};

  #[test]
  fn renders_sections_in_order() {
    let text = render_manifest(["globals/prefabs/foo.prefab"], ["globals.textures.bar"]);
    assert_eq!(
      text,
      "ManifestFileVersion: 0\nAssets:\n- globals/prefabs/foo.prefab\nDependencies:\n- globals.textures.bar\n"
    );
  }

  #[test]
  fn empty_sections_use_inline_form() {
    let text = render_manifest(["a.png"], Vec::<String>::new());
    assert!(text.contains("Dependencies: []"));

    let parsed = ManifestParser::new(ManifestMode::Multi, "Content", "").parse_str(&text);
    assert_eq!(parsed.assets, vec!["a.png".to_string()]);
    assert!(parsed.dependencies.is_empty());
  }
}
