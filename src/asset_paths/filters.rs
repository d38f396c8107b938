/// File name fragments that mark editor bookkeeping files rather than content.
const IGNORED_FRAGMENTS: &[&str] = &[".meta", ".DS_Store"];

/// Determine whether a file should be left out of every scan.
///
/// Sidecar `.meta` files and macOS `.DS_Store` files are never content. The match is a
/// case-sensitive substring test against the file name only.
pub fn is_ignored_file(name: &str) -> bool {
    IGNORED_FRAGMENTS
        .iter()
        .any(|fragment| name.contains(fragment))
}
