use std::path::{Path, PathBuf};

/// Split a path into its named segments.
///
/// Both separators are accepted so that configuration written on Windows resolves the same way
/// everywhere. Empty and `.` segments are dropped.
pub fn path_segments(path: &str) -> Vec<&str> {
    path.split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect()
}

/// Segments of `path` below `root`.
///
/// Accepts either a path that starts with the root or one that is already root-relative.
pub fn relative_segments(root: &Path, path: &Path) -> Vec<String> {
    let root = root.to_string_lossy();
    let path = path.to_string_lossy();
    let root_segments = path_segments(&root);
    let segments = path_segments(&path);

    let remainder = if !root_segments.is_empty() && segments.starts_with(&root_segments) {
        &segments[root_segments.len()..]
    } else {
        &segments[..]
    };

    remainder.iter().map(|segment| segment.to_string()).collect()
}

/// Forward-slash form of a path relative to `root`.
pub fn relative_slash_path(root: &Path, path: &Path) -> String {
    relative_segments(root, path).join("/")
}

/// Map a file inside `source_dir` to the same relative location inside `target_dir`.
///
/// Nested directories below the source are preserved. A file outside the source directory is
/// placed at the top level of the target.
pub fn remap_into_variant(source_dir: &Path, target_dir: &Path, file: &Path) -> PathBuf {
    match file.strip_prefix(source_dir) {
        Ok(relative) => target_dir.join(relative),
        Err(_) => match file.file_name() {
            Some(name) => target_dir.join(name),
            None => target_dir.to_path_buf(),
        },
    }
}
