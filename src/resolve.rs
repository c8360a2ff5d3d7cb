//! Resolve the file path of an import map.

use std::path::{Component, Path, PathBuf};

use crate::util::path::PathExt;

/// Resolve the `src` attribute of an import map script to a file path.
///
/// - An absolute `src` (e.g. `/maps/m.json`) is relative to `served_dir`.
/// - A relative `src` (e.g. `../maps/m.json`) is relative to the directory
///   containing `document_path`.
///
/// Resolution is lexical and never touches the file system, so the returned
/// path may not exist.
///
/// Unlike a plain join on the document directory, `..` segments stop at
/// `served_dir` when the document lies inside it, as a browser resolves the
/// URL: `../../../m.json` from `/site/pages/a.html` with `served_dir` set to
/// `/site` gives `/site/m.json`, not `/m.json`.
pub fn resolve_src(
    served_dir: impl AsRef<Path>,
    document_path: impl AsRef<Path>,
    src: impl AsRef<str>,
) -> PathBuf {
    let served_dir = served_dir.as_ref();
    let document_path = document_path.as_ref();
    let src = src.as_ref();

    let root = Path::new(Component::RootDir.as_os_str());

    // Path of the target file, rooted at `served_dir`
    let rooted = if src.starts_with('/') {
        PathBuf::from(src)
    } else if let Ok(document_path) = document_path.strip_prefix(served_dir) {
        let document_path = root.join(document_path);
        document_path.parent().unwrap_or(root).join(src)
    } else {
        // Document outside of the served directory
        let document_dir = document_path.parent().unwrap_or(Path::new(""));
        return document_dir.join(src).normalize();
    };

    let rooted = rooted.normalize();

    match rooted.strip_prefix(root) {
        Ok(path) if path.as_os_str().is_empty() => served_dir.to_path_buf(),
        Ok(path) => served_dir.join(path),
        Err(_) => served_dir.join(rooted),
    }
}
