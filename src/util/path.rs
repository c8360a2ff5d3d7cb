//! Utility functions for paths.

use std::path::{Component, Path, PathBuf};

/// Extend [`std::path::Path`] with utility methods.
pub(crate) trait PathExt {
    /// Normalize the path by removing unnecessary separators and `.` and `..`
    /// components.
    ///
    /// This method calls [`normalize_path`] under the hood.
    fn normalize(&self) -> PathBuf;
}

impl<T> PathExt for T
where
    T: AsRef<Path>,
{
    fn normalize(&self) -> PathBuf {
        self::normalize_path(self)
    }
}

/// Normalize a path by removing unnecessary separators and `.` and `..`
/// components.
///
/// The path is processed lexically: the file system is never accessed and
/// symbolic links are not resolved. A `..` at the root of an absolute path is
/// dropped (`/../foo` returns `/foo`), while leading `..` components of a
/// relative path are kept (`../foo` returns `../foo`).
pub(crate) fn normalize_path<P>(path: P) -> PathBuf
where
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let mut prefix = None;
    let mut has_root = false;
    let mut result: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) => prefix = Some(component),
            Component::RootDir => has_root = true,
            Component::CurDir => {},
            Component::Normal(_) => result.push(component),
            Component::ParentDir => match result.last() {
                Some(Component::Normal(_)) => {
                    result.pop();
                },
                Some(_) => result.push(component),
                None if !has_root => result.push(component),
                None => {},
            },
        }
    }

    let mut normalized = PathBuf::new();

    if let Some(prefix) = prefix {
        normalized.push(prefix);
    }

    if has_root {
        normalized.push(Component::RootDir);
    }

    normalized.extend(result);

    if normalized.as_os_str().is_empty() {
        return PathBuf::from(Component::CurDir.as_os_str());
    }

    normalized
}
