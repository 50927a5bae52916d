//! Project-relative path rendering.
//!
//! Relativization is purely lexical: nothing touches the filesystem, so
//! symlinks are not resolved. `..` folds into the preceding name before the
//! paths are compared. The result always uses `/` as the separator.

use std::path::{Component, Path};

use crate::error::{GapError, Result};

/// Render `path` relative to `root` with forward slashes.
///
/// When `root` is not an ancestor of `path`, the result climbs out of `root`
/// with `..` components (a sibling root yields `../other/src/lib.rs`).
pub fn relative_path(root: &Path, path: &Path) -> Result<String> {
    if root.has_root() != path.has_root() {
        return Err(GapError::relativize(
            root,
            path,
            "cannot mix absolute and relative paths",
        ));
    }

    let root_parts = significant_components(root);
    let path_parts = significant_components(path);

    let common = root_parts
        .iter()
        .zip(&path_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::with_capacity(root_parts.len() + path_parts.len());
    for component in &root_parts[common..] {
        match component {
            Component::Normal(_) => parts.push("..".to_string()),
            Component::Prefix(_) | Component::RootDir => {
                return Err(GapError::relativize(root, path, "paths share no common prefix"));
            }
            Component::ParentDir | Component::CurDir => {
                return Err(GapError::relativize(
                    root,
                    path,
                    "root must not contain `..` past the common ancestor",
                ));
            }
        }
    }
    for component in &path_parts[common..] {
        match component {
            Component::Normal(name) => parts.push(name.to_string_lossy().into_owned()),
            Component::ParentDir => parts.push("..".to_string()),
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {
                return Err(GapError::relativize(root, path, "paths share no common prefix"));
            }
        }
    }

    if parts.is_empty() {
        return Ok(".".to_string());
    }
    Ok(parts.join("/"))
}

/// Components with `.` dropped and `..` folded into the preceding name.
///
/// `..` directly under the root stays at the root; leading `..` of a relative
/// path is kept.
fn significant_components(path: &Path) -> Vec<Component<'_>> {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }
    parts
}
