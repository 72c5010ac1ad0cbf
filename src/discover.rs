//! Source document discovery.
//!
//! Two modes:
//!
//! - **Full build**: walk the source root recursively and collect every file
//!   with the configured extension. Hidden files and directories (leading
//!   `.`) are skipped, the same way a shell `**/*.adoc` glob skips them.
//! - **Single target**: resolve one document given on the command line.
//!
//! All returned paths are relative to the source root, so the first segment
//! is the version directory for manual pages.
//!
//! An unreadable subdirectory or a missing source root is not an error: the
//! walk logs a warning and yields whatever it could read, possibly nothing.

use crate::job::clean_path;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum DiscoverError {
    #[error("Target is outside the source root {root}: {target}")]
    TargetOutsideRoot { target: PathBuf, root: PathBuf },
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension() == Some(OsStr::new(extension))
}

/// Find every document under `root` with the given extension.
///
/// Returned paths are relative to `root` and sorted by file name within each
/// directory, so repeated runs log in the same order.
pub fn discover(root: &Path, extension: &str) -> Vec<PathBuf> {
    let mut documents = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry: {err}");
                continue;
            }
        };
        // Follows symlinks, so a linked document is converted like a regular one
        if !entry.path().is_file() || !has_extension(entry.path(), extension) {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            documents.push(relative.to_path_buf());
        }
    }
    documents
}

/// Resolve an explicit target to a path relative to `root`.
///
/// Accepted forms:
/// - relative to the source root: `v1.0/nn_socket.adoc`
/// - including the source root: `_adoc/v1.0/nn_socket.adoc`
///
/// Both paths are cleaned lexically first, so `./_adoc/v1.0/a.adoc` and
/// `v1.0/../index.adoc` resolve to `v1.0/a.adoc` and `index.adoc`. A target
/// that is absolute, or climbs out with `..`, must lie inside the source
/// root. The target is not checked for existence here: a missing file
/// surfaces as a read failure of its job, like any other unreadable document.
pub fn resolve_target(root: &Path, target: &Path) -> Result<PathBuf, DiscoverError> {
    let root = clean_path(root);
    let target = clean_path(target);

    if let Ok(relative) = target.strip_prefix(&root) {
        return Ok(relative.to_path_buf());
    }
    if target.is_absolute() || target.starts_with("..") {
        return Err(DiscoverError::TargetOutsideRoot { target, root });
    }
    Ok(target)
}
