//! File discovery module for finding media files to process.
//!
//! Discovery walks the input tree recursively, skips hidden entries, and
//! keeps only files whose lowercased extension is in the configured
//! allow-list.

use crate::error::CoreResult;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn has_allowed_extension(path: &Path, allowed: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| allowed.iter().any(|a| ext.eq_ignore_ascii_case(a)))
}

/// Finds media files eligible for processing under the input root.
///
/// Recurses into subdirectories, skipping any entry (file or directory)
/// whose name starts with a hidden-file marker. Symlinks are not followed.
/// No ordering is guaranteed across the result set.
///
/// # Errors
///
/// Returns `CoreError::Walkdir` if a path in the tree cannot be read; this
/// is the only fatal discovery condition.
pub fn find_processable_files(
    input_root: &Path,
    allowed_extensions: &[String],
) -> CoreResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(input_root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if has_allowed_extension(entry.path(), allowed_extensions) {
            files.push(entry.into_path());
        }
    }

    log::debug!(
        "Discovery found {} candidate files under {}",
        files.len(),
        input_root.display()
    );
    Ok(files)
}
