//! Locate schema files under a directory.

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::{ScaffoldError, ScaffoldResult};

/// True when `path` names a Ruby file rather than a directory to search.
pub fn is_schema_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "rb")
}

/// Find `*schema*.rb` files under `root`, sorted by path.
///
/// Hidden directories are not descended into. Finding nothing is an error.
pub fn find_schema_files(root: &Path) -> ScaffoldResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(ScaffoldError::Discovery(format!(
            "'{}' is not a directory",
            root.display()
        )));
    }

    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && is_schema_name(e))
        .map(DirEntry::into_path)
        .collect();
    found.sort();

    debug!(root = %root.display(), found = found.len(), "searched for schema files");

    if found.is_empty() {
        return Err(ScaffoldError::Discovery(format!(
            "There is no schema*.rb in the directory '{}'",
            root.display()
        )));
    }
    Ok(found)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|s| s.starts_with('.'))
}

fn is_schema_name(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.contains("schema") && s.ends_with(".rb"))
}
