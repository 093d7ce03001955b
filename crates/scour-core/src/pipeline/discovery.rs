//! Input expansion: directories become their supported files.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::item::SUPPORTED_EXTENSIONS;

/// Expand a mixed list of files and directories into a flat input list.
///
/// Directories are walked recursively and contribute only files with a
/// supported extension, sorted by path. Non-directory arguments pass
/// through untouched, whatever their extension, so explicitly named
/// unsupported files still show up in the batch report.
pub fn discover(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(input)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.path().is_file() && has_supported_extension(e.path()))
                .map(|e| e.path().to_path_buf())
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    files
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let lower = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}
