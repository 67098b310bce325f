//! Directory listing helpers shared by registry building and sorting.
//!
//! Entries are returned sorted by name so traversal order (and therefore
//! log ordering and tie-break diagnostics) is deterministic across
//! filesystems.

use std::io;
use std::path::{Path, PathBuf};

/// Hidden entries (leading `.`, e.g. `.DS_Store`) are excluded from both
/// reference and input processing.
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

/// Non-hidden regular files directly under `dir`, sorted by name.
pub fn visible_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    visible_entries(dir, |p| p.is_file())
}

/// Non-hidden subdirectories directly under `dir`, sorted by name.
pub fn visible_dirs(dir: &Path) -> io::Result<Vec<PathBuf>> {
    visible_entries(dir, |p| p.is_dir())
}

fn visible_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> io::Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if !is_hidden(&path) && keep(&path) {
                    entries.push(path);
                }
            }
            Err(e) => log::warn!("[skip] unreadable entry in {}: {e}", dir.display()),
        }
    }
    entries.sort();
    Ok(entries)
}
