use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// A deletable entry found under one of the junk roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JunkItem {
    pub path: PathBuf,
    /// Bytes freed by deleting it (recursive for directories).
    pub size: u64,
}

/// List the direct children of each root.
///
/// Roots that are missing or unreadable are skipped.  Entries whose size
/// cannot be determined are still listed, with size 0.
pub fn scan(roots: &[PathBuf]) -> Vec<JunkItem> {
    let mut items = Vec::new();

    for root in roots {
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot scan '{}': {e}", root.display());
                continue;
            }
        };

        let mut found: Vec<JunkItem> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| {
                let path = entry.path();
                JunkItem { size: size_of(&path), path }
            })
            .collect();
        found.sort_by(|a, b| a.path.cmp(&b.path));
        items.extend(found);
    }

    items
}

fn size_of(path: &Path) -> u64 {
    let Ok(meta) = fs::symlink_metadata(path) else {
        return 0;
    };
    if !meta.is_dir() {
        return meta.len();
    }
    fs::read_dir(path)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .map(|entry| size_of(&entry.path()))
                .sum()
        })
        .unwrap_or(0)
}
