//! Junk cleanup: find what sits in the temp directories and delete it,
//! one item at a time, without letting a single stubborn file stop the run.

pub mod report;
pub mod scan;
pub mod task;

pub use report::{CleanupFailure, CleanupProgress, CleanupReport};
pub use scan::{scan, JunkItem};
pub use task::{spawn_cleanup, CleanupTask};

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::debug;

/// Delete every item, reporting failures instead of stopping on them.
pub fn delete(items: &[JunkItem]) -> CleanupReport {
    delete_with(items, Duration::ZERO, &AtomicBool::new(false), |_| {})
}

/// As [`delete`], pausing `pace` between items and calling `on_progress`
/// after each one.  Once `cancel` is set, no further item is touched and
/// the report is marked `cancelled`.
pub fn delete_with(
    items: &[JunkItem],
    pace: Duration,
    cancel: &AtomicBool,
    mut on_progress: impl FnMut(CleanupProgress),
) -> CleanupReport {
    let mut report = CleanupReport::default();
    let total = items.len();

    for (i, item) in items.iter().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            report.cancelled = true;
            break;
        }

        match remove(&item.path) {
            Ok(()) => {
                report.deleted_count += 1;
                report.deleted_bytes += item.size;
            }
            Err(e) => {
                debug!("Skipping '{}': {e}", item.path.display());
                report.failures.push(CleanupFailure {
                    path:   item.path.clone(),
                    reason: e.to_string(),
                });
            }
        }

        on_progress(CleanupProgress { done: i + 1, total });
        if !pace.is_zero() && i + 1 < total {
            std::thread::sleep(pace);
        }
    }

    report
}

fn remove(path: &Path) -> std::io::Result<()> {
    // symlink_metadata: never follow a link out of the junk directory.
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
