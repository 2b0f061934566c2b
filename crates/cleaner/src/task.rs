use crate::{delete_with, scan, CleanupProgress, CleanupReport};
use ssm_core::{Result, SsmError};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::info;

/// A cleanup running in the background.  Dropping it cancels the batch
/// after the item in flight.
#[derive(Debug)]
pub struct CleanupTask {
    /// Per-item progress.  Lossy: updates are dropped if nobody keeps up.
    pub progress: mpsc::Receiver<CleanupProgress>,
    /// Resolves once with the final report.
    pub done: oneshot::Receiver<CleanupReport>,
    cancel: Arc<AtomicBool>,
}

impl CleanupTask {
    /// Stop after the item currently being deleted.  The report still
    /// arrives, marked `cancelled`.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Wait for the report, ignoring progress.
    pub async fn finish(mut self) -> Result<CleanupReport> {
        (&mut self.done)
            .await
            .map_err(|_| SsmError::Cleanup("cleanup task ended without a report".into()))
    }
}

impl Drop for CleanupTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Scan `roots` and delete what is found on the blocking pool, so neither
/// sampling nor the console waits on the filesystem.
pub fn spawn_cleanup(roots: Vec<PathBuf>, pace: Duration) -> CleanupTask {
    let (progress_tx, progress) = mpsc::channel(16);
    let (done_tx, done) = oneshot::channel();
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);

    tokio::task::spawn_blocking(move || {
        let items = scan(&roots);
        info!("Cleanup started: {} item(s)", items.len());

        let report = delete_with(&items, pace, &flag, |p| {
            let _ = progress_tx.try_send(p);
        });

        info!(
            deleted = report.deleted_count,
            bytes = report.deleted_bytes,
            skipped = report.skipped(),
            cancelled = report.cancelled,
            "Cleanup finished"
        );
        let _ = done_tx.send(report);
    });

    CleanupTask { progress, done, cancel }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn background_cleanup_reports_once() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..5 {
            fs::write(dir.path().join(format!("{i}.tmp")), [0u8; 8]).unwrap();
        }

        let task = spawn_cleanup(vec![dir.path().to_path_buf()], Duration::from_millis(1));
        let report = task.finish().await.unwrap();

        assert_eq!(report.deleted_count, 5);
        assert_eq!(report.deleted_bytes, 40);
        assert_eq!(report.skipped(), 0);
    }

    #[tokio::test]
    async fn dropping_the_task_stops_deleting() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..20 {
            fs::write(dir.path().join(format!("{i:02}.tmp")), [0u8; 8]).unwrap();
        }

        let task = spawn_cleanup(vec![dir.path().to_path_buf()], Duration::from_millis(50));
        drop(task);
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert!(fs::read_dir(dir.path()).unwrap().count() >= 15);
    }

    #[tokio::test]
    async fn cancelled_task_still_reports() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..10 {
            fs::write(dir.path().join(format!("{i}.tmp")), [0u8; 8]).unwrap();
        }

        let task = spawn_cleanup(vec![dir.path().to_path_buf()], Duration::from_millis(50));
        task.cancel();
        let report = task.finish().await.unwrap();

        assert!(report.cancelled);
        assert!(report.deleted_count < 10);
    }

    #[tokio::test]
    async fn empty_roots_finish_with_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let task = spawn_cleanup(vec![dir.path().to_path_buf()], Duration::ZERO);
        assert_eq!(task.finish().await.unwrap(), CleanupReport::default());
    }
}
