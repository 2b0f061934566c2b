use std::fmt;
use std::path::PathBuf;

/// Result of a cleanup batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub deleted_count: usize,
    pub deleted_bytes: u64,
    /// Items left in place (locked, permission denied, already gone).
    pub failures: Vec<CleanupFailure>,
    /// The batch was stopped before every item was visited.
    pub cancelled: bool,
}

impl CleanupReport {
    /// Number of items that could not be deleted.
    pub fn skipped(&self) -> usize {
        self.failures.len()
    }
}

/// One item the cleaner had to leave behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupFailure {
    pub path:   PathBuf,
    pub reason: String,
}

impl fmt::Display for CleanupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason)
    }
}

/// Items processed so far out of the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupProgress {
    pub done:  usize,
    pub total: usize,
}

impl CleanupProgress {
    /// Completion as a percentage (0–100).  An empty batch is complete.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.done.min(self.total) * 100) / self.total) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_percent() {
        assert_eq!(CleanupProgress { done: 0, total: 0 }.percent(), 100);
        assert_eq!(CleanupProgress { done: 1, total: 4 }.percent(), 25);
        assert_eq!(CleanupProgress { done: 4, total: 4 }.percent(), 100);
    }
}
