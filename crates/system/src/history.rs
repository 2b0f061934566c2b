//! Fixed-capacity rolling window of recent samples.

use ssm_core::Sample;
use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock};

/// Rolling window of the last `capacity` values, oldest first.
///
/// Pushing past capacity evicts the oldest value.  Nothing else ever
/// removes a value, and the capacity never changes.
#[derive(Debug, Clone)]
pub struct HistoryWindow<T> {
    samples:  VecDeque<T>,
    capacity: usize,
}

impl<T> HistoryWindow<T> {
    /// A zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new sample, evicting the oldest if at capacity.
    pub fn push(&mut self, value: T) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&T> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.samples.iter()
    }

    /// Mean of `f` over the window; 0.0 when empty.
    pub fn average_by(&self, f: impl Fn(&T) -> f32) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().map(f).sum::<f32>() / self.samples.len() as f32
    }
}

impl<T: Clone> HistoryWindow<T> {
    /// Copy of the current contents in chronological order.
    pub fn snapshot(&self) -> Vec<T> {
        self.samples.iter().cloned().collect()
    }
}

/// Create the sampler's shared history: one writer, any number of readers.
pub fn history_channel(capacity: usize) -> (HistoryWriter, HistoryReader) {
    let shared = Arc::new(RwLock::new(HistoryWindow::new(capacity)));
    (
        HistoryWriter { shared: Arc::clone(&shared) },
        HistoryReader { shared },
    )
}

/// The single write handle.  Deliberately not `Clone`.
#[derive(Debug)]
pub struct HistoryWriter {
    shared: Arc<RwLock<HistoryWindow<Sample>>>,
}

impl HistoryWriter {
    pub fn push(&self, sample: Sample) {
        self.shared
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sample);
    }
}

/// Read-only view.  Every read copies under the lock, so callers never see
/// a push half-applied.
#[derive(Debug, Clone)]
pub struct HistoryReader {
    shared: Arc<RwLock<HistoryWindow<Sample>>>,
}

impl HistoryReader {
    pub fn snapshot(&self) -> Vec<Sample> {
        self.read(HistoryWindow::snapshot)
    }

    pub fn len(&self) -> usize {
        self.read(HistoryWindow::len)
    }

    pub fn is_empty(&self) -> bool {
        self.read(HistoryWindow::is_empty)
    }

    pub fn capacity(&self) -> usize {
        self.read(HistoryWindow::capacity)
    }

    /// Average CPU usage over the window.
    pub fn average_cpu(&self) -> f32 {
        self.read(|w| w.average_by(|s| s.cpu_percent))
    }

    fn read<R>(&self, f: impl FnOnce(&HistoryWindow<Sample>) -> R) -> R {
        f(&self.shared.read().unwrap_or_else(PoisonError::into_inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_last_n_in_order() {
        let mut w = HistoryWindow::new(3);
        for v in [1, 2, 3, 4] {
            w.push(v);
        }
        assert_eq!(w.snapshot(), vec![2, 3, 4]);
        assert_eq!(w.latest(), Some(&4));
    }

    #[test]
    fn length_never_exceeds_capacity() {
        let n = 5;
        for k in 0..12 {
            let mut w = HistoryWindow::new(n);
            for v in 0..(n + k) {
                w.push(v);
            }
            assert_eq!(w.len(), n);
            assert_eq!(w.snapshot(), (k..n + k).collect::<Vec<_>>());
        }
    }

    #[test]
    fn partially_filled_window() {
        let mut w = HistoryWindow::new(60);
        w.push('a');
        w.push('b');
        assert_eq!(w.len(), 2);
        assert_eq!(w.capacity(), 60);
        assert_eq!(w.snapshot(), vec!['a', 'b']);
    }

    #[test]
    fn snapshot_is_repeatable() {
        let mut w = HistoryWindow::new(4);
        w.push(7);
        w.push(8);
        assert_eq!(w.snapshot(), w.snapshot());
    }

    #[test]
    fn zero_capacity_is_bumped_to_one() {
        let mut w = HistoryWindow::new(0);
        w.push(1);
        w.push(2);
        assert_eq!(w.snapshot(), vec![2]);
    }

    #[test]
    fn average_by_projection() {
        let mut w = HistoryWindow::new(4);
        assert_eq!(w.average_by(|v: &f32| *v), 0.0);
        for v in [10.0, 20.0, 30.0] {
            w.push(v);
        }
        assert!((w.average_by(|v| *v) - 20.0).abs() < f32::EPSILON);
    }
}
