//! Task dispatch
//!
//! [`TaskCursor`] hands out task indices to worker threads with an atomic
//! fetch-and-add, optionally in batches, and counts completions. A claim
//! that yields nothing means the supply is exhausted and the worker should
//! stop pulling.

use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Lock-free monotonic task counter
#[derive(Debug)]
pub struct TaskCursor {
    total: usize,
    next: AtomicUsize,
    completed: AtomicUsize,
}

impl TaskCursor {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            next: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        }
    }

    /// Total number of tasks
    pub fn total(&self) -> usize {
        self.total
    }

    /// Claim up to `granule` consecutive task indices.
    ///
    /// Returns `None` once every task has been handed out. Each index is
    /// returned to exactly one caller, whatever the granule.
    pub fn claim(&self, granule: usize) -> Option<Range<usize>> {
        debug_assert!(granule > 0);
        // Only uniqueness is required; results are published by the join.
        // Saturating, so the counter never wraps back to issued indices.
        let base = self
            .next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                Some(n.saturating_add(granule))
            })
            .unwrap_or_else(|n| n);
        if base >= self.total {
            return None;
        }
        Some(base..base.saturating_add(granule).min(self.total))
    }

    /// Record `count` finished tasks.
    pub fn complete(&self, count: usize) {
        self.completed.fetch_add(count, Ordering::AcqRel);
    }

    /// Number of tasks reported complete
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    /// True once every task has been reported complete.
    pub fn is_done(&self) -> bool {
        self.completed() >= self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_claim_sequence() {
        let c = TaskCursor::new(5);
        assert_eq!(c.claim(2), Some(0..2));
        assert_eq!(c.claim(2), Some(2..4));
        assert_eq!(c.claim(2), Some(4..5));
        assert_eq!(c.claim(2), None);
        assert_eq!(c.claim(1), None);
    }

    #[test]
    fn test_completion() {
        let c = TaskCursor::new(3);
        assert!(!c.is_done());
        c.complete(2);
        assert_eq!(c.completed(), 2);
        c.complete(1);
        assert!(c.is_done());
    }

    #[test]
    fn test_huge_granule_never_wraps() {
        let c = TaskCursor::new(3);
        let huge = usize::MAX / 2 + 1;
        assert_eq!(c.claim(huge), Some(0..3));
        for _ in 0..4 {
            assert_eq!(c.claim(huge), None);
        }
        assert_eq!(c.claim(1), None);
    }

    #[test]
    fn test_zero_tasks() {
        let c = TaskCursor::new(0);
        assert_eq!(c.claim(1), None);
        assert!(c.is_done());
    }

    #[test]
    fn test_concurrent_claims_are_unique() {
        let c = Arc::new(TaskCursor::new(1000));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let c = Arc::clone(&c);
                std::thread::spawn(move || {
                    let mut mine = Vec::new();
                    while let Some(r) = c.claim(3) {
                        mine.extend(r.clone());
                        c.complete(r.len());
                    }
                    mine
                })
            })
            .collect();

        let mut all: Vec<usize> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..1000).collect::<Vec<_>>());
        assert!(c.is_done());
    }
}
