//! Executor trait for fanning document work out over threads.
//!
//! A batch over N documents is an embarrassingly parallel map. The batch
//! driver only needs "apply this function to every item and give me the
//! results back in input order", which is what this trait captures.

use std::fmt::Debug;

/// A trait for applying a function to a batch of work items, potentially in parallel.
///
/// # Implementations
///
/// - `SyncExecutor`: Sequential execution on the calling thread (always available)
/// - `RayonExecutor`: Work-stealing thread pool (in `entsync-executor`)
///
/// # Ordering
///
/// Whatever the degree of parallelism, results are returned in the same
/// order as the input items. Batch reports depend on this to stay reproducible.
pub trait Executor: Send + Sync + Debug {
    /// Apply `f` to each item and collect the results in input order.
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static;

    /// Returns the level of parallelism this executor can provide.
    ///
    /// - Returns 1 for sequential executors
    /// - Returns the pool size for parallel executors
    fn parallelism(&self) -> usize;

    /// Returns a human-readable name for this executor (for logging).
    fn name(&self) -> &'static str;
}

/// Processes items one after another on the calling thread.
#[derive(Debug, Clone, Default)]
pub struct SyncExecutor;

impl SyncExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Executor for SyncExecutor {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static,
    {
        items.into_iter().map(f).collect()
    }

    fn parallelism(&self) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "SyncExecutor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_sync_executor_keeps_input_order() {
        let executor = SyncExecutor::new();
        let paths = vec!["b.xml", "a.xml", "c.xml"];
        let results = executor.execute_all(paths, |p| p.to_uppercase());
        assert_eq!(results, vec!["B.XML", "A.XML", "C.XML"]);
    }

    #[test]
    fn test_sync_executor_runs_every_item_once() {
        let executor = SyncExecutor::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let seen = counter.clone();
        executor.execute_all(vec![(); 7], move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(counter.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_sync_executor_empty_input() {
        let executor = SyncExecutor::new();
        let results: Vec<i32> = executor.execute_all(Vec::<i32>::new(), |x| x);
        assert!(results.is_empty());
    }

    #[test]
    fn test_sync_executor_parallelism_is_one() {
        let executor = SyncExecutor::new();
        assert_eq!(executor.parallelism(), 1);
        assert_eq!(executor.name(), "SyncExecutor");
    }
}
