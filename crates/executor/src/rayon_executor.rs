//! Rayon-based parallel executor.
//!
//! Scanning and rewriting a document is CPU-light and I/O-bound, but
//! projects run to thousands of work packages, so fanning the batch out
//! over a work-stealing pool still pays off.

use entsync_traits::Executor;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::Arc;
use thiserror::Error;

/// Failure to build a dedicated thread pool.
#[derive(Error, Debug)]
#[error("Failed to build thread pool with {threads} threads: {message}")]
pub struct PoolError {
    pub threads: usize,
    pub message: String,
}

/// A parallel executor backed by rayon.
///
/// `new()` runs on rayon's global pool; `with_threads(n)` owns a dedicated
/// pool so a batch can be capped without touching global configuration.
/// Results always come back in input order (indexed parallel collect).
#[derive(Debug, Clone)]
pub struct RayonExecutor {
    pool: Option<Arc<ThreadPool>>,
    num_threads: usize,
}

impl RayonExecutor {
    /// Creates an executor on rayon's global thread pool.
    pub fn new() -> Self {
        Self {
            pool: None,
            num_threads: rayon::current_num_threads(),
        }
    }

    /// Creates an executor with its own pool of `threads` workers.
    pub fn with_threads(threads: usize) -> Result<Self, PoolError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("entsync-worker-{}", i))
            .build()
            .map_err(|e| PoolError {
                threads,
                message: e.to_string(),
            })?;
        Ok(Self {
            num_threads: pool.current_num_threads(),
            pool: Some(Arc::new(pool)),
        })
    }
}

impl Default for RayonExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for RayonExecutor {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static,
    {
        match &self.pool {
            Some(pool) => pool.install(|| items.into_par_iter().map(f).collect()),
            None => items.into_par_iter().map(f).collect(),
        }
    }

    fn parallelism(&self) -> usize {
        self.num_threads
    }

    fn name(&self) -> &'static str {
        "RayonExecutor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_rayon_executor_preserves_input_order() {
        let executor = RayonExecutor::new();
        let items: Vec<usize> = (0..500).collect();
        let results = executor.execute_all(items, |x| x * 2);
        let expected: Vec<usize> = (0..500).map(|x| x * 2).collect();
        assert_eq!(results, expected);
    }

    #[test]
    fn test_rayon_executor_runs_every_item() {
        let executor = RayonExecutor::with_threads(4).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        let seen = counter.clone();
        executor.execute_all(vec![(); 100], move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(counter.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn test_dedicated_pool_reports_its_size() {
        let executor = RayonExecutor::with_threads(2).unwrap();
        assert_eq!(executor.parallelism(), 2);
    }

    #[test]
    fn test_rayon_executor_empty_input() {
        let executor = RayonExecutor::new();
        let results: Vec<i32> = executor.execute_all(Vec::<i32>::new(), |x| x);
        assert!(results.is_empty());
    }
}
