//! Executor implementations for entsync batches.
//!
//! ## Available Executors
//!
//! - [`RayonExecutor`]: Work-stealing thread pool (feature: `rayon`)
//! - [`SyncExecutor`]: Sequential execution (re-exported from entsync-traits)
//!
//! ## Usage
//!
//! ```ignore
//! use entsync_executor::ExecutorImpl;
//! use entsync_traits::Executor;
//!
//! let executor = ExecutorImpl::with_jobs(Some(4))?;
//! let reports = executor.execute_all(paths, move |path| process(&ctx, path));
//! ```

#[cfg(feature = "rayon")]
mod rayon_executor;

#[cfg(feature = "rayon")]
pub use rayon_executor::{PoolError, RayonExecutor};

pub use entsync_traits::{Executor, SyncExecutor};

/// A type-erased executor that wraps concrete executor implementations.
///
/// `Executor` has generic methods and cannot be a trait object, so batch
/// options hold this enum instead.
#[derive(Clone, Debug)]
pub enum ExecutorImpl {
    /// Sequential executor (no parallelism)
    Sync(SyncExecutor),

    /// Rayon work-stealing thread pool executor
    #[cfg(feature = "rayon")]
    Rayon(RayonExecutor),
}

impl ExecutorImpl {
    /// Pick an executor for a requested job count.
    ///
    /// `Some(1)` is sequential, `Some(n)` builds a dedicated pool of `n`
    /// threads, `None` uses the default executor.
    #[cfg(feature = "rayon")]
    pub fn with_jobs(jobs: Option<usize>) -> Result<Self, PoolError> {
        match jobs {
            Some(0) | Some(1) => Ok(ExecutorImpl::Sync(SyncExecutor::new())),
            Some(n) => Ok(ExecutorImpl::Rayon(RayonExecutor::with_threads(n)?)),
            None => Ok(Self::default()),
        }
    }
}

impl Executor for ExecutorImpl {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static,
    {
        match self {
            ExecutorImpl::Sync(exec) => exec.execute_all(items, f),
            #[cfg(feature = "rayon")]
            ExecutorImpl::Rayon(exec) => exec.execute_all(items, f),
        }
    }

    fn parallelism(&self) -> usize {
        match self {
            ExecutorImpl::Sync(exec) => exec.parallelism(),
            #[cfg(feature = "rayon")]
            ExecutorImpl::Rayon(exec) => exec.parallelism(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ExecutorImpl::Sync(exec) => exec.name(),
            #[cfg(feature = "rayon")]
            ExecutorImpl::Rayon(exec) => exec.name(),
        }
    }
}

impl Default for ExecutorImpl {
    fn default() -> Self {
        #[cfg(feature = "rayon")]
        {
            ExecutorImpl::Rayon(RayonExecutor::new())
        }
        #[cfg(not(feature = "rayon"))]
        {
            ExecutorImpl::Sync(SyncExecutor::new())
        }
    }
}
