use rayon::prelude::*;

use crate::error::TidyError;

/// Upper bound on worker threads, whatever the machine reports.
pub const MAX_JOBS: usize = 32;

/// `min(32, cpus + 4)`: the filesystem work here is blocking I/O, so a few
/// more threads than cores keeps the disk busy.
pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get() + 4)
        .unwrap_or(8)
        .min(MAX_JOBS)
}

/// Bounded thread pool shared by the scan and delete phases.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
}

impl WorkerPool {
    pub fn new(jobs: usize) -> Result<Self, TidyError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs.clamp(1, MAX_JOBS))
            .thread_name(|i| format!("dirtidy-worker-{i}"))
            .build()?;
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `task` over every item and wait for all of them to finish.
    /// Exactly one result comes back per input item.
    pub fn run_all<T, R, F>(&self, items: Vec<T>, task: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync,
    {
        self.pool
            .install(|| items.into_par_iter().map(task).collect())
    }
}
