use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::num::NonZeroUsize;
use tracing::debug;

use super::{ExecutionStrategy, Executor};
use crate::errors::{SearchError, SearchResult};
use crate::metrics::TaskMetrics;
use crate::search::SearchTask;

fn build_pool(name: &'static str, threads: usize) -> SearchResult<ThreadPool> {
    debug!("Creating {} pool with {} threads", name, threads);
    ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(move |i| format!("parsearch-{}-{}", name, i))
        .build()
        .map_err(|e| SearchError::config_error(format!("Failed to create thread pool: {}", e)))
}

fn run_recorded(task: &SearchTask, metrics: &TaskMetrics) -> SearchResult<Vec<usize>> {
    let positions = task.call()?;
    metrics.record_task(positions.len());
    Ok(positions)
}

/// One dedicated worker thread; tasks in a batch run one at a time
pub struct SingleThreadExecutor {
    pool: ThreadPool,
    metrics: TaskMetrics,
}

impl SingleThreadExecutor {
    pub fn new() -> SearchResult<Self> {
        Ok(Self {
            pool: build_pool("single", 1)?,
            metrics: TaskMetrics::new(),
        })
    }
}

impl Executor for SingleThreadExecutor {
    fn strategy(&self) -> ExecutionStrategy {
        ExecutionStrategy::Single
    }

    fn invoke_all(&self, tasks: &[SearchTask]) -> SearchResult<Vec<Vec<usize>>> {
        self.metrics.record_batch(tasks.len());
        let metrics = &self.metrics;
        self.pool.install(|| {
            // Run everything before looking at errors, like the pooled variants
            let results: Vec<_> = tasks.iter().map(|t| run_recorded(t, metrics)).collect();
            results.into_iter().collect()
        })
    }

    fn metrics(&self) -> &TaskMetrics {
        &self.metrics
    }
}

/// Exactly `n` worker threads reused across all tasks
pub struct FixedThreadPool {
    pool: ThreadPool,
    metrics: TaskMetrics,
}

impl FixedThreadPool {
    pub fn new(threads: NonZeroUsize) -> SearchResult<Self> {
        Ok(Self {
            pool: build_pool("fixed", threads.get())?,
            metrics: TaskMetrics::new(),
        })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl Executor for FixedThreadPool {
    fn strategy(&self) -> ExecutionStrategy {
        ExecutionStrategy::Fixed
    }

    fn invoke_all(&self, tasks: &[SearchTask]) -> SearchResult<Vec<Vec<usize>>> {
        self.metrics.record_batch(tasks.len());
        let metrics = &self.metrics;
        self.pool.install(|| {
            let results: Vec<_> = tasks
                .par_iter()
                .with_max_len(1)
                .map(|t| run_recorded(t, metrics))
                .collect();
            results.into_iter().collect()
        })
    }

    fn metrics(&self) -> &TaskMetrics {
        &self.metrics
    }
}
