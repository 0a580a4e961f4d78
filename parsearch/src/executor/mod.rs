//! Thread-pool execution strategies.
//!
//! Every strategy implements [`Executor`]: submit a batch of [`SearchTask`]s,
//! block until all of them have finished, and get their results back in the
//! order the tasks were submitted. Strategies differ only in how tasks are
//! mapped onto worker threads:
//!
//! - [`SingleThreadExecutor`]: one dedicated worker, tasks run one after another
//! - [`CachedThreadPool`]: workers spawned on demand and reused while idle
//! - [`FixedThreadPool`]: exactly `n` workers shared by all tasks
//!
//! Worker threads are released when the executor is dropped.
pub mod cached;
pub mod pool;

pub use cached::CachedThreadPool;
pub use pool::{FixedThreadPool, SingleThreadExecutor};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use crate::errors::{SearchError, SearchResult};
use crate::metrics::TaskMetrics;
use crate::search::SearchTask;

/// Which kind of thread pool runs the tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStrategy {
    #[default]
    Single,
    Cached,
    Fixed,
}

impl fmt::Display for ExecutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Single => "single",
            Self::Cached => "cached",
            Self::Fixed => "fixed",
        };
        f.write_str(name)
    }
}

impl FromStr for ExecutionStrategy {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" | "s" => Ok(Self::Single),
            "cached" | "c" => Ok(Self::Cached),
            "fixed" | "f" => Ok(Self::Fixed),
            other => Err(SearchError::invalid_configuration(format!(
                "unknown executor '{}', expected single, cached or fixed",
                other
            ))),
        }
    }
}

/// Runs batches of search tasks on worker threads
pub trait Executor: Send + Sync {
    /// The strategy this executor implements
    fn strategy(&self) -> ExecutionStrategy;

    /// Runs every task and waits for all of them.
    ///
    /// Results are returned in submission order. If any task fails, the whole
    /// batch fails with that task's error once every task has finished.
    fn invoke_all(&self, tasks: &[SearchTask]) -> SearchResult<Vec<Vec<usize>>>;

    /// Activity counters for this executor
    fn metrics(&self) -> &TaskMetrics;

    /// Runs a single task and waits for it
    fn submit(&self, task: &SearchTask) -> SearchResult<Vec<usize>> {
        self.invoke_all(std::slice::from_ref(task))?
            .into_iter()
            .next()
            .ok_or_else(|| SearchError::task_failure("executor returned no result"))
    }
}

/// Creates the executor for a strategy. `threads` only applies to the fixed pool.
pub fn build_executor(
    strategy: ExecutionStrategy,
    threads: NonZeroUsize,
) -> SearchResult<Box<dyn Executor>> {
    Ok(match strategy {
        ExecutionStrategy::Single => Box::new(SingleThreadExecutor::new()?),
        ExecutionStrategy::Cached => Box::new(CachedThreadPool::new()),
        ExecutionStrategy::Fixed => Box::new(FixedThreadPool::new(threads)?),
    })
}
