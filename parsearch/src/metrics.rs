use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Tracks executor activity
#[derive(Debug, Clone)]
pub struct TaskMetrics {
    // Work metrics
    batches_submitted: Arc<AtomicU64>,
    tasks_executed: Arc<AtomicU64>,
    positions_found: Arc<AtomicU64>,

    // Worker lifecycle metrics
    workers_spawned: Arc<AtomicU64>,
    workers_retired: Arc<AtomicU64>,
}

impl TaskMetrics {
    /// Creates a new TaskMetrics instance
    pub fn new() -> Self {
        Self {
            batches_submitted: Arc::new(AtomicU64::new(0)),
            tasks_executed: Arc::new(AtomicU64::new(0)),
            positions_found: Arc::new(AtomicU64::new(0)),
            workers_spawned: Arc::new(AtomicU64::new(0)),
            workers_retired: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records a batch submission
    pub fn record_batch(&self, tasks: usize) {
        let total = self.batches_submitted.fetch_add(1, Ordering::Relaxed) + 1;
        debug!("Batch {} submitted with {} tasks", total, tasks);
    }

    /// Records a completed task and the number of positions it reported
    pub fn record_task(&self, positions: usize) {
        self.tasks_executed.fetch_add(1, Ordering::Relaxed);
        self.positions_found
            .fetch_add(positions as u64, Ordering::Relaxed);
    }

    /// Records a new worker thread
    pub fn record_worker_spawned(&self) {
        let total = self.workers_spawned.fetch_add(1, Ordering::Relaxed) + 1;
        debug!("Worker spawned, {} spawned so far", total);
    }

    /// Records a worker thread exiting after its keep-alive expired
    pub fn record_worker_retired(&self) {
        let total = self.workers_retired.fetch_add(1, Ordering::Relaxed) + 1;
        debug!("Worker retired, {} retired so far", total);
    }

    pub fn workers_spawned(&self) -> u64 {
        self.workers_spawned.load(Ordering::Relaxed)
    }

    pub fn workers_retired(&self) -> u64 {
        self.workers_retired.load(Ordering::Relaxed)
    }

    /// Gets current statistics
    pub fn get_stats(&self) -> TaskStats {
        TaskStats {
            batches_submitted: self.batches_submitted.load(Ordering::Relaxed),
            tasks_executed: self.tasks_executed.load(Ordering::Relaxed),
            positions_found: self.positions_found.load(Ordering::Relaxed),
            workers_spawned: self.workers_spawned.load(Ordering::Relaxed),
            workers_retired: self.workers_retired.load(Ordering::Relaxed),
        }
    }

    /// Logs current statistics
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Executor stats:\n\
             Batches submitted: {}\n\
             Tasks executed: {}\n\
             Positions found: {}\n\
             Workers spawned/retired: {}/{}",
            stats.batches_submitted,
            stats.tasks_executed,
            stats.positions_found,
            stats.workers_spawned,
            stats.workers_retired
        );
    }
}

impl Default for TaskMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of executor activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    pub batches_submitted: u64,
    pub tasks_executed: u64,
    pub positions_found: u64,
    pub workers_spawned: u64,
    pub workers_retired: u64,
}
