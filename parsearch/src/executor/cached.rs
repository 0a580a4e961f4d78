use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, trace};

use super::{ExecutionStrategy, Executor};
use crate::errors::{SearchError, SearchResult};
use crate::metrics::TaskMetrics;
use crate::search::SearchTask;

/// How long an idle worker waits for work before exiting
pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(60);

struct Job {
    task: SearchTask,
    reply: Sender<SearchResult<Vec<usize>>>,
}

/// State shared between the pool handle and its workers
struct Shared {
    jobs: Receiver<Job>,
    // Workers waiting for a job that no submission has claimed yet
    idle: AtomicUsize,
    keep_alive: Duration,
    metrics: TaskMetrics,
}

impl Shared {
    /// Takes one idle worker, if there is one
    fn claim_idle(&self) -> bool {
        self.idle
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }

    fn run(&self, job: Job) {
        let result = job.task.call();
        if let Ok(positions) = &result {
            self.metrics.record_task(positions.len());
        }
        // Become idle before replying so the next submission can reuse this worker
        self.idle.fetch_add(1, Ordering::AcqRel);
        let _ = job.reply.send(result);
    }

    fn work(&self, first: Job) {
        self.run(first);
        loop {
            match self.jobs.recv_timeout(self.keep_alive) {
                Ok(job) => self.run(job),
                Err(RecvTimeoutError::Timeout) => {
                    // If every idle worker has been claimed, a job is on its way to us
                    if self.claim_idle() {
                        self.metrics.record_worker_retired();
                        trace!("Idle worker retiring");
                        return;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }
    }
}

/// A pool that starts a new worker whenever no idle one is available.
///
/// There is no upper bound on the number of workers. Idle workers are reused
/// and exit after the keep-alive period passes without work.
pub struct CachedThreadPool {
    sender: Option<Sender<Job>>,
    shared: Arc<Shared>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    next_id: AtomicUsize,
}

impl CachedThreadPool {
    pub fn new() -> Self {
        Self::with_keep_alive(DEFAULT_KEEP_ALIVE)
    }

    pub fn with_keep_alive(keep_alive: Duration) -> Self {
        let (sender, jobs) = unbounded();
        Self {
            sender: Some(sender),
            shared: Arc::new(Shared {
                jobs,
                idle: AtomicUsize::new(0),
                keep_alive,
                metrics: TaskMetrics::new(),
            }),
            workers: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(0),
        }
    }

    /// Number of workers currently waiting for work
    pub fn idle_workers(&self) -> usize {
        self.shared.idle.load(Ordering::Acquire)
    }

    fn dispatch(&self, job: Job) -> SearchResult<()> {
        if self.shared.claim_idle() {
            let sender = self
                .sender
                .as_ref()
                .ok_or_else(|| SearchError::task_failure("pool is shut down"))?;
            return sender
                .send(job)
                .map_err(|_| SearchError::task_failure("pool is shut down"));
        }
        self.spawn_worker(job)
    }

    fn spawn_worker(&self, first: Job) -> SearchResult<()> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let shared = self.shared.clone();
        let handle = thread::Builder::new()
            .name(format!("parsearch-cached-{}", id))
            .spawn(move || shared.work(first))
            .map_err(|e| SearchError::task_failure(format!("failed to spawn worker: {}", e)))?;
        self.shared.metrics.record_worker_spawned();

        let mut workers = self.workers.lock().unwrap_or_else(PoisonError::into_inner);
        workers.retain(|w| !w.is_finished());
        workers.push(handle);
        Ok(())
    }
}

impl Default for CachedThreadPool {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for CachedThreadPool {
    fn strategy(&self) -> ExecutionStrategy {
        ExecutionStrategy::Cached
    }

    fn invoke_all(&self, tasks: &[SearchTask]) -> SearchResult<Vec<Vec<usize>>> {
        self.shared.metrics.record_batch(tasks.len());

        let mut replies = Vec::with_capacity(tasks.len());
        for task in tasks {
            let (reply, handle) = bounded(1);
            self.dispatch(Job {
                task: task.clone(),
                reply,
            })?;
            replies.push(handle);
        }

        // Wait for the whole batch before reporting any failure
        let results: Vec<SearchResult<Vec<usize>>> = replies
            .into_iter()
            .map(|handle| {
                handle.recv().unwrap_or_else(|_| {
                    Err(SearchError::task_failure(
                        "worker terminated before completing its task",
                    ))
                })
            })
            .collect();
        results.into_iter().collect()
    }

    fn metrics(&self) -> &TaskMetrics {
        &self.shared.metrics
    }
}

impl Drop for CachedThreadPool {
    fn drop(&mut self) {
        let idle = self.idle_workers();
        // Closing the queue wakes every waiting worker
        drop(self.sender.take());
        let workers = std::mem::take(
            self.workers
                .get_mut()
                .unwrap_or_else(PoisonError::into_inner),
        );
        debug!(
            "Shutting down cached pool with {} workers ({} idle)",
            workers.len(),
            idle
        );
        for worker in workers {
            let _ = worker.join();
        }
    }
}
