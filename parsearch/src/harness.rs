use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::buffer::TextBuffer;
use crate::config::BenchmarkConfig;
use crate::errors::{SearchError, SearchResult};
use crate::executor::{build_executor, Executor};
use crate::results::{BenchmarkReport, PhaseReport, RunOutcome};
use crate::search::{merge, partition, Partition, SearchTask};

/// Which variant a run belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Single,
    Multi,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Single => f.write_str("single task"),
            Phase::Multi => f.write_str("multi task"),
        }
    }
}

/// Progress of a benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BenchmarkState {
    Configured,
    Warmup,
    Measured,
    Verified,
    Reported,
}

/// Fails unless both position lists are identical
pub fn verify(single: &[usize], multi: &[usize]) -> SearchResult<()> {
    if single == multi {
        Ok(())
    } else {
        Err(SearchError::verification_mismatch(single, multi))
    }
}

/// Ratio of average single-task time to average multi-task time
pub fn speedup(single_avg: f64, multi_avg: f64) -> f64 {
    single_avg / multi_avg
}

/// Compares a single-task search with a partitioned one on a shared executor
pub struct Benchmark {
    config: BenchmarkConfig,
    text: Arc<TextBuffer>,
    pattern: Arc<[u8]>,
    executor: Box<dyn Executor>,
    single_task: SearchTask,
    multi_tasks: Vec<SearchTask>,
    state: BenchmarkState,
}

impl Benchmark {
    /// Validates the configuration and creates the configured executor
    pub fn new(config: BenchmarkConfig, text: Arc<TextBuffer>) -> SearchResult<Self> {
        config.validate(text.len())?;
        let executor = build_executor(config.strategy, config.thread_count)?;
        Self::assemble(config, text, executor)
    }

    /// Like [`Benchmark::new`] but runs on the given executor
    pub fn with_executor(
        config: BenchmarkConfig,
        text: Arc<TextBuffer>,
        executor: Box<dyn Executor>,
    ) -> SearchResult<Self> {
        config.validate(text.len())?;
        Self::assemble(config, text, executor)
    }

    /// Builds the tasks for an already validated configuration
    fn assemble(
        config: BenchmarkConfig,
        text: Arc<TextBuffer>,
        executor: Box<dyn Executor>,
    ) -> SearchResult<Self> {
        let pattern: Arc<[u8]> = Arc::from(config.pattern.as_bytes());
        let single_task = SearchTask::new(text.clone(), pattern.clone(), Partition::whole(text.len()));

        let mut benchmark = Self {
            config,
            text,
            pattern,
            executor,
            single_task,
            multi_tasks: Vec::new(),
            state: BenchmarkState::Configured,
        };
        benchmark.multi_tasks = benchmark.search_tasks(benchmark.config.task_count.get())?;
        debug!(
            "Benchmark configured: {} bytes, {} tasks, {} executor",
            benchmark.text.len(),
            benchmark.multi_tasks.len(),
            benchmark.executor.strategy()
        );
        Ok(benchmark)
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    pub fn state(&self) -> BenchmarkState {
        self.state
    }

    pub fn executor(&self) -> &dyn Executor {
        self.executor.as_ref()
    }

    /// Builds one task per partition of the text
    pub fn search_tasks(&self, task_count: usize) -> SearchResult<Vec<SearchTask>> {
        Ok(partition(self.text.len(), self.pattern.len(), task_count)?
            .into_iter()
            .map(|p| SearchTask::new(self.text.clone(), self.pattern.clone(), p))
            .collect())
    }

    /// Searches the whole text with one task
    pub fn run_single(&self) -> SearchResult<RunOutcome> {
        let start = Instant::now();
        let positions = self.executor.submit(&self.single_task)?;
        Ok(RunOutcome {
            positions,
            elapsed: start.elapsed(),
        })
    }

    /// Searches the text with the configured number of tasks and merges the results
    pub fn run_multi(&self) -> SearchResult<RunOutcome> {
        self.run_batch(&self.multi_tasks)
    }

    /// Runs a batch of partition tasks and merges their results
    pub fn run_batch(&self, tasks: &[SearchTask]) -> SearchResult<RunOutcome> {
        let start = Instant::now();
        let results = self.executor.invoke_all(tasks)?;
        let positions = merge(results)?;
        Ok(RunOutcome {
            positions,
            elapsed: start.elapsed(),
        })
    }

    /// Runs the whole benchmark without observing individual runs
    pub fn run(&mut self) -> SearchResult<BenchmarkReport> {
        self.run_with(|_, _, _| {})
    }

    /// Runs warmups, measured runs, verification and reporting.
    ///
    /// `on_run` is called after every measured run with its phase, run number
    /// and outcome. A verification mismatch is logged and recorded in the
    /// report; any other error stops the benchmark.
    pub fn run_with<F>(&mut self, mut on_run: F) -> SearchResult<BenchmarkReport>
    where
        F: FnMut(Phase, usize, &RunOutcome),
    {
        info!(
            "Starting benchmark: pattern {:?}, {} tasks, {} threads, {} executor",
            self.config.pattern,
            self.config.task_count,
            self.config.thread_count,
            self.executor.strategy()
        );

        self.advance(BenchmarkState::Warmup);
        for i in 0..self.config.warmups {
            debug!("Warmup {}", i);
            self.run_single()?;
            self.run_multi()?;
        }

        self.advance(BenchmarkState::Measured);
        let mut consistent = true;
        let single = self.measure(Phase::Single, &mut on_run, &mut consistent)?;
        let multi = self.measure(Phase::Multi, &mut on_run, &mut consistent)?;

        self.advance(BenchmarkState::Verified);
        let mismatch = match verify(&single.positions, &multi.positions) {
            Ok(()) => None,
            Err(e) if !e.is_fatal() => {
                warn!("{}", e);
                Some(e.to_string())
            }
            Err(e) => return Err(e),
        };

        let single_avg_secs = single.average_secs();
        let multi_avg_secs = multi.average_secs();
        let report = BenchmarkReport {
            strategy: self.executor.strategy(),
            text_len: self.text.len(),
            task_count: self.config.task_count.get(),
            thread_count: self.config.thread_count.get(),
            single_avg_secs,
            multi_avg_secs,
            speedup: speedup(single_avg_secs, multi_avg_secs),
            verified: consistent && mismatch.is_none(),
            mismatch,
            single,
            multi,
        };

        self.advance(BenchmarkState::Reported);
        self.executor.metrics().log_stats();
        info!(
            "Benchmark complete. {} matches, speedup {:.2}",
            report.multi.positions.len(),
            report.speedup
        );
        Ok(report)
    }

    fn measure<F>(
        &self,
        phase: Phase,
        on_run: &mut F,
        consistent: &mut bool,
    ) -> SearchResult<PhaseReport>
    where
        F: FnMut(Phase, usize, &RunOutcome),
    {
        let mut report = PhaseReport::default();
        for run in 0..self.config.runs.get() {
            let outcome = match phase {
                Phase::Single => self.run_single()?,
                Phase::Multi => self.run_multi()?,
            };
            on_run(phase, run, &outcome);

            // Repeated runs over unchanged input must agree
            if run > 0 && outcome.positions != report.positions {
                warn!("{} run {} differs from the previous run", phase, run);
                *consistent = false;
            }
            report.add_run(outcome);
        }
        Ok(report)
    }

    fn advance(&mut self, next: BenchmarkState) {
        debug!("Benchmark state {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
