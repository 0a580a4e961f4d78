/// Timing and result records produced by a benchmark.
///
/// Everything here is plain owned data: the harness builds it, hands it to the
/// caller, and never touches it again.
use serde::Serialize;
use std::time::Duration;

use crate::executor::ExecutionStrategy;

/// Positions found by one search, together with how long it took
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// Match start offsets, ascending and unique
    pub positions: Vec<usize>,
    /// Wall-clock time from submission to merged result
    pub elapsed: Duration,
}

/// One measured run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRecord {
    pub run: usize,
    pub matches: usize,
    pub elapsed_secs: f64,
}

/// All measured runs of one variant
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhaseReport {
    pub runs: Vec<RunRecord>,
    /// Positions from the last measured run
    pub positions: Vec<usize>,
}

impl PhaseReport {
    /// Records a run, keeping its positions as the latest result
    pub fn add_run(&mut self, outcome: RunOutcome) {
        self.runs.push(RunRecord {
            run: self.runs.len(),
            matches: outcome.positions.len(),
            elapsed_secs: outcome.elapsed.as_secs_f64(),
        });
        self.positions = outcome.positions;
    }

    /// Mean elapsed time in seconds, or zero before any run
    pub fn average_secs(&self) -> f64 {
        if self.runs.is_empty() {
            return 0.0;
        }
        self.runs.iter().map(|r| r.elapsed_secs).sum::<f64>() / self.runs.len() as f64
    }
}

/// The complete outcome of a benchmark
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkReport {
    pub strategy: ExecutionStrategy,
    pub text_len: usize,
    pub task_count: usize,
    pub thread_count: usize,
    pub single: PhaseReport,
    pub multi: PhaseReport,
    pub single_avg_secs: f64,
    pub multi_avg_secs: f64,
    pub speedup: f64,
    /// Whether the multi-task result equalled the single-task result
    pub verified: bool,
    /// Description of the first mismatch, when not verified
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mismatch: Option<String>,
}
