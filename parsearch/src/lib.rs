pub mod buffer;
pub mod config;
pub mod errors;
pub mod executor;
pub mod harness;
pub mod metrics;
pub mod results;
pub mod search;

pub use buffer::TextBuffer;
pub use config::{BenchmarkConfig, ConfigOverrides};
pub use errors::{SearchError, SearchResult};
pub use executor::{build_executor, ExecutionStrategy, Executor};
pub use harness::{speedup, verify, Benchmark, BenchmarkState, Phase};
pub use results::{BenchmarkReport, PhaseReport, RunOutcome, RunRecord};
