use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::buffer::DEFAULT_CAPACITY;
use crate::errors::{SearchError, SearchResult};
use crate::executor::ExecutionStrategy;

/// Configuration for one benchmark.
///
/// Built once, validated against the loaded text, and handed to the
/// [`Benchmark`](crate::harness::Benchmark) by value. Nothing in the search path
/// reads configuration from anywhere else.
///
/// # Configuration Locations
///
/// Values are read from these files, later ones taking precedence:
/// 1. Global `$HOME/.config/parsearch/config.yaml`
/// 2. Local `.parsearch.yaml` in the current directory
/// 3. Custom config file specified via `--config`
///
/// Command-line arguments override all of them (see [`BenchmarkConfig::merge_with_cli`]).
///
/// # Configuration Format
///
/// ```yaml
/// pattern: "needle"
/// task_count: 8
/// thread_count: 4
/// warmups: 2
/// runs: 5
/// strategy: fixed   # single | cached | fixed
/// capacity: 10000000
/// print_positions: false
/// data_file: "results.dat"
/// log_level: "info"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// The exact byte sequence to search for
    #[serde(default)]
    pub pattern: String,

    /// Number of partitions the multi-task search splits the text into
    #[serde(default = "default_count")]
    pub task_count: NonZeroUsize,

    /// Number of workers in the fixed pool
    /// Defaults to number of CPU cores if not specified
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Untimed searches run before measuring
    #[serde(default)]
    pub warmups: usize,

    /// Timed searches per variant
    #[serde(default = "default_count")]
    pub runs: NonZeroUsize,

    /// Thread pool used for both variants
    #[serde(default)]
    pub strategy: ExecutionStrategy,

    /// Maximum number of bytes loaded from the input
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Print every position found
    #[serde(default)]
    pub print_positions: bool,

    /// File to append a one-line summary to
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Values given on the command line; `None` leaves the configured value alone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub pattern: Option<String>,
    pub task_count: Option<NonZeroUsize>,
    pub thread_count: Option<NonZeroUsize>,
    pub warmups: Option<usize>,
    pub runs: Option<NonZeroUsize>,
    pub strategy: Option<ExecutionStrategy>,
    pub capacity: Option<usize>,
    pub print_positions: bool,
    pub data_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

fn default_count() -> NonZeroUsize {
    NonZeroUsize::MIN
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            task_count: default_count(),
            thread_count: default_thread_count(),
            warmups: 0,
            runs: default_count(),
            strategy: ExecutionStrategy::default(),
            capacity: default_capacity(),
            print_positions: false,
            data_file: None,
            log_level: default_log_level(),
        }
    }
}

impl BenchmarkConfig {
    /// Creates a configuration with defaults for everything but the pattern
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Self::default()
        }
    }

    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration from a specific file
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let config_files = [
            dirs::config_dir().map(|p| p.join("parsearch/config.yaml")),
            Some(PathBuf::from(".parsearch.yaml")),
            config_path.map(PathBuf::from),
        ];

        for path in config_files.iter().flatten() {
            // An explicitly named file must exist
            if path.exists() || Some(path.as_path()) == config_path {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values.
    ///
    /// Every value given on the command line wins, even when it equals the
    /// built-in default.
    pub fn merge_with_cli(mut self, cli: ConfigOverrides) -> Self {
        if let Some(pattern) = cli.pattern {
            self.pattern = pattern;
        }
        if let Some(task_count) = cli.task_count {
            self.task_count = task_count;
        }
        if let Some(thread_count) = cli.thread_count {
            self.thread_count = thread_count;
        }
        if let Some(warmups) = cli.warmups {
            self.warmups = warmups;
        }
        if let Some(runs) = cli.runs {
            self.runs = runs;
        }
        if let Some(strategy) = cli.strategy {
            self.strategy = strategy;
        }
        if let Some(capacity) = cli.capacity {
            self.capacity = capacity;
        }
        if cli.print_positions {
            self.print_positions = true;
        }
        if cli.data_file.is_some() {
            self.data_file = cli.data_file;
        }
        if let Some(log_level) = cli.log_level {
            self.log_level = log_level;
        }
        self
    }

    /// Checks the configuration against a text of length `len`
    pub fn validate(&self, len: usize) -> SearchResult<()> {
        if self.pattern.is_empty() {
            return Err(SearchError::invalid_configuration("pattern is empty"));
        }
        if self.pattern.len() > len {
            return Err(SearchError::invalid_configuration(format!(
                "pattern of length {} is longer than text of length {}",
                self.pattern.len(),
                len
            )));
        }
        if self.task_count.get() > len {
            return Err(SearchError::invalid_configuration(format!(
                "{} tasks requested for text of length {}",
                self.task_count, len
            )));
        }
        if self.capacity == 0 {
            return Err(SearchError::invalid_configuration(
                "buffer capacity must be positive",
            ));
        }
        Ok(())
    }
}
