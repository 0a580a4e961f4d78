use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use parsearch::{
    Benchmark, BenchmarkConfig, BenchmarkReport, ConfigOverrides, ExecutionStrategy, Phase,
    RunOutcome, TextBuffer,
};
use std::fs::OpenOptions;
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Compare a single-task substring search against a partitioned, concurrent one
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Text file to search
    file: PathBuf,

    /// Pattern to search for
    pattern: String,

    /// Number of tasks the text is split into
    ntasks: Option<NonZeroUsize>,

    /// Number of threads in the fixed pool
    nthreads: Option<NonZeroUsize>,

    /// Print found positions
    #[arg(short = 'P', long)]
    print_positions: bool,

    /// Number of warmup searches
    #[arg(short = 'W', long)]
    warmups: Option<usize>,

    /// Number of measured searches
    #[arg(short = 'R', long)]
    runs: Option<NonZeroUsize>,

    /// Append a summary line to this file
    #[arg(short = 'd', long)]
    datafile: Option<PathBuf>,

    /// Executor kind (single|cached|fixed)
    #[arg(short = 'E', long)]
    executor: Option<String>,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of bytes read from the file
    #[arg(long)]
    capacity: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'v', long)]
    log_level: Option<String>,
}

impl Cli {
    fn to_overrides(&self) -> Result<ConfigOverrides> {
        let strategy = self
            .executor
            .as_deref()
            .map(str::parse::<ExecutionStrategy>)
            .transpose()?;

        Ok(ConfigOverrides {
            pattern: Some(self.pattern.clone()),
            task_count: self.ntasks,
            thread_count: self.nthreads,
            warmups: self.warmups,
            runs: self.runs,
            strategy,
            capacity: self.capacity,
            print_positions: self.print_positions,
            data_file: self.datafile.clone(),
            log_level: self.log_level.clone(),
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = BenchmarkConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?
        .merge_with_cli(cli.to_overrides()?);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let text = TextBuffer::load(&cli.file, config.capacity)
        .with_context(|| format!("failed to read {}", cli.file.display()))?;
    if text.is_truncated() {
        eprintln!(
            "\n{} file truncated to {} characters\n",
            "Warning:".yellow(),
            text.capacity()
        );
    }
    let text = Arc::new(text);

    if !cli.json {
        print_header(&cli.file, &text, &config);
    }

    let print_positions = config.print_positions;
    let task_count = config.task_count;
    let data_file = config.data_file.clone();
    let mut benchmark = Benchmark::new(config, text)?;

    let report = if cli.json {
        benchmark.run()?
    } else {
        benchmark.run_with(|phase, run, outcome| {
            print_run(phase, run, task_count, outcome, print_positions)
        })?
    };

    if cli.json {
        print_json(report.clone(), print_positions)?;
    } else {
        print_summary(&report);
    }

    if let Some(path) = data_file {
        append_data(&path, &report)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    Ok(())
}

fn print_header(file: &Path, text: &TextBuffer, config: &BenchmarkConfig) {
    println!(
        "\nFile={}, length={}, pattern='{}'",
        file.display(),
        text.len(),
        config.pattern
    );
    println!(
        "ntasks={}, nthreads={}, warmups={}, runs={}",
        config.task_count, config.thread_count, config.warmups, config.runs
    );
    println!("executor: {}", config.strategy);
}

fn print_run(
    phase: Phase,
    run: usize,
    task_count: NonZeroUsize,
    outcome: &RunOutcome,
    print_positions: bool,
) {
    let label = match phase {
        Phase::Single => "Single task".to_string(),
        Phase::Multi => format!("Using {:2} tasks", task_count),
    };
    print!(
        "\n{}: Run no. {:2}: {} occurrences found in ",
        label,
        run,
        outcome.positions.len()
    );
    if print_positions {
        println!();
        print!("{}", format_positions(&outcome.positions));
    }
    println!("{:1.6} s", outcome.elapsed.as_secs_f64());
}

/// Formats positions ten to a line, each right-aligned in seven columns
fn format_positions(positions: &[usize]) -> String {
    let mut out = String::new();
    for chunk in positions.chunks(10) {
        for pos in chunk {
            out.push_str(&format!(" {:6}", pos));
        }
        out.push('\n');
    }
    out
}

fn print_summary(report: &BenchmarkReport) {
    println!("\nSingle task (avg.): {:1.6} s", report.single_avg_secs);
    println!(
        "Using {:2} tasks (avg.): {:1.6} s",
        report.task_count, report.multi_avg_secs
    );

    if !report.verified {
        println!("\n{}", "ERROR: lists differ".red().bold());
        if let Some(mismatch) = &report.mismatch {
            println!("{}", mismatch.red());
        }
    }

    println!(
        "\nAverage speedup: {}\n",
        format!("{:1.2}", report.speedup).green()
    );
}

fn print_json(mut report: BenchmarkReport, print_positions: bool) -> Result<()> {
    if !print_positions {
        report.single.positions.clear();
        report.multi.positions.clear();
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// One line per invocation, for plotting speedup over many runs
fn data_line(report: &BenchmarkReport) -> String {
    format!(
        "{} {} {} {} {:.6} {:.6} {:.2}",
        report.text_len,
        report.task_count,
        report.thread_count,
        report.strategy,
        report.single_avg_secs,
        report.multi_avg_secs,
        report.speedup
    )
}

fn append_data(path: &Path, report: &BenchmarkReport) -> std::io::Result<()> {
    debug!("Appending summary to {}", path.display());
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", data_line(report))
}
