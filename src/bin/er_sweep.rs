//! 批量运行
//!
//! 输入文件每行一次运行（空白分隔的 `key=value` 覆盖项，`#` 开头为注释）。
//! 每次运行使用独立的内核与随机数流，互不共享可变状态；
//! 最多 `--jobs` 个工作线程轮流领取运行。

use clap::Parser;
use edsim_rs::cli::{self, exit_code};
use edsim_rs::ed::{RunReport, SimError, run_with_seed};
use edsim_rs::sim::ErConfig;
use std::fs;
use std::num::NonZeroUsize;
use std::panic;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "er-sweep",
    about = "Run a batch of isolated emergency department simulations"
)]
struct Args {
    /// Input file: one run per line of key=value overrides
    #[arg(long)]
    input: PathBuf,

    /// Base JSON configuration the overrides apply to
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for runs that do not set one; run i uses seed + i
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Print one JSON report per line instead of summaries
    #[arg(long)]
    json: bool,

    /// Worker threads (defaults to the available parallelism)
    #[arg(long)]
    jobs: Option<NonZeroUsize>,
}

fn load_runs(args: &Args) -> Result<Vec<(usize, ErConfig)>, String> {
    let base = match &args.config {
        Some(path) => ErConfig::from_json_file(path).map_err(|e| e.to_string())?,
        None => ErConfig::default(),
    };
    let raw = fs::read_to_string(&args.input)
        .map_err(|e| format!("read {}: {e}", args.input.display()))?;

    let mut runs = Vec::new();
    for (lineno, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let overrides = ErConfig::parse_override_line(line)
            .map_err(|e| format!("line {}: {e}", lineno + 1))?;
        let cfg = base
            .with_overrides(&overrides)
            .map_err(|e| format!("line {}: {e}", lineno + 1))?;
        runs.push((lineno + 1, cfg));
    }
    Ok(runs)
}

type RunResult = (usize, Result<RunReport, SimError>);

/// 按输入顺序返回 `(行号, 结果)`；运行 i 未指定种子时使用 `base_seed + i`。
fn run_all(runs: &[(usize, ErConfig)], base_seed: u64, jobs: usize) -> Vec<RunResult> {
    let next = AtomicUsize::new(0);
    let next = &next;
    let mut done: Vec<(usize, RunResult)> = thread::scope(|s| {
        let workers: Vec<_> = (0..jobs)
            .map(|_| {
                s.spawn(move || {
                    let mut finished = Vec::new();
                    loop {
                        let i = next.fetch_add(1, Ordering::Relaxed);
                        let Some((line, cfg)) = runs.get(i) else {
                            break;
                        };
                        let seed = cfg.seed.unwrap_or(base_seed.wrapping_add(i as u64));
                        finished.push((i, (*line, run_with_seed(cfg.clone(), seed))));
                    }
                    finished
                })
            })
            .collect();
        workers
            .into_iter()
            .flat_map(|w| match w.join() {
                Ok(finished) => finished,
                Err(payload) => panic::resume_unwind(payload),
            })
            .collect()
    });
    done.sort_by_key(|(i, _)| *i);
    done.into_iter().map(|(_, result)| result).collect()
}

fn main() {
    cli::init_tracing();
    let args: Args = cli::parse_args();

    let runs = load_runs(&args)
        .unwrap_or_else(|e| cli::fail(exit_code::INVALID_INPUT, format!("INPUT ERROR: {e}")));
    let jobs = args
        .jobs
        .or_else(|| thread::available_parallelism().ok())
        .map_or(1, NonZeroUsize::get)
        .min(runs.len().max(1));
    info!(runs = runs.len(), jobs, "starting sweep");

    let results = run_all(&runs, args.seed, jobs);

    let mut first_failure = None;
    for (line, result) in &results {
        match result {
            Ok(report) if args.json => {
                let json = serde_json::to_string(report).unwrap_or_else(|e| {
                    cli::fail(exit_code::FILE_WRITE, format!("serialize report: {e}"))
                });
                println!("{json}");
            }
            Ok(report) => println!("line {line}: {}", cli::summary_line(report)),
            Err(e) => {
                println!("line {line}: error: {e}");
                first_failure.get_or_insert(cli::sim_error_code(e));
            }
        }
    }

    if let Some(code) = first_failure {
        process::exit(code);
    }
}
