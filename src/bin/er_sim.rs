//! 急诊科病人流仿真
//!
//! 单次运行：读取配置（JSON 文件 + 命令行覆盖），运行到目标病人数，输出报告。

use clap::Parser;
use edsim_rs::cli::{self, exit_code};
use edsim_rs::ed::RunDriver;
use edsim_rs::sim::{ConfigLoadError, ErConfig};
use serde::Serialize;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(
    name = "er-sim",
    about = "Emergency department patient-flow discrete-event simulation"
)]
struct Args {
    /// JSON run configuration; the flags below override individual fields
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: ConfigOverrides,

    /// Report name; the report is written to <out-dir>/<name>.out
    #[arg(long)]
    out: Option<String>,

    #[arg(long, default_value = "out")]
    out_dir: PathBuf,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Output trace JSON file
    #[arg(long)]
    trace_json: Option<PathBuf>,
}

/// 逐字段覆盖配置；取值由 `ErConfig::with_overrides` 统一解析与校验类型。
#[derive(Debug, clap::Args, Serialize)]
struct ConfigOverrides {
    /// Walk-in arrivals per minute
    #[arg(long, value_name = "RATE")]
    walkin_rate: Option<String>,
    /// Ambulance arrivals per minute
    #[arg(long, value_name = "RATE")]
    ambulance_rate: Option<String>,
    #[arg(long, value_name = "MINUTES")]
    mean_triage_duration: Option<String>,
    #[arg(long, value_name = "MINUTES")]
    mean_initial_assessment_duration: Option<String>,
    #[arg(long, value_name = "MINUTES")]
    mean_test_duration: Option<String>,
    #[arg(long, value_name = "MINUTES")]
    mean_follow_up_duration: Option<String>,
    #[arg(long, value_name = "MINUTES")]
    mean_hospital_stay: Option<String>,
    #[arg(long)]
    mean_severity: Option<String>,
    #[arg(long)]
    severity_std_dev: Option<String>,
    /// Coefficient of variation of service durations
    #[arg(long)]
    duration_cv: Option<String>,
    #[arg(long, value_name = "N")]
    doctors: Option<String>,
    #[arg(long, value_name = "N")]
    nurses: Option<String>,
    #[arg(long, value_name = "N")]
    exam_rooms: Option<String>,
    #[arg(long, value_name = "N")]
    labs: Option<String>,
    #[arg(long, value_name = "N")]
    hospital_rooms: Option<String>,
    /// Capacity of the active-patient pool
    #[arg(long, value_name = "N")]
    max_patients: Option<String>,
    #[arg(long, value_name = "P")]
    admit_probability: Option<String>,
    #[arg(long, value_name = "P")]
    specialist_probability: Option<String>,
    /// Number of patients to resolve before stopping
    #[arg(long, value_name = "N")]
    goal_patients: Option<String>,
    /// Random seed (defaults to the wall clock)
    #[arg(long)]
    seed: Option<String>,
}

impl ConfigOverrides {
    /// 已给出的 `(字段名, 原始取值)`
    fn pairs(&self) -> Result<Vec<(String, String)>, ConfigLoadError> {
        let Value::Object(fields) = serde_json::to_value(self)? else {
            unreachable!("overrides serialize to an object");
        };
        Ok(fields
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(raw) => Some((key, raw)),
                _ => None,
            })
            .collect())
    }
}

fn main() {
    cli::init_tracing();

    let args: Args = cli::parse_args();

    let base = match &args.config {
        Some(path) => ErConfig::from_json_file(path),
        None => Ok(ErConfig::default()),
    };
    let cfg = base
        .and_then(|base| base.with_overrides(&args.overrides.pairs()?))
        .unwrap_or_else(|e| cli::fail(exit_code::INVALID_INPUT, format!("INPUT ERROR: {e}")));
    if let Err(e) = cfg.validate() {
        cli::fail(cli::config_error_code(&e), format!("INPUT ERROR: {e}"));
    }

    let seed = cfg.seed.unwrap_or_else(cli::clock_seed);
    info!(seed, goal = cfg.goal_patients, "run configuration loaded");

    let mut report_file = match &args.out {
        Some(name) => {
            if cli::filename_too_long(name) {
                cli::fail(exit_code::FILENAME_TOO_LONG, "FILENAME ERROR: Filename Too Long");
            }
            let path = args.out_dir.join(format!("{name}.out"));
            let file = fs::create_dir_all(&args.out_dir)
                .and_then(|_| File::create(&path))
                .unwrap_or_else(|e| {
                    cli::fail(
                        exit_code::FILE_OPEN_CLOSE,
                        format!("FILE ERROR: Output File \"{}\" Cannot Be Opened: {e}", path.display()),
                    )
                });
            let mut w = BufWriter::new(file);
            if let Err(e) = cli::write_report_header(&mut w, &cfg, seed) {
                cli::fail(
                    exit_code::FILE_WRITE,
                    format!("FILE ERROR: Output File \"{}\" Cannot Be Written To: {e}", path.display()),
                );
            }
            Some((path, w))
        }
        None => None,
    };

    let mut driver = RunDriver::with_seed(cfg, seed)
        .unwrap_or_else(|e| cli::fail(cli::sim_error_code(&e), format!("INPUT ERROR: {e}")));
    if args.trace_json.is_some() {
        driver.enable_trace();
    }

    let result = driver.run();

    if let Some(path) = &args.trace_json {
        if let Some(trace) = driver.take_trace() {
            let json = trace.to_json().unwrap_or_else(|e| {
                cli::fail(exit_code::FILE_WRITE, format!("FILE ERROR: serialize trace: {e}"))
            });
            if let Err(e) = fs::write(path, json) {
                cli::fail(
                    exit_code::FILE_OPEN_CLOSE,
                    format!("FILE ERROR: Trace File \"{}\" Cannot Be Written: {e}", path.display()),
                );
            }
            eprintln!("wrote trace events to {}", path.display());
        }
    }

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "simulation aborted");
            // 与报告文件一起关闭；关闭失败不改变退出码
            if let Some((path, mut w)) = report_file.take() {
                if w.flush().is_err() {
                    eprintln!("FILE ERROR: Output File \"{}\" Cannot Be Closed", path.display());
                }
            }
            cli::fail(cli::sim_error_code(&e), format!("SIMULATION ERROR: {e}"));
        }
    };

    if let Some((path, mut w)) = report_file {
        if let Err(e) = cli::write_report_metrics(&mut w, &report) {
            cli::fail(
                exit_code::FILE_WRITE,
                format!("FILE ERROR: Output File \"{}\" Cannot Be Written To: {e}", path.display()),
            );
        }
        if let Err(e) = w.flush() {
            cli::fail(
                exit_code::FILE_OPEN_CLOSE,
                format!("FILE ERROR: Output File \"{}\" Cannot Be Closed: {e}", path.display()),
            );
        }
    }

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .unwrap_or_else(|e| cli::fail(exit_code::FILE_WRITE, format!("serialize report: {e}")));
        println!("{json}");
    } else {
        println!("{}", cli::summary_line(&report));
    }
}
