//! 命令行边界层的共享代码
//!
//! 退出码约定、tracing 初始化、文本报告输出。二进制程序（`er_sim`、`er_sweep`）共用。

use crate::ed::{AMBULANCE_SEVERITY, MIN_DURATION, PoolKind, RunReport, SEVERITY_THRESHOLD, SimError};
use crate::sim::{ConfigError, ErConfig};
use clap::Parser;
use std::fmt::Display;
use std::io::{self, Write};
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

/// 报告文件名长度上限（含目录前缀与扩展名）
pub const FILENAME_LIMIT: usize = 50;

pub mod exit_code {
    use crate::ed::PoolKind;

    pub const USAGE: i32 = 1;
    pub const INVALID_INPUT: i32 = 2;
    pub const FILENAME_TOO_LONG: i32 = 3;
    pub const FILE_OPEN_CLOSE: i32 = 4;
    pub const FILE_WRITE: i32 = 5;
    pub const PROBABILITY: i32 = 12;
    pub const SCHEDULER_STARVATION: i32 = 13;

    pub fn capacity(pool: PoolKind) -> i32 {
        match pool {
            PoolKind::Patients => 6,
            PoolKind::Nurses => 7,
            PoolKind::Doctors => 8,
            PoolKind::ExamRooms => 9,
            PoolKind::Labs => 10,
            PoolKind::HospitalRooms => 11,
        }
    }
}

pub fn config_error_code(e: &ConfigError) -> i32 {
    if e.is_probability() {
        exit_code::PROBABILITY
    } else {
        exit_code::INVALID_INPUT
    }
}

pub fn sim_error_code(e: &SimError) -> i32 {
    match e {
        SimError::Configuration(c) => config_error_code(c),
        SimError::CapacityExceeded { pool, .. } => exit_code::capacity(*pool),
        SimError::SchedulerStarvation { .. } => exit_code::SCHEDULER_STARVATION,
    }
}

/// 解析命令行参数；用法错误以 `USAGE` 退出，`--help`/`--version` 以 0 退出。
pub fn parse_args<A: Parser>() -> A {
    match A::try_parse() {
        Ok(args) => args,
        Err(e) if !e.use_stderr() => {
            let _ = e.print();
            process::exit(0);
        }
        Err(e) => {
            let _ = e.print();
            process::exit(exit_code::USAGE);
        }
    }
}

/// 打印错误并以给定退出码结束进程
pub fn fail(code: i32, msg: impl Display) -> ! {
    eprintln!("{msg}");
    process::exit(code);
}

/// `name` 对应的报告文件名（`<name>.out`）是否超出长度上限。
/// 上限按 `out/<name>.out` 计算。
pub fn filename_too_long(name: &str) -> bool {
    name.len() + 8 >= FILENAME_LIMIT
}

/// 未指定种子时使用当前时间
pub fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();
}

/// 报告头：常量与输入参数（在运行前写出）
pub fn write_report_header<W: Write>(w: &mut W, cfg: &ErConfig, seed: u64) -> io::Result<()> {
    writeln!(w, "            Emergency Department Simulation")?;
    writeln!(w, "--------------------------------------------------------------\n")?;
    writeln!(w, "[CONSTANTS]\n")?;
    writeln!(w, "Ambulance severity multiplier:{:>20.6}\n", AMBULANCE_SEVERITY)?;
    writeln!(w, "Severity threshold:{:>20.3}\n", SEVERITY_THRESHOLD)?;
    writeln!(w, "Minimum duration of any process:{:>20.3} minutes\n\n", MIN_DURATION)?;

    writeln!(w, "[INPUT PARAMETERS]\n")?;
    writeln!(w, "Mean walk-in arrival rate:{:>20.3} patients per minute\n", cfg.walkin_rate)?;
    writeln!(w, "Mean ambulance arrival rate:{:>20.3} patients per minute\n", cfg.ambulance_rate)?;
    writeln!(w, "Mean triage duration:{:>20.3} minutes\n", cfg.mean_triage_duration)?;
    writeln!(
        w,
        "Mean initial assessment duration:{:>20.3} minutes\n",
        cfg.mean_initial_assessment_duration
    )?;
    writeln!(w, "Mean test duration:{:>20.3} minutes\n", cfg.mean_test_duration)?;
    writeln!(
        w,
        "Mean follow-up assessment duration:{:>20.3} minutes\n",
        cfg.mean_follow_up_duration
    )?;
    writeln!(w, "Mean hospital stay:{:>20.3} minutes\n", cfg.mean_hospital_stay)?;
    writeln!(w, "Mean patient severity:{:>20.3}\n", cfg.mean_severity)?;
    writeln!(w, "Number of doctors available:{:>20}\n", cfg.doctors)?;
    writeln!(w, "Number of nurses available:{:>20}\n", cfg.nurses)?;
    writeln!(w, "Number of exam rooms available:{:>20}\n", cfg.exam_rooms)?;
    writeln!(w, "Number of labs available:{:>20}\n", cfg.labs)?;
    writeln!(w, "Number of hospital rooms available:{:>20}\n", cfg.hospital_rooms)?;
    writeln!(w, "Maximum capacity of ER:{:>20}\n", cfg.max_patients)?;
    writeln!(w, "Admittance probability:{:>20.3}\n", cfg.admit_probability)?;
    writeln!(w, "Specialist probability:{:>20.3}\n", cfg.specialist_probability)?;
    writeln!(w, "Number of patients to simulate:{:>20}\n", cfg.goal_patients)?;
    writeln!(w, "Random seed:{:>20}\n\n", seed)?;
    Ok(())
}

fn utilization_label(pool: PoolKind) -> &'static str {
    match pool {
        PoolKind::Patients => "ER Capacity Utilization",
        PoolKind::Nurses => "Nurse Utilization",
        PoolKind::Doctors => "Doctor Utilization",
        PoolKind::ExamRooms => "Exam Room Utilization",
        PoolKind::Labs => "Lab Utilization",
        PoolKind::HospitalRooms => "Hospital Room Utilization",
    }
}

/// 报告尾：利用率与终止指标（运行成功后写出）
pub fn write_report_metrics<W: Write>(w: &mut W, report: &RunReport) -> io::Result<()> {
    writeln!(w, "[PERFORMANCE METRICS]\n")?;
    for p in &report.pools {
        let pct = p.utilization.unwrap_or(0.0) * 100.0;
        writeln!(w, "{}:{:>14.1}%\n", utilization_label(p.pool), pct)?;
    }
    let c = &report.counters;
    writeln!(w, "Patients triaged as urgent:{:>14}\n", c.triaged_urgent)?;
    writeln!(w, "Hospital admissions:{:>14}\n", c.admissions)?;
    writeln!(w, "Specialist referrals:{:>14}\n", c.specialist_referrals)?;

    writeln!(w, "\n[TERMINATION METRICS]\n")?;
    writeln!(w, "Time simulation ended:{:>21.3} minutes\n", report.end_time_minutes)?;
    writeln!(w, "Total patients simulated:{:>21} patients", c.resolved)?;
    Ok(())
}

/// 单行摘要（用于 stdout）
pub fn summary_line(report: &RunReport) -> String {
    let mut line = format!(
        "done @ {:.3} min, resolved={}, arrivals={}, events={}",
        report.end_time_minutes,
        report.resolved_patients(),
        report.counters.arrivals(),
        report.counters.events_processed
    );
    for p in &report.pools {
        let pct = p.utilization.unwrap_or(0.0) * 100.0;
        line.push_str(&format!(", {:?}={:.1}%", p.pool, pct));
    }
    line
}
