mod config;
mod policy;
mod rng;
mod simulator;
mod trace;

use crate::sim::{ErConfig, Stream, VariateSource};
use std::collections::{HashMap, VecDeque};

/// 确定性随机变量：指数/正态返回均值，均匀返回区间中点；可按流预置取值。
#[derive(Debug, Default)]
pub(crate) struct ScriptedVariates {
    scripted: HashMap<Stream, VecDeque<f64>>,
}

impl ScriptedVariates {
    pub(crate) fn with(mut self, stream: Stream, values: &[f64]) -> Self {
        self.scripted
            .entry(stream)
            .or_default()
            .extend(values.iter().copied());
        self
    }

    fn next(&mut self, stream: Stream) -> Option<f64> {
        self.scripted.get_mut(&stream).and_then(|q| q.pop_front())
    }
}

impl VariateSource for ScriptedVariates {
    fn exponential(&mut self, mean: f64, stream: Stream) -> f64 {
        self.next(stream).unwrap_or(mean)
    }

    fn normal(&mut self, mean: f64, _std_dev: f64, stream: Stream) -> f64 {
        self.next(stream).unwrap_or(mean)
    }

    fn uniform(&mut self, lo: f64, hi: f64, stream: Stream) -> f64 {
        self.next(stream).unwrap_or((lo + hi) / 2.0)
    }
}

/// 单资源场景：walk-in 每 1000 分钟一位，救护车几乎不来，所有容量为 1。
pub(crate) fn single_lane_config() -> ErConfig {
    ErConfig {
        walkin_rate: 0.001,
        ambulance_rate: 1e-6,
        mean_triage_duration: 5.0,
        mean_initial_assessment_duration: 10.0,
        mean_test_duration: 15.0,
        mean_follow_up_duration: 10.0,
        mean_hospital_stay: 100.0,
        mean_severity: 5.0,
        severity_std_dev: 2.0,
        duration_cv: 0.25,
        doctors: 1,
        nurses: 1,
        exam_rooms: 1,
        labs: 1,
        hospital_rooms: 1,
        max_patients: 1,
        admit_probability: 0.0,
        specialist_probability: 0.0,
        goal_patients: 1,
        seed: None,
    }
}

/// 容量足够大、不会溢出的配置
pub(crate) fn roomy_config(goal_patients: u64) -> ErConfig {
    ErConfig {
        doctors: 10_000,
        nurses: 10_000,
        exam_rooms: 10_000,
        labs: 10_000,
        hospital_rooms: 10_000,
        max_patients: 10_000,
        admit_probability: 0.2,
        specialist_probability: 0.3,
        goal_patients,
        ..ErConfig::default()
    }
}
