//! 运行驱动
//!
//! 从内核取最早的事件并分发给状态机，直到已离开系统的病人数达到目标。
//! 终止条件是严格小于：`resolved == goal` 的那个事件处理完后立即停止。

use super::error::SimError;
use super::event::PatientEvent;
use super::flow::PatientFlow;
use super::stats::RunReport;
use crate::sim::{ErConfig, SimTime, Simulator, StreamVariates, VariateSource};
use crate::trace::TraceLogger;
use tracing::{error, info};

pub struct RunDriver {
    sim: Simulator<PatientEvent>,
    flow: PatientFlow,
    seed: Option<u64>,
    started: bool,
}

impl RunDriver {
    /// 使用给定的随机变量来源构建一次运行
    pub fn new(config: ErConfig, variates: Box<dyn VariateSource>) -> Result<Self, SimError> {
        Ok(Self {
            sim: Simulator::default(),
            flow: PatientFlow::new(config, variates)?,
            seed: None,
            started: false,
        })
    }

    /// 使用 `StdRng` 多流实现；每次运行各自独立的内核与随机数流。
    pub fn with_seed(config: ErConfig, seed: u64) -> Result<Self, SimError> {
        let mut driver = Self::new(config, Box::new(StreamVariates::new(seed)))?;
        driver.seed = Some(seed);
        Ok(driver)
    }

    pub fn enable_trace(&mut self) {
        self.flow.enable_trace(self.seed);
    }

    pub fn take_trace(&mut self) -> Option<TraceLogger> {
        self.flow.take_trace()
    }

    pub fn flow(&self) -> &PatientFlow {
        &self.flow
    }

    pub fn now(&self) -> SimTime {
        self.sim.now()
    }

    pub fn pending_events(&self) -> usize {
        self.sim.len()
    }

    /// 调度第一次到达；重复调用无效果
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.flow.schedule_first_arrivals(&mut self.sim);
    }

    /// 处理一个事件。队列为空时返回 `SchedulerStarvation`。
    pub fn step(&mut self) -> Result<(), SimError> {
        let Some((_at, ev)) = self.sim.pop_next() else {
            let counters = &self.flow.state().counters;
            return Err(SimError::SchedulerStarvation {
                resolved: counters.resolved,
                goal: self.flow.state().goal,
            });
        };
        self.flow.dispatch(&mut self.sim, ev)
    }

    pub fn run(&mut self) -> Result<RunReport, SimError> {
        self.start();
        self.run_to_goal()
    }

    #[tracing::instrument(skip(self), fields(seed = ?self.seed, goal = self.flow.state().goal))]
    pub fn run_to_goal(&mut self) -> Result<RunReport, SimError> {
        info!(queue_size = self.pending_events(), "▶️  开始运行仿真");

        while !self.flow.state().goal_reached() {
            if let Err(e) = self.step() {
                error!(now = ?self.sim.now(), error = %e, "仿真中止");
                return Err(e);
            }
        }

        let report = self.report();
        info!(
            total_events = report.counters.events_processed,
            resolved = report.resolved_patients(),
            pending = self.pending_events(),
            end_minutes = report.end_time_minutes,
            "✅ 仿真完成"
        );
        Ok(report)
    }

    pub fn report(&self) -> RunReport {
        let state = self.flow.state();
        RunReport::new(
            self.sim.now(),
            self.seed,
            state.goal,
            &state.counters,
            &state.pools,
        )
    }
}

/// 用给定种子完成一次运行
pub fn run_with_seed(config: ErConfig, seed: u64) -> Result<RunReport, SimError> {
    RunDriver::with_seed(config, seed)?.run()
}
