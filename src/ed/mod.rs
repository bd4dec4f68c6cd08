//! 急诊科病人流模型
//!
//! 此模块包含资源池、事件、严重度与分流策略、病人流状态机和运行驱动。

// 子模块声明
mod driver;
mod error;
mod event;
mod flow;
mod policy;
mod pool;
mod state;
mod stats;

// 重新导出公共接口
pub use driver::{RunDriver, run_with_seed};
pub use error::SimError;
pub use event::{ArrivalChannel, EventKind, PatientEvent};
pub use flow::{HANDLERS, Handler, PatientFlow};
pub use policy::{
    AMBULANCE_SEVERITY, FollowUpOutcome, MIN_DURATION, RoutingPolicy, SEVERITY_THRESHOLD, Urgency,
    effective_severity, floor_duration,
};
pub use pool::{PoolKind, ResourcePool, ResourcePools};
pub use state::{FlowCounters, SimulationState};
pub use stats::{PoolReport, RunReport};
