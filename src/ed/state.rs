//! 运行状态
//!
//! 一次运行的全部可变状态：资源池与流量计数器。由运行驱动持有，
//! 每个事件处理函数通过 `PatientFlow` 访问。

use super::pool::{PoolKind, ResourcePools};
use crate::sim::ErConfig;
use serde::{Deserialize, Serialize};

/// 流量计数器
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowCounters {
    /// 已离开系统的病人（随访直接离开或住院后出院）
    pub resolved: u64,
    pub walk_in_arrivals: u64,
    pub ambulance_arrivals: u64,
    pub triaged_urgent: u64,
    pub triaged_routine: u64,
    pub admissions: u64,
    pub specialist_referrals: u64,
    pub direct_exits: u64,
    pub hospital_discharges: u64,
    pub events_processed: u64,
}

impl FlowCounters {
    pub fn arrivals(&self) -> u64 {
        self.walk_in_arrivals + self.ambulance_arrivals
    }
}

#[derive(Debug, Clone)]
pub struct SimulationState {
    pub pools: ResourcePools,
    pub counters: FlowCounters,
    pub goal: u64,
}

impl SimulationState {
    pub fn new(cfg: &ErConfig) -> Self {
        Self {
            pools: ResourcePools::from_config(cfg),
            counters: FlowCounters::default(),
            goal: cfg.goal_patients,
        }
    }

    pub fn occupied(&self, kind: PoolKind) -> u32 {
        self.pools.get(kind).occupied()
    }

    pub fn goal_reached(&self) -> bool {
        self.counters.resolved >= self.goal
    }
}
