//! 运行结果统计

use super::pool::{PoolKind, ResourcePools};
use super::state::FlowCounters;
use crate::sim::SimTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolReport {
    pub pool: PoolKind,
    pub capacity: u32,
    /// 结束时仍被占用的数量
    pub occupied: u32,
    pub peak: u32,
    pub mean_occupancy: Option<f64>,
    /// 平均占用量 / 容量（0..=1）
    pub utilization: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub seed: Option<u64>,
    pub goal_patients: u64,
    pub end_time_minutes: f64,
    pub counters: FlowCounters,
    pub pools: Vec<PoolReport>,
}

impl RunReport {
    pub fn new(
        now: SimTime,
        seed: Option<u64>,
        goal_patients: u64,
        counters: &FlowCounters,
        pools: &ResourcePools,
    ) -> Self {
        let pools = pools
            .iter()
            .map(|p| PoolReport {
                pool: p.kind(),
                capacity: p.capacity(),
                occupied: p.occupied(),
                peak: p.peak(),
                mean_occupancy: p.time_average(now),
                utilization: p.utilization(now),
            })
            .collect();
        Self {
            seed,
            goal_patients,
            end_time_minutes: now.as_minutes(),
            counters: counters.clone(),
            pools,
        }
    }

    pub fn resolved_patients(&self) -> u64 {
        self.counters.resolved
    }

    pub fn pool(&self, kind: PoolKind) -> Option<&PoolReport> {
        self.pools.iter().find(|p| p.pool == kind)
    }
}
