//! 资源池
//!
//! 每类稀缺资源（病人位、护士、医生、检查室、化验室、病房）是一个带容量上限的计数集合，
//! 并累积按时间加权的占用量，用于计算利用率。

use super::error::SimError;
use crate::sim::{ErConfig, SimTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// 资源池种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    Patients,
    Nurses,
    Doctors,
    ExamRooms,
    Labs,
    HospitalRooms,
}

impl PoolKind {
    pub const COUNT: usize = 6;
    pub const ALL: [PoolKind; PoolKind::COUNT] = [
        PoolKind::Patients,
        PoolKind::Nurses,
        PoolKind::Doctors,
        PoolKind::ExamRooms,
        PoolKind::Labs,
        PoolKind::HospitalRooms,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PoolKind::Patients => "patients",
            PoolKind::Nurses => "nurses",
            PoolKind::Doctors => "doctors",
            PoolKind::ExamRooms => "exam rooms",
            PoolKind::Labs => "labs",
            PoolKind::HospitalRooms => "hospital rooms",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 单个资源池：占用量始终在 `[0, capacity]` 内。
#[derive(Debug, Clone)]
pub struct ResourcePool {
    kind: PoolKind,
    capacity: u32,
    occupied: u32,
    peak: u32,
    // 占用量对时间（微秒）的积分，截至 `last_change`
    area: u128,
    last_change: SimTime,
}

impl ResourcePool {
    pub fn new(kind: PoolKind, capacity: u32) -> Self {
        Self {
            kind,
            capacity,
            occupied: 0,
            peak: 0,
            area: 0,
            last_change: SimTime::ZERO,
        }
    }

    pub fn kind(&self) -> PoolKind {
        self.kind
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn occupied(&self) -> u32 {
        self.occupied
    }

    pub fn peak(&self) -> u32 {
        self.peak
    }

    fn accumulate(&mut self, now: SimTime) {
        let dt = now.saturating_sub(self.last_change).0;
        self.area = self
            .area
            .saturating_add(u128::from(self.occupied) * u128::from(dt));
        self.last_change = self.last_change.max(now);
    }

    /// 还能否再占用一个单位
    pub fn ensure_room(&self) -> Result<(), SimError> {
        if self.occupied >= self.capacity {
            return Err(SimError::CapacityExceeded {
                pool: self.kind,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// 占用一个单位。容量已满时返回 `CapacityExceeded`，占用量保持不变。
    pub fn admit(&mut self, now: SimTime) -> Result<u32, SimError> {
        self.ensure_room()?;
        self.accumulate(now);
        self.occupied += 1;
        self.peak = self.peak.max(self.occupied);
        trace!(pool = %self.kind, occupied = self.occupied, capacity = self.capacity, "admit");
        Ok(self.occupied)
    }

    /// 释放一个单位。对空池调用属于程序错误。
    pub fn release(&mut self, now: SimTime) -> u32 {
        assert!(self.occupied > 0, "release on empty {} pool", self.kind);
        self.accumulate(now);
        self.occupied -= 1;
        trace!(pool = %self.kind, occupied = self.occupied, capacity = self.capacity, "release");
        self.occupied
    }

    /// 从仿真开始到 `now` 的时间加权平均占用量；时钟尚未前进时无定义。
    pub fn time_average(&self, now: SimTime) -> Option<f64> {
        if now.0 == 0 {
            return None;
        }
        let tail = u128::from(self.occupied) * u128::from(now.saturating_sub(self.last_change).0);
        let area = self.area.saturating_add(tail);
        Some(area as f64 / now.0 as f64)
    }

    /// 平均占用量 / 容量
    pub fn utilization(&self, now: SimTime) -> Option<f64> {
        if self.capacity == 0 {
            return None;
        }
        self.time_average(now)
            .map(|avg| avg / f64::from(self.capacity))
    }
}

/// 六个命名资源池
#[derive(Debug, Clone)]
pub struct ResourcePools {
    pools: [ResourcePool; PoolKind::COUNT],
}

impl ResourcePools {
    pub fn from_config(cfg: &ErConfig) -> Self {
        Self::with_capacities([
            cfg.max_patients,
            cfg.nurses,
            cfg.doctors,
            cfg.exam_rooms,
            cfg.labs,
            cfg.hospital_rooms,
        ])
    }

    /// 按 `PoolKind::ALL` 的顺序给出容量
    pub fn with_capacities(capacities: [u32; PoolKind::COUNT]) -> Self {
        Self {
            pools: PoolKind::ALL.map(|kind| ResourcePool::new(kind, capacities[kind.index()])),
        }
    }

    pub fn get(&self, kind: PoolKind) -> &ResourcePool {
        &self.pools[kind.index()]
    }

    pub fn admit(&mut self, kind: PoolKind, now: SimTime) -> Result<u32, SimError> {
        self.pools[kind.index()].admit(now)
    }

    /// 按顺序检查所有池都有空位；第一个已满的池报错，任何池都不改变。
    pub fn ensure_room(&self, kinds: &[PoolKind]) -> Result<(), SimError> {
        kinds.iter().try_for_each(|&kind| self.get(kind).ensure_room())
    }

    pub fn release(&mut self, kind: PoolKind, now: SimTime) -> u32 {
        self.pools[kind.index()].release(now)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourcePool> {
        self.pools.iter()
    }
}
