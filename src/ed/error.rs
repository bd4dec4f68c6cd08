//! 仿真错误
//!
//! 三类错误都是致命的：检测到即终止本次运行，由边界层负责报告与退出码。

use super::pool::PoolKind;
use crate::sim::ConfigError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    #[error("{pool} capacity exceeded (capacity {capacity})")]
    CapacityExceeded { pool: PoolKind, capacity: u32 },

    #[error("no pending events with {resolved} of {goal} patients resolved")]
    SchedulerStarvation { resolved: u64, goal: u64 },
}
