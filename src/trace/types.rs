use crate::ed::{ArrivalChannel, EventKind, FollowUpOutcome, PoolKind, Urgency};
use serde::{Deserialize, Serialize};

/// 轨迹事件类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEventKind {
    /// 运行元信息（t=0 的第一条事件）
    Meta {
        pools: Vec<TracePoolInfo>,
        goal_patients: u64,
        seed: Option<u64>,
    },
    /// 内核交出一个事件并分发给处理函数
    Dispatch { event: EventKind },
    /// 资源池占用 +1（`occupied` 为操作后的值）
    Admit { pool: PoolKind, occupied: u32 },
    /// 资源池占用 -1
    Release { pool: PoolKind, occupied: u32 },
    /// 分诊结果（`severity` 已含救护车加权）
    Triaged {
        channel: ArrivalChannel,
        severity: f64,
        urgency: Urgency,
    },
    /// 随访分支
    FollowUp { draw: f64, outcome: FollowUpOutcome },
    /// 病人离开系统后的累计数
    Resolved { resolved: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracePoolInfo {
    pub pool: PoolKind,
    pub capacity: u32,
}

/// 一条轨迹记录（JSON）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// 仿真时间（微秒，和 `SimTime.0` 同口径）
    pub t_us: u64,
    #[serde(flatten)]
    pub kind: TraceEventKind,
}

/// 一个简单的事件收集器（存内存，仿真结束写 JSON 文件）
#[derive(Debug, Default)]
pub struct TraceLogger {
    pub events: Vec<TraceEvent>,
}

impl TraceLogger {
    pub fn push(&mut self, t_us: u64, kind: TraceEventKind) {
        self.events.push(TraceEvent { t_us, kind });
    }

    /// 只保留分发记录，按顺序给出事件类型
    pub fn dispatched(&self) -> Vec<EventKind> {
        self.events
            .iter()
            .filter_map(|e| match e.kind {
                TraceEventKind::Dispatch { event } => Some(event),
                _ => None,
            })
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.events)
    }
}
