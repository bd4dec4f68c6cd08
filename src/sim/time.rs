//! 仿真时间类型
//!
//! 定义仿真时间及其单位转换。模型以分钟（f64）描述时长，内核以整数微秒排序。

const MICROS_PER_MINUTE: f64 = 60_000_000.0;

/// 仿真时间（微秒）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);
    pub const MAX: SimTime = SimTime(u64::MAX);

    /// 分钟 -> 微秒，四舍五入。负数与 NaN 按 0 处理；
    /// 超出范围（含 `+inf`）饱和到 `SimTime::MAX`，即“永不发生”。
    pub fn from_minutes(minutes: f64) -> SimTime {
        if minutes.is_nan() || minutes <= 0.0 {
            return SimTime::ZERO;
        }
        let us = minutes * MICROS_PER_MINUTE;
        if us >= u64::MAX as f64 {
            return SimTime::MAX;
        }
        SimTime(us.round() as u64)
    }

    pub fn as_minutes(self) -> f64 {
        self.0 as f64 / MICROS_PER_MINUTE
    }

    pub fn saturating_add(self, other: SimTime) -> SimTime {
        SimTime(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: SimTime) -> SimTime {
        SimTime(self.0.saturating_sub(other.0))
    }
}
