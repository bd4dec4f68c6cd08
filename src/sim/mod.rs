//! 仿真核心模块
//!
//! 此模块包含事件驱动仿真的核心组件，如仿真时间、调度事件、仿真器、
//! 运行配置与随机数流。

// 子模块声明
mod config;
mod rng;
mod scheduled_event;
mod simulator;
mod time;

// 重新导出公共接口
pub use config::{ConfigError, ConfigLoadError, ErConfig, check_probabilities};
pub use rng::{Stream, StreamVariates, VariateSource};
pub use scheduled_event::ScheduledEvent;
pub use simulator::Simulator;
pub use time::SimTime;
