//! 运行轨迹记录（用于离线检查与复现比对）
//!
//! 设计目标：
//! - **结构化**：用 JSON 事件而不是解析文本日志
//! - **可比对**：同一配置与种子的两次运行输出逐字节相同

mod types;

pub use types::{TraceEvent, TraceEventKind, TraceLogger, TracePoolInfo};
