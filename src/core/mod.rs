//! QuantumHierarchy 核心值类型
//!
//! 本模块包含日志级别与日志事件，它们是 hierarchy 与 appender 之间传递的数据。

pub mod event;
pub mod level;

// 重新导出核心类型
pub use event::{LogEvent, Location};
pub use level::Level;
