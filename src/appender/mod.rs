//! QuantumHierarchy Appender 模块
//!
//! appender 是挂载在 logger 上的输出目标。hierarchy 只依赖 `Appender`
//! trait；这里附带两个简单实现：控制台输出和内存记录。

pub(crate) mod attachable;
pub mod console;
pub mod memory;
pub mod traits;

// 重新导出主要类型
pub(crate) use attachable::AppenderList;
pub use console::{ConsoleAppender, ConsoleTarget};
pub use memory::MemoryAppender;
pub use traits::{same_appender, Appender, AppenderError, AppenderResult, SharedAppender};
