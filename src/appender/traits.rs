//! QuantumHierarchy Appender Traits
//!
//! 定义了 appender（日志输出目标）的统一接口。hierarchy 只持有
//! `Arc<dyn Appender>` 句柄并调用 `write`，具体的输出方式由实现者决定。
//!
//! # 使用示例
//!
//! ```rust
//! use quantum_hierarchy::appender::{Appender, AppenderResult};
//! use quantum_hierarchy::core::LogEvent;
//!
//! #[derive(Debug)]
//! struct PrintAppender;
//!
//! impl Appender for PrintAppender {
//!     fn name(&self) -> &str {
//!         "print"
//!     }
//!
//!     fn write(&self, event: &LogEvent) -> AppenderResult<()> {
//!         println!("{}", event);
//!         Ok(())
//!     }
//! }
//! ```

use crate::core::event::LogEvent;
use std::fmt::Debug;
use std::sync::Arc;

/// 基础 Appender trait
///
/// 同一个 appender 可以同时挂载到多个 logger 上，
/// 因此实现必须是 `Send + Sync`，并且 `write` 只接收 `&self`。
pub trait Appender: Send + Sync + Debug {
    /// 获取 appender 的名称
    ///
    /// 用于按名称查找和移除
    fn name(&self) -> &str;

    /// 写出一个日志事件
    ///
    /// 返回错误不会中断 hierarchy 对其它 appender 的分发。
    fn write(&self, event: &LogEvent) -> AppenderResult<()>;

    /// 关闭 appender，释放相关资源
    ///
    /// 默认实现什么也不做。
    fn close(&self) -> AppenderResult<()> {
        Ok(())
    }
}

/// 共享的 appender 句柄
pub type SharedAppender = Arc<dyn Appender>;

/// 通用 Appender 错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppenderError {
    /// I/O 错误
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Appender 已关闭
    #[error("Appender {0} is closed")]
    Closed(String),

    /// 通用错误
    #[error("Generic error: {0}")]
    Generic(String),
}

/// Appender 结果类型
pub type AppenderResult<T> = Result<T, AppenderError>;

/// 比较两个 appender 句柄是否指向同一个对象
pub fn same_appender(a: &SharedAppender, b: &SharedAppender) -> bool {
    // 只比较数据指针，忽略 vtable
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
