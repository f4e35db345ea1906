//! QuantumHierarchy - 分层 logger 注册表
//!
//! QuantumHierarchy 按点分名称把 logger 组织成一棵树：未设置级别的 logger
//! 从最近的祖先继承级别，日志事件沿祖先链向上分发给挂载的 appender，
//! 直到遇到关闭了叠加（additivity）的 logger 为止。
//!
//! # 快速开始
//!
//! ```rust
//! use quantum_hierarchy::{Hierarchy, Level, MemoryAppender};
//! use std::sync::Arc;
//!
//! let hierarchy = Hierarchy::new();
//! let memory = Arc::new(MemoryAppender::new("memory"));
//! hierarchy.get_root().add_appender(memory.clone());
//! hierarchy.get_root().set_level(Level::Warn).unwrap();
//!
//! let db = hierarchy.get_instance("svc.db").unwrap();
//! db.info("ignored");
//! db.set_level(Level::Debug).unwrap();
//! db.info("delivered to root");
//!
//! assert_eq!(memory.messages(), vec!["delivered to root"]);
//! ```
//!
//! # 默认 hierarchy
//!
//! ```rust
//! use quantum_hierarchy::{get_logger, root_logger, ConsoleAppender};
//! use std::sync::Arc;
//!
//! root_logger().add_appender(Arc::new(ConsoleAppender::new("console")));
//! let logger = get_logger("app.startup").unwrap();
//! logger.info("Application started");
//! ```

pub mod appender;
pub mod config;
pub mod core;
pub mod diagnostics;
pub mod error;
pub mod hierarchy;

// 重新导出主要类型
pub use appender::{
    Appender, AppenderError, AppenderResult, ConsoleAppender, ConsoleTarget, MemoryAppender,
    SharedAppender,
};
pub use config::{load_config_from_file, load_config_from_str, HierarchyConfig, LoggerConfig};
pub use diagnostics::DiagnosticsSnapshot;
pub use error::{HierarchyError, Result};

// 重新导出核心功能
pub use core::event::{Location, LogEvent};
pub use core::level::Level;
pub use hierarchy::factory::{DefaultLoggerFactory, LoggerFactory, LoggerTemplate};
pub use hierarchy::locker::HierarchyLocker;
pub use hierarchy::logger::Logger;
pub use hierarchy::name::ROOT_NAME;
pub use hierarchy::Hierarchy;

use once_cell::sync::Lazy;
use std::path::Path;
use std::sync::Arc;

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 进程级默认 hierarchy
static DEFAULT_HIERARCHY: Lazy<Arc<Hierarchy>> = Lazy::new(Hierarchy::new);

/// 进程级默认 hierarchy
pub fn default_hierarchy() -> Arc<Hierarchy> {
    DEFAULT_HIERARCHY.clone()
}

/// 在默认 hierarchy 中获取（必要时创建）logger
///
/// # 示例
///
/// ```rust
/// use quantum_hierarchy::{get_logger, Level};
///
/// let logger = get_logger("docs.example").unwrap();
/// assert_eq!(logger.get_level(), Level::Unset);
/// assert!(quantum_hierarchy::exists("docs"));
/// ```
pub fn get_logger(name: &str) -> Result<Logger> {
    DEFAULT_HIERARCHY.get_instance(name)
}

/// 默认 hierarchy 的根 logger
pub fn root_logger() -> Logger {
    DEFAULT_HIERARCHY.get_root()
}

/// 在默认 hierarchy 中查找但不创建
pub fn exists(name: &str) -> bool {
    DEFAULT_HIERARCHY.exists(name)
}

/// 默认 hierarchy 中所有非根 logger
pub fn current_loggers() -> Vec<Logger> {
    DEFAULT_HIERARCHY.get_current_loggers()
}

/// 把配置应用到默认 hierarchy
///
/// 默认 hierarchy 的分隔符固定为 `.`，配置中的分隔符必须一致。
pub fn configure(config: &HierarchyConfig) -> Result<()> {
    DEFAULT_HIERARCHY.apply_config(config)
}

/// 从 TOML 文件加载配置并应用到默认 hierarchy
pub fn init_from_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let config = load_config_from_file(path.as_ref())?;
    configure(&config)
}

/// 关闭默认 hierarchy 上的所有 appender
///
/// 建议在应用程序退出前调用此函数。logger 本身保留，之后可以重新挂载 appender。
pub fn shutdown() -> Result<()> {
    DEFAULT_HIERARCHY.shutdown()
}

/// 获取默认 hierarchy 的诊断数据
pub fn get_diagnostics() -> DiagnosticsSnapshot {
    DEFAULT_HIERARCHY.diagnostics()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_default_hierarchy_is_shared() {
        let a = default_hierarchy();
        let b = default_hierarchy();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(root_logger(), a.get_root());
    }

    #[test]
    fn test_global_get_logger() {
        let logger = get_logger("lib_tests.global").unwrap();
        assert!(exists("lib_tests"));
        assert!(exists("lib_tests.global"));
        assert!(current_loggers().contains(&logger));
        assert!(get_diagnostics().loggers_created >= 2);
    }

    #[test]
    fn test_configure_rejects_foreign_delimiter() {
        let config = HierarchyConfig {
            delimiter: '/',
            ..Default::default()
        };
        assert!(matches!(
            configure(&config),
            Err(HierarchyError::ConfigError(_))
        ));
    }
}
