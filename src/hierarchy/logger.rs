//! Logger 句柄
//!
//! `Logger` 是调用方持有的轻量句柄，克隆只增加一次引用计数。
//! 所有日志操作都经由它转到树节点上。

use crate::appender::SharedAppender;
use crate::core::event::LogEvent;
use crate::core::level::Level;
use crate::error::Result;
use crate::hierarchy::node::LoggerNode;
use crate::hierarchy::Hierarchy;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Logger 句柄
///
/// 两个句柄相等当且仅当它们指向同一个节点。丢弃最后一个句柄不会
/// 销毁节点，节点的生命周期与其所属的 `Hierarchy` 相同。
#[derive(Clone)]
pub struct Logger {
    node: Arc<LoggerNode>,
}

impl Logger {
    pub(crate) fn from_node(node: Arc<LoggerNode>) -> Self {
        Self { node }
    }

    /// logger 名称
    pub fn get_name(&self) -> &str {
        self.node.name()
    }

    /// 父 logger；根 logger 返回 `None`
    pub fn get_parent(&self) -> Option<Logger> {
        self.node.parent().cloned().map(Logger::from_node)
    }

    /// 已创建的直接子 logger
    pub fn get_children(&self) -> Vec<Logger> {
        self.node
            .children()
            .into_iter()
            .map(Logger::from_node)
            .collect()
    }

    pub fn is_root(&self) -> bool {
        self.node.is_root()
    }

    /// 所属的 hierarchy；hierarchy 已被释放时返回 `None`
    pub fn get_hierarchy(&self) -> Option<Arc<Hierarchy>> {
        self.node.hierarchy()
    }

    // --- 级别 ---

    /// 自身的级别，可能是 `Unset`
    pub fn get_level(&self) -> Level {
        self.node.level()
    }

    /// 设置级别；对根 logger 设置 `Unset` 会返回错误
    pub fn set_level(&self, level: Level) -> Result<()> {
        self.node.set_level(level)
    }

    /// 生效级别：沿父链找到的第一个具体级别
    pub fn get_chained_level(&self) -> Level {
        self.node.chained_level()
    }

    /// 该级别的请求是否会被处理
    ///
    /// `Unset` 与 `Off` 不是合法的消息级别，总是返回 `false`。
    pub fn is_enabled_for(&self, level: Level) -> bool {
        self.node.is_enabled_for(level)
    }

    // --- 可叠加性 ---

    pub fn get_additivity(&self) -> bool {
        self.node.is_additive()
    }

    pub fn set_additivity(&self, additive: bool) {
        self.node.set_additive(additive)
    }

    // --- 记录日志 ---

    /// 检查级别后记录一条消息
    pub fn log(&self, level: Level, message: impl Into<String>) {
        if self.check_enabled(level) {
            self.forced_log(level, message);
        }
    }

    /// 检查级别后记录一条消息，消息只在启用时才构造
    pub fn log_with<F>(&self, level: Level, message: F)
    where
        F: FnOnce() -> String,
    {
        if self.check_enabled(level) {
            self.forced_log(level, message());
        }
    }

    /// 按事件自身的级别检查后分发
    pub fn log_event(&self, event: &LogEvent) {
        if self.check_enabled(event.level) {
            self.forced_log_event(event);
        }
    }

    /// 不检查级别，直接构造事件并分发
    pub fn forced_log(&self, level: Level, message: impl Into<String>) {
        let event = LogEvent::new(level, self.get_name(), message).with_current_thread();
        self.node.call_appenders(&event);
    }

    /// 不检查级别，直接分发已有事件
    pub fn forced_log_event(&self, event: &LogEvent) {
        self.node.call_appenders(event);
    }

    /// 把事件交给本 logger 及（可叠加时）祖先的所有 appender
    pub fn call_appenders(&self, event: &LogEvent) {
        self.node.call_appenders(event);
    }

    fn check_enabled(&self, level: Level) -> bool {
        let enabled = self.node.is_enabled_for(level);
        if !enabled {
            self.node.context().diagnostics.increment_events_suppressed();
        }
        enabled
    }

    pub fn trace(&self, message: impl Into<String>) {
        self.log(Level::Trace, message);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::Debug, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::Info, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(Level::Warn, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::Error, message);
    }

    pub fn fatal(&self, message: impl Into<String>) {
        self.log(Level::Fatal, message);
    }

    /// 条件为假时以 `Fatal` 级别记录消息
    pub fn assertion(&self, condition: bool, message: impl Into<String>) {
        if !condition {
            self.log(Level::Fatal, message);
        }
    }

    // --- appender ---

    /// 追加 appender；同一对象重复挂载是无操作
    pub fn add_appender(&self, appender: SharedAppender) {
        self.node.add_appender(appender);
    }

    /// 按对象身份移除（不会关闭它）
    pub fn remove_appender(&self, appender: &SharedAppender) {
        self.node.remove_appender(appender);
    }

    /// 按名称移除（不会关闭它）
    pub fn remove_appender_by_name(&self, name: &str) {
        self.node.remove_appender_by_name(name);
    }

    /// 移除全部 appender，并逐个关闭
    pub fn remove_all_appenders(&self) {
        self.node.remove_all_appenders();
    }

    pub fn get_appender(&self, name: &str) -> Option<SharedAppender> {
        self.node.appenders().get(name)
    }

    pub fn get_all_appenders(&self) -> Vec<SharedAppender> {
        self.node.appenders().all()
    }

    /// 关闭挂载在本 logger 上的所有 appender，但保留挂载关系
    pub fn close_nested_appenders(&self) {
        self.node.close_nested_appenders();
    }
}

impl PartialEq for Logger {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }
}

impl Eq for Logger {}

impl Hash for Logger {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.get_name().hash(state);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.get_name())
            .field("level", &self.get_level())
            .field("additive", &self.get_additivity())
            .field("appenders", &self.node.appenders().len())
            .finish()
    }
}

/// 检查级别后记录一条格式化消息，并附带源码位置
///
/// 级别未启用时不会执行格式化。
///
/// ```rust
/// use quantum_hierarchy::{qlog, Hierarchy, Level};
///
/// let hierarchy = Hierarchy::new();
/// let logger = hierarchy.get_instance("svc.db").unwrap();
/// qlog!(logger, Level::Info, "connected to {}", "primary");
/// ```
#[macro_export]
macro_rules! qlog {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger: &$crate::Logger = &$logger;
        let level: $crate::Level = $level;
        if logger.is_enabled_for(level) {
            let event = $crate::core::LogEvent::new(level, logger.get_name(), format!($($arg)+))
                .with_location(file!(), line!(), Some(module_path!()))
                .with_current_thread();
            logger.forced_log_event(&event);
        }
    }};
}
