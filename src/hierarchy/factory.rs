//! Logger 工厂
//!
//! 工厂只能产出 `LoggerTemplate`，把模板变成真正的树节点并链接父节点
//! 是 `Hierarchy` 独有的权限。

use crate::appender::SharedAppender;
use crate::core::level::Level;
use crate::hierarchy::Hierarchy;
use std::fmt;

/// 新 logger 的初始状态
#[derive(Clone)]
pub struct LoggerTemplate {
    name: String,
    level: Level,
    additive: bool,
    appenders: Vec<SharedAppender>,
}

impl LoggerTemplate {
    /// 默认模板：级别 `Unset`，可叠加，没有 appender
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: Level::Unset,
            additive: true,
            appenders: Vec::new(),
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_additivity(mut self, additive: bool) -> Self {
        self.additive = additive;
        self
    }

    pub fn with_appender(mut self, appender: SharedAppender) -> Self {
        self.appenders.push(appender);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn additivity(&self) -> bool {
        self.additive
    }

    pub(crate) fn into_parts(self) -> (String, Level, bool, Vec<SharedAppender>) {
        (self.name, self.level, self.additive, self.appenders)
    }
}

impl fmt::Debug for LoggerTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerTemplate")
            .field("name", &self.name)
            .field("level", &self.level)
            .field("additive", &self.additive)
            .field(
                "appenders",
                &self.appenders.iter().map(|a| a.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Logger 工厂 trait
///
/// `Hierarchy` 只对名称的最后一段调用工厂，祖先节点总是使用默认模板。
/// 返回模板的名称必须与请求的名称一致。
pub trait LoggerFactory: Send + Sync {
    fn make_new_logger_instance(&self, name: &str, hierarchy: &Hierarchy) -> LoggerTemplate;
}

/// 默认工厂
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLoggerFactory;

impl LoggerFactory for DefaultLoggerFactory {
    fn make_new_logger_instance(&self, name: &str, _hierarchy: &Hierarchy) -> LoggerTemplate {
        LoggerTemplate::new(name)
    }
}

impl<F> LoggerFactory for F
where
    F: Fn(&str, &Hierarchy) -> LoggerTemplate + Send + Sync,
{
    fn make_new_logger_instance(&self, name: &str, hierarchy: &Hierarchy) -> LoggerTemplate {
        self(name, hierarchy)
    }
}
