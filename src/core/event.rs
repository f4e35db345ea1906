//! 日志事件定义
//!
//! 此模块定义了从调用点传入 hierarchy 核心的不可变事件记录。

use crate::core::level::Level;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 日志事件
///
/// 构造完成后，核心只读取事件，不会修改它。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    /// 事件时间戳
    pub timestamp: DateTime<Utc>,
    /// 日志级别
    pub level: Level,
    /// 产生事件的 logger 名称
    pub logger: String,
    /// 日志消息
    pub message: String,
    /// 源码位置
    pub location: Option<Location>,
    /// 线程名称（没有名称时为线程 ID）
    pub thread: Option<String>,
}

/// 源码位置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// 文件名
    pub file: String,
    /// 行号
    pub line: u32,
    /// 模块路径或函数名
    pub module_path: Option<String>,
}

impl LogEvent {
    /// 创建新的日志事件，时间戳取当前时间
    pub fn new(level: Level, logger: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            logger: logger.into(),
            message: message.into(),
            location: None,
            thread: None,
        }
    }

    /// 设置源码位置
    pub fn with_location(
        mut self,
        file: impl Into<String>,
        line: u32,
        module_path: Option<&str>,
    ) -> Self {
        self.location = Some(Location {
            file: file.into(),
            line,
            module_path: module_path.map(str::to_string),
        });
        self
    }

    /// 设置线程名称
    pub fn with_thread(mut self, thread: impl Into<String>) -> Self {
        self.thread = Some(thread.into());
        self
    }

    /// 使用当前线程的名称（或 ID）
    pub fn with_current_thread(self) -> Self {
        let current = std::thread::current();
        let thread = match current.name() {
            Some(name) => name.to_string(),
            None => format!("{:?}", current.id()),
        };
        self.with_thread(thread)
    }

    /// 获取事件的 JSON 表示
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} - {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            self.level,
            self.logger,
            self.message
        )?;
        if let Some(ref location) = self.location {
            write!(f, " ({}:{})", location.file, location.line)?;
        }
        Ok(())
    }
}
