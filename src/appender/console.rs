//! 控制台输出 Appender 实现
//!
//! 将日志事件同步写到标准输出或标准错误，支持按级别着色。

use crate::appender::traits::{Appender, AppenderError, AppenderResult};
use crate::core::event::LogEvent;
use crate::core::level::Level;
use colored::{ColoredString, Colorize};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

/// 输出流
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    Stderr,
}

/// 控制台 Appender
#[derive(Debug)]
pub struct ConsoleAppender {
    name: String,
    target: ConsoleTarget,
    colored: bool,
    closed: AtomicBool,
}

impl ConsoleAppender {
    /// 创建写到标准输出的控制台 appender
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: ConsoleTarget::Stdout,
            colored: true,
            closed: AtomicBool::new(false),
        }
    }

    /// 设置输出流
    pub fn with_target(mut self, target: ConsoleTarget) -> Self {
        self.target = target;
        self
    }

    /// 设置是否着色
    pub fn with_colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    pub fn target(&self) -> ConsoleTarget {
        self.target
    }

    /// 格式化事件为单行文本
    fn format_event(&self, event: &LogEvent) -> String {
        let level = if self.colored {
            colorize_level(event.level).to_string()
        } else {
            event.level.to_string()
        };

        let mut line = format!(
            "{} {:>5} [{}] {}",
            event.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            level,
            event.logger,
            event.message
        );
        if let Some(ref thread) = event.thread {
            line.push_str(&format!(" <{}>", thread));
        }
        line
    }
}

fn colorize_level(level: Level) -> ColoredString {
    let text = level.as_str();
    match level {
        Level::Fatal => text.red().bold(),
        Level::Error => text.red(),
        Level::Warn => text.yellow(),
        Level::Info => text.green(),
        Level::Debug => text.cyan(),
        Level::Trace => text.white(),
        Level::Unset | Level::Off => text.normal(),
    }
}

impl Appender for ConsoleAppender {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&self, event: &LogEvent) -> AppenderResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(AppenderError::Closed(self.name.clone()));
        }

        let line = self.format_event(event);
        match self.target {
            ConsoleTarget::Stdout => {
                let mut out = io::stdout().lock();
                writeln!(out, "{}", line)?;
            }
            ConsoleTarget::Stderr => {
                let mut out = io::stderr().lock();
                writeln!(out, "{}", line)?;
            }
        }
        Ok(())
    }

    fn close(&self) -> AppenderResult<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        match self.target {
            ConsoleTarget::Stdout => io::stdout().flush()?,
            ConsoleTarget::Stderr => io::stderr().flush()?,
        }
        tracing::debug!(appender = %self.name, "ConsoleAppender closed");
        Ok(())
    }
}
