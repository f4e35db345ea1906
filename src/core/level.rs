//! 日志级别定义
//!
//! `Level` 是一个全序的严重程度值，另有一个 `Unset` 哨兵表示“继承祖先”。

use crate::error::HierarchyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 日志级别
///
/// 顺序：`Unset < Trace < Debug < Info < Warn < Error < Fatal < Off`。
/// `Unset` 只作为 logger 自身级别出现，表示向祖先查询；
/// `Off` 只作为阈值使用，用来完全关闭某个 logger。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Level {
    #[default]
    Unset = 0,
    Trace = 1,
    Debug = 2,
    Info = 3,
    Warn = 4,
    Error = 5,
    Fatal = 6,
    Off = 7,
}

impl Level {
    /// 所有具体的消息级别，从低到高
    pub const MESSAGE_LEVELS: [Level; 6] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
    ];

    /// 是否为具体级别（非 `Unset`）
    pub fn is_set(self) -> bool {
        self != Level::Unset
    }

    /// 是否可以作为一条日志消息的级别
    pub fn is_message_level(self) -> bool {
        !matches!(self, Level::Unset | Level::Off)
    }

    /// 大写名称
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Unset => "UNSET",
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
            Level::Off => "OFF",
        }
    }

    pub(crate) fn to_u8(self) -> u8 {
        self as u8
    }

    pub(crate) fn from_u8(value: u8) -> Level {
        match value {
            1 => Level::Trace,
            2 => Level::Debug,
            3 => Level::Info,
            4 => Level::Warn,
            5 => Level::Error,
            6 => Level::Fatal,
            7 => Level::Off,
            _ => Level::Unset,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = HierarchyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TRACE" | "ALL" => Ok(Level::Trace),
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "ERROR" => Ok(Level::Error),
            "FATAL" => Ok(Level::Fatal),
            "OFF" => Ok(Level::Off),
            "UNSET" | "NOT_SET" | "INHERITED" => Ok(Level::Unset),
            _ => Err(HierarchyError::InvalidLogLevel(s.to_string())),
        }
    }
}
