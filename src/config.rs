//! Hierarchy 的声明式配置结构体。

use crate::core::level::Level;
use crate::error::{HierarchyError, Result};
use crate::hierarchy::name;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

// --- 辅助函数，用于提供配置项的默认值 ---
fn default_root_level() -> String {
    "DEBUG".to_string()
}
fn default_delimiter() -> char {
    '.'
}
fn default_true() -> bool {
    true
}

/// Hierarchy 配置
///
/// ```toml
/// root_level = "WARN"
/// disable = "DEBUG"
///
/// [loggers."svc.db"]
/// level = "TRACE"
/// additivity = false
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HierarchyConfig {
    /// 根 logger 的级别，必须是具体级别
    #[serde(default = "default_root_level")]
    pub root_level: String,

    /// 名称分隔符，只在创建 hierarchy 时生效
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// 事件找不到任何 appender 时是否输出一次内部警告
    #[serde(default = "default_true")]
    pub warn_on_missing_appenders: bool,

    /// 全局禁用阈值，不高于该级别的请求一律丢弃
    #[serde(default)]
    pub disable: Option<String>,

    /// 按名称配置的 logger
    #[serde(default)]
    pub loggers: BTreeMap<String, LoggerConfig>,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            root_level: default_root_level(),
            delimiter: default_delimiter(),
            warn_on_missing_appenders: true,
            disable: None,
            loggers: BTreeMap::new(),
        }
    }
}

impl HierarchyConfig {
    /// 解析根级别；`UNSET` 对根无效
    pub fn root_level(&self) -> Result<Level> {
        let level: Level = self.root_level.parse()?;
        if !level.is_set() {
            return Err(HierarchyError::InvalidRootLevel);
        }
        Ok(level)
    }

    pub fn disable_level(&self) -> Result<Option<Level>> {
        self.disable.as_deref().map(str::parse::<Level>).transpose()
    }
}

/// 单个 logger 的配置
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggerConfig {
    #[serde(default)]
    pub level: Option<String>,

    #[serde(default)]
    pub additivity: Option<bool>,
}

impl LoggerConfig {
    pub fn level(&self) -> Result<Option<Level>> {
        self.level.as_deref().map(str::parse::<Level>).transpose()
    }
}

/// 用于从 TOML 文件加载 `HierarchyConfig` 的辅助函数。
pub fn load_config_from_file(path: &Path) -> Result<HierarchyConfig> {
    use std::fs;

    if !path.exists() {
        return Err(HierarchyError::ConfigFileMissing(
            path.to_string_lossy().into_owned(),
        ));
    }

    let config_str = fs::read_to_string(path)?;
    load_config_from_str(&config_str)
}

/// 用于从 TOML 字符串加载 `HierarchyConfig` 的辅助函数。
pub fn load_config_from_str(config_str: &str) -> Result<HierarchyConfig> {
    let config: HierarchyConfig = toml::from_str(config_str)?;
    Ok(config)
}

/// 验证配置的有效性。
pub fn validate_config(config: &HierarchyConfig) -> Result<()> {
    config.root_level()?;
    config.disable_level()?;

    // 分隔符不能出现在普通名称里
    if config.delimiter.is_whitespace() || config.delimiter.is_alphanumeric() {
        return Err(HierarchyError::config(format!(
            "分隔符不可用: {:?}",
            config.delimiter
        )));
    }

    for (logger_name, logger_config) in &config.loggers {
        let prefixes = name::split_prefixes(logger_name, config.delimiter)?;
        if prefixes.is_empty() {
            return Err(HierarchyError::config(
                "根 logger 只能通过 root_level 配置",
            ));
        }
        logger_config.level()?;
    }

    Ok(())
}
