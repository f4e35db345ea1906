//! Logger 层级注册表
//!
//! `Hierarchy` 按名称持有所有 logger 节点，负责在首次引用后代名称时补齐
//! 缺失的祖先，并串行化所有结构修改。名称查找是并发读操作；创建新节点时
//! 先在结构锁下二次检查，再把整条新链一次性发布到名称表中。

pub mod factory;
pub mod locker;
pub mod logger;
pub mod name;
pub(crate) mod node;

use crate::appender::{same_appender, SharedAppender};
use crate::config::{validate_config, HierarchyConfig};
use crate::core::level::Level;
use crate::diagnostics::DiagnosticsSnapshot;
use crate::error::{HierarchyError, Result};
use factory::{DefaultLoggerFactory, LoggerFactory, LoggerTemplate};
use locker::HierarchyLocker;
use logger::Logger;
use node::{HierarchyContext, LoggerNode};
use std::collections::HashMap;
use std::fmt;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::{Arc, Weak};

/// Logger 层级注册表
pub struct Hierarchy {
    root: Arc<LoggerNode>,
    loggers: RwLock<HashMap<String, Arc<LoggerNode>>>,
    factory: RwLock<Arc<dyn LoggerFactory>>,
    pub(crate) context: Arc<HierarchyContext>,
    delimiter: char,
    self_ref: Weak<Hierarchy>,
}

impl Hierarchy {
    /// 使用默认配置创建 hierarchy（根级别 `DEBUG`，分隔符 `.`）
    pub fn new() -> Arc<Self> {
        let defaults = HierarchyConfig::default();
        Self::build(Level::Debug, defaults.delimiter, defaults.warn_on_missing_appenders)
    }

    /// 按配置创建 hierarchy，并应用其中的 logger 设置
    pub fn with_config(config: &HierarchyConfig) -> Result<Arc<Self>> {
        validate_config(config)?;
        let hierarchy = Self::build(
            config.root_level()?,
            config.delimiter,
            config.warn_on_missing_appenders,
        );
        hierarchy.apply_config(config)?;
        Ok(hierarchy)
    }

    fn build(root_level: Level, delimiter: char, warn_on_missing_appenders: bool) -> Arc<Self> {
        // 根级别在此之前已校验为具体级别
        let root_level = if root_level.is_set() {
            root_level
        } else {
            Level::Debug
        };
        let context = Arc::new(HierarchyContext::new(root_level, warn_on_missing_appenders));

        Arc::new_cyclic(|weak: &Weak<Hierarchy>| Self {
            root: LoggerNode::root(context.clone(), weak.clone()),
            loggers: RwLock::new(HashMap::new()),
            factory: RwLock::new(Arc::new(DefaultLoggerFactory)),
            context,
            delimiter,
            self_ref: weak.clone(),
        })
    }

    fn read_map(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<LoggerNode>>> {
        self.loggers.read()
    }

    fn write_map(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<LoggerNode>>> {
        self.loggers.write()
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    // --- 查找与创建 ---

    /// 获取（必要时创建）指定名称的 logger
    ///
    /// 空名称和保留名称 `"root"` 返回根 logger。
    pub fn get_instance(&self, name: &str) -> Result<Logger> {
        let factory = self.logger_factory();
        self.get_instance_with(name, factory.as_ref())
    }

    /// 同 `get_instance`，但名称最后一段的节点由 `factory` 提供初始状态
    pub fn get_instance_with(&self, name: &str, factory: &dyn LoggerFactory) -> Result<Logger> {
        let prefixes = name::split_prefixes(name, self.delimiter)?;
        let Some(&full_name) = prefixes.last() else {
            return Ok(self.get_root());
        };

        if let Some(node) = self.read_map().get(full_name) {
            return Ok(Logger::from_node(node.clone()));
        }

        let _guard = self.context.structure.lock();
        self.create_chain(&prefixes, factory)
    }

    /// 在结构锁下补齐缺失的链并整体发布
    fn create_chain(&self, prefixes: &[&str], factory: &dyn LoggerFactory) -> Result<Logger> {
        let full_name = prefixes[prefixes.len() - 1];
        if let Some(node) = self.read_map().get(full_name) {
            return Ok(Logger::from_node(node.clone()));
        }

        // 工厂可能重入 hierarchy，调用期间不持有名称表的锁
        let template = factory.make_new_logger_instance(full_name, self);
        if template.name() != full_name {
            return Err(HierarchyError::invariant(format!(
                "factory produced logger {:?} for requested name {:?}",
                template.name(),
                full_name
            )));
        }

        // 已存在的祖先是连续的前缀：一旦某个前缀缺失，更长的前缀也都缺失
        let (mut parent, start) = {
            let map = self.read_map();
            if let Some(node) = map.get(full_name) {
                return Ok(Logger::from_node(node.clone()));
            }
            let mut parent = self.root.clone();
            let mut start = prefixes.len();
            for (i, prefix) in prefixes.iter().enumerate() {
                match map.get(*prefix) {
                    Some(node) => parent = node.clone(),
                    None => {
                        start = i;
                        break;
                    }
                }
            }
            (parent, start)
        };

        let last = prefixes.len() - 1;
        let mut template = Some(template);
        let mut created = Vec::with_capacity(prefixes.len() - start);
        for (i, prefix) in prefixes.iter().enumerate().skip(start) {
            if name::parent_name(prefix, self.delimiter) != parent.name() {
                return Err(HierarchyError::invariant(format!(
                    "logger {:?} cannot be linked under {:?}",
                    prefix,
                    parent.name()
                )));
            }
            let node_template = if i == last {
                template.take().unwrap_or_else(|| LoggerTemplate::new(*prefix))
            } else {
                LoggerTemplate::new(*prefix)
            };
            let node = LoggerNode::from_template(
                node_template,
                parent.clone(),
                self.context.clone(),
                self.self_ref.clone(),
            );
            created.push(node.clone());
            parent = node;
        }

        {
            let mut map = self.write_map();
            for node in &created {
                map.insert(node.name().to_string(), node.clone());
            }
        }
        for node in &created {
            if let Some(p) = node.parent() {
                p.link_child(node);
            }
            self.context.diagnostics.increment_loggers_created();
            tracing::trace!(logger = %node.name(), "Logger created");
        }

        Ok(Logger::from_node(parent))
    }

    /// 查找但不创建
    pub fn exists(&self, name: &str) -> bool {
        self.read_map().contains_key(name)
    }

    /// 当前所有非根 logger 的快照，顺序不保证
    pub fn get_current_loggers(&self) -> Vec<Logger> {
        self.read_map()
            .values()
            .cloned()
            .map(Logger::from_node)
            .collect()
    }

    pub fn get_root(&self) -> Logger {
        Logger::from_node(self.root.clone())
    }

    /// 进入批量修改作用域
    pub fn lock(&self) -> HierarchyLocker<'_> {
        HierarchyLocker::new(self)
    }

    // --- 工厂 ---

    pub fn logger_factory(&self) -> Arc<dyn LoggerFactory> {
        self.factory.read().clone()
    }

    /// 替换 `get_instance` 使用的默认工厂
    pub fn set_logger_factory(&self, factory: Arc<dyn LoggerFactory>) {
        let _guard = self.context.structure.lock();
        *self.factory.write() = factory;
    }

    // --- 全局禁用阈值 ---

    /// 禁用所有级别不高于 `level` 的请求，无论 logger 自身级别如何
    pub fn disable(&self, level: Level) {
        let _guard = self.context.structure.lock();
        self.context.set_disable_threshold(level);
    }

    pub fn disable_all(&self) {
        self.disable(Level::Fatal);
    }

    pub fn disable_debug(&self) {
        self.disable(Level::Debug);
    }

    pub fn disable_info(&self) {
        self.disable(Level::Info);
    }

    pub fn enable_all(&self) {
        self.disable(Level::Unset);
    }

    pub fn is_disabled(&self, level: Level) -> bool {
        self.context.is_disabled(level)
    }

    pub fn set_warn_on_missing_appenders(&self, enabled: bool) {
        self.context.set_warn_on_missing_appenders(enabled);
    }

    // --- 重置与关闭 ---

    fn all_nodes(&self) -> Vec<Arc<LoggerNode>> {
        let mut nodes = vec![self.root.clone()];
        nodes.extend(self.read_map().values().cloned());
        nodes
    }

    /// 恢复初始配置
    ///
    /// 根级别恢复为构造时的级别，其余 logger 的级别变为 `Unset`、可叠加，
    /// 所有 appender 被关闭并移除，全局禁用阈值被清除。logger 本身保留。
    pub fn reset_configuration(&self) {
        let _guard = self.context.structure.lock();
        if let Err(e) = self.root.set_level(self.context.default_root_level) {
            tracing::error!(error = %e, "Failed to restore root level");
        }
        self.context.set_disable_threshold(Level::Unset);
        if let Err(e) = self.shutdown() {
            tracing::warn!(error = %e, "Appender close failed during reset");
        }
        for node in self.read_map().values() {
            if let Err(e) = node.set_level(Level::Unset) {
                tracing::error!(logger = %node.name(), error = %e, "Failed to reset logger level");
            }
            node.set_additive(true);
        }
        tracing::debug!("Hierarchy configuration reset");
    }

    /// 关闭并移除树上所有 appender
    ///
    /// 挂载在多个 logger 上的同一个 appender 只关闭一次。所有 appender
    /// 都会被处理；如有关闭失败，返回第一个错误。
    pub fn shutdown(&self) -> Result<()> {
        let _guard = self.context.structure.lock();
        let nodes = self.all_nodes();

        let mut distinct: Vec<SharedAppender> = Vec::new();
        for node in &nodes {
            for appender in node.appenders().take_all() {
                if !distinct.iter().any(|a| same_appender(a, &appender)) {
                    distinct.push(appender);
                }
            }
        }

        let mut first_error = None;
        for appender in &distinct {
            if let Err(e) = appender.close() {
                self.context.diagnostics.increment_appender_errors();
                tracing::warn!(appender = %appender.name(), error = %e, "Failed to close appender");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        tracing::debug!(appenders = distinct.len(), "Hierarchy shutdown completed");

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    /// 在一个锁定作用域内应用配置中的级别、禁用阈值和 logger 设置
    pub fn apply_config(&self, config: &HierarchyConfig) -> Result<()> {
        validate_config(config)?;
        if config.delimiter != self.delimiter {
            return Err(HierarchyError::config(format!(
                "delimiter {:?} differs from the hierarchy's {:?}",
                config.delimiter, self.delimiter
            )));
        }

        let locker = self.lock();
        self.root.set_level(config.root_level()?)?;
        self.context
            .set_disable_threshold(config.disable_level()?.unwrap_or(Level::Unset));
        self.context
            .set_warn_on_missing_appenders(config.warn_on_missing_appenders);

        for (name, logger_config) in &config.loggers {
            let logger = locker.get_instance(name)?;
            if let Some(level) = logger_config.level()? {
                logger.set_level(level)?;
            }
            if let Some(additivity) = logger_config.additivity {
                logger.set_additivity(additivity);
            }
        }
        tracing::debug!(loggers = config.loggers.len(), "Hierarchy configuration applied");
        Ok(())
    }

    /// 诊断数据快照
    pub fn diagnostics(&self) -> DiagnosticsSnapshot {
        self.context.diagnostics.snapshot()
    }

    /// 重置诊断事件计数器
    pub fn reset_diagnostics(&self) {
        self.context.diagnostics.reset();
    }
}

impl fmt::Debug for Hierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hierarchy")
            .field("root_level", &self.root.level())
            .field("delimiter", &self.delimiter)
            .field("loggers", &self.read_map().len())
            .field("disable_threshold", &self.context.disable_threshold())
            .finish()
    }
}
