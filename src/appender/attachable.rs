//! 可挂载 appender 的有序列表
//!
//! 列表采用写时复制：分发线程拿到的是某一次完整提交后的快照，
//! 修改方在写锁内构造新列表后整体替换，读者永远不会看到修改到一半的状态。

use crate::appender::traits::{same_appender, SharedAppender};
use parking_lot::RwLock;
use std::sync::Arc;

/// Appender 列表
#[derive(Debug)]
pub(crate) struct AppenderList {
    appenders: RwLock<Arc<[SharedAppender]>>,
}

impl Default for AppenderList {
    fn default() -> Self {
        Self::new()
    }
}

impl AppenderList {
    /// 创建空列表
    pub(crate) fn new() -> Self {
        Self {
            appenders: RwLock::new(Arc::from(Vec::new())),
        }
    }

    /// 当前已提交的列表快照
    pub(crate) fn snapshot(&self) -> Arc<[SharedAppender]> {
        self.appenders.read().clone()
    }

    /// 追加 appender；同一对象已存在时返回 false
    pub(crate) fn add(&self, appender: SharedAppender) -> bool {
        let mut current = self.appenders.write();
        if current.iter().any(|a| same_appender(a, &appender)) {
            return false;
        }
        let mut next = current.to_vec();
        next.push(appender);
        *current = Arc::from(next);
        true
    }

    /// 按对象身份移除
    pub(crate) fn remove(&self, appender: &SharedAppender) -> Option<SharedAppender> {
        self.remove_where(|a| same_appender(a, appender))
    }

    /// 按名称移除第一个匹配项
    pub(crate) fn remove_by_name(&self, name: &str) -> Option<SharedAppender> {
        self.remove_where(|a| a.name() == name)
    }

    fn remove_where<F>(&self, pred: F) -> Option<SharedAppender>
    where
        F: Fn(&SharedAppender) -> bool,
    {
        let mut current = self.appenders.write();
        let index = current.iter().position(pred)?;
        let mut next = current.to_vec();
        let removed = next.remove(index);
        *current = Arc::from(next);
        Some(removed)
    }

    /// 清空列表，返回被移除的 appender
    pub(crate) fn take_all(&self) -> Vec<SharedAppender> {
        let mut current = self.appenders.write();
        if current.is_empty() {
            return Vec::new();
        }
        let taken = current.to_vec();
        *current = Arc::from(Vec::new());
        taken
    }

    /// 按名称查找
    pub(crate) fn get(&self, name: &str) -> Option<SharedAppender> {
        self.snapshot().iter().find(|a| a.name() == name).cloned()
    }

    /// 所有 appender 的副本
    pub(crate) fn all(&self) -> Vec<SharedAppender> {
        self.snapshot().to_vec()
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshot().len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}
