//! 批量结构修改的锁定作用域

use crate::appender::SharedAppender;
use crate::error::Result;
use crate::hierarchy::logger::Logger;
use crate::hierarchy::Hierarchy;
use parking_lot::ReentrantMutexGuard;

/// Hierarchy 锁定作用域
///
/// 存活期间持有 hierarchy 的结构锁，其它线程的结构修改（创建 logger、
/// 设置级别、挂载 appender）都会等待。已发布状态的读取（级别解析、分发）
/// 不受影响。作用域结束时（包括 panic 展开）锁总会被释放。
///
/// 结构锁可重入，持有 locker 的线程仍然可以直接调用 `Logger` 的修改方法。
pub struct HierarchyLocker<'a> {
    hierarchy: &'a Hierarchy,
    _guard: ReentrantMutexGuard<'a, ()>,
}

impl<'a> HierarchyLocker<'a> {
    pub(crate) fn new(hierarchy: &'a Hierarchy) -> Self {
        let guard = hierarchy.context.structure.lock();
        Self {
            hierarchy,
            _guard: guard,
        }
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        self.hierarchy
    }

    pub fn get_instance(&self, name: &str) -> Result<Logger> {
        self.hierarchy.get_instance(name)
    }

    pub fn get_current_loggers(&self) -> Vec<Logger> {
        self.hierarchy.get_current_loggers()
    }

    pub fn add_appender(&self, logger: &Logger, appender: SharedAppender) {
        logger.add_appender(appender);
    }

    pub fn reset_configuration(&self) {
        self.hierarchy.reset_configuration();
    }
}
