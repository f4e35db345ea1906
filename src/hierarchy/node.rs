//! logger 树节点
//!
//! 节点只向上持有父节点的强引用，子节点列表是弱引用，名称表由
//! `Hierarchy` 持有，因此不存在所有权环。级别和可叠加标志放在原子变量里，
//! appender 列表写时复制，读路径不需要结构锁。

use crate::appender::{AppenderList, SharedAppender};
use crate::core::event::LogEvent;
use crate::core::level::Level;
use crate::diagnostics::Diagnostics;
use crate::error::{HierarchyError, Result};
use crate::hierarchy::factory::LoggerTemplate;
use crate::hierarchy::name::ROOT_NAME;
use crate::hierarchy::Hierarchy;
use parking_lot::{Mutex, ReentrantMutex};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Weak};

/// hierarchy 与其所有节点共享的状态
#[derive(Debug)]
pub(crate) struct HierarchyContext {
    /// 结构锁，可重入
    pub(crate) structure: ReentrantMutex<()>,
    /// hierarchy 范围的禁用阈值，`Unset` 表示未禁用
    disable_threshold: AtomicU8,
    warn_on_missing_appenders: AtomicBool,
    /// reset 时根节点恢复的级别
    pub(crate) default_root_level: Level,
    pub(crate) diagnostics: Diagnostics,
}

impl HierarchyContext {
    pub(crate) fn new(default_root_level: Level, warn_on_missing_appenders: bool) -> Self {
        Self {
            structure: ReentrantMutex::new(()),
            disable_threshold: AtomicU8::new(Level::Unset.to_u8()),
            warn_on_missing_appenders: AtomicBool::new(warn_on_missing_appenders),
            default_root_level,
            diagnostics: Diagnostics::new(),
        }
    }

    pub(crate) fn disable_threshold(&self) -> Level {
        Level::from_u8(self.disable_threshold.load(Ordering::Acquire))
    }

    pub(crate) fn set_disable_threshold(&self, level: Level) {
        self.disable_threshold
            .store(level.to_u8(), Ordering::Release);
    }

    pub(crate) fn is_disabled(&self, level: Level) -> bool {
        let threshold = self.disable_threshold();
        threshold.is_set() && level <= threshold
    }

    pub(crate) fn warn_on_missing_appenders(&self) -> bool {
        self.warn_on_missing_appenders.load(Ordering::Relaxed)
    }

    pub(crate) fn set_warn_on_missing_appenders(&self, enabled: bool) {
        self.warn_on_missing_appenders
            .store(enabled, Ordering::Relaxed);
    }
}

/// 一个具名 logger 的全部状态
#[derive(Debug)]
pub(crate) struct LoggerNode {
    name: String,
    parent: Option<Arc<LoggerNode>>,
    children: Mutex<Vec<Weak<LoggerNode>>>,
    level: AtomicU8,
    additive: AtomicBool,
    appenders: AppenderList,
    /// 是否已经报告过“整条链上没有 appender”
    no_appender_warned: AtomicBool,
    context: Arc<HierarchyContext>,
    hierarchy: Weak<Hierarchy>,
}

impl LoggerNode {
    /// 构造根节点，初始级别取上下文中的默认根级别
    pub(crate) fn root(context: Arc<HierarchyContext>, hierarchy: Weak<Hierarchy>) -> Arc<Self> {
        let level = context.default_root_level;
        debug_assert!(level.is_set(), "root level must be concrete");
        Arc::new(Self {
            name: ROOT_NAME.to_string(),
            parent: None,
            children: Mutex::new(Vec::new()),
            level: AtomicU8::new(level.to_u8()),
            additive: AtomicBool::new(true),
            appenders: AppenderList::new(),
            no_appender_warned: AtomicBool::new(false),
            context,
            hierarchy,
        })
    }

    /// 按模板构造一个非根节点
    ///
    /// 父节点在类型上是必需的：没有父链的节点无法被构造出来。
    pub(crate) fn from_template(
        template: LoggerTemplate,
        parent: Arc<LoggerNode>,
        context: Arc<HierarchyContext>,
        hierarchy: Weak<Hierarchy>,
    ) -> Arc<Self> {
        let (name, level, additive, appenders) = template.into_parts();
        let list = AppenderList::new();
        for appender in appenders {
            list.add(appender);
        }
        Arc::new(Self {
            name,
            parent: Some(parent),
            children: Mutex::new(Vec::new()),
            level: AtomicU8::new(level.to_u8()),
            additive: AtomicBool::new(additive),
            appenders: list,
            no_appender_warned: AtomicBool::new(false),
            context,
            hierarchy,
        })
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn parent(&self) -> Option<&Arc<LoggerNode>> {
        self.parent.as_ref()
    }

    pub(crate) fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub(crate) fn hierarchy(&self) -> Option<Arc<Hierarchy>> {
        self.hierarchy.upgrade()
    }

    pub(crate) fn context(&self) -> &HierarchyContext {
        &self.context
    }

    pub(crate) fn link_child(&self, child: &Arc<LoggerNode>) {
        self.children.lock().push(Arc::downgrade(child));
    }

    pub(crate) fn children(&self) -> Vec<Arc<LoggerNode>> {
        self.children
            .lock()
            .iter()
            .filter_map(Weak::upgrade)
            .collect()
    }

    // --- 级别 ---

    pub(crate) fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Acquire))
    }

    pub(crate) fn set_level(&self, level: Level) -> Result<()> {
        if self.is_root() && !level.is_set() {
            return Err(HierarchyError::InvalidRootLevel);
        }
        let _guard = self.context.structure.lock();
        self.level.store(level.to_u8(), Ordering::Release);
        Ok(())
    }

    /// 从自身开始沿父链找到第一个具体级别
    ///
    /// 热路径：不分配，不加锁。
    pub(crate) fn chained_level(&self) -> Level {
        let mut node = self;
        loop {
            let level = node.level();
            if level.is_set() {
                return level;
            }
            match node.parent.as_deref() {
                Some(parent) => node = parent,
                // 根级别永远不会是 Unset
                None => return self.context.default_root_level,
            }
        }
    }

    pub(crate) fn is_enabled_for(&self, level: Level) -> bool {
        if !level.is_message_level() || self.context.is_disabled(level) {
            return false;
        }
        level >= self.chained_level()
    }

    // --- 可叠加性 ---

    pub(crate) fn is_additive(&self) -> bool {
        self.additive.load(Ordering::Acquire)
    }

    pub(crate) fn set_additive(&self, additive: bool) {
        let _guard = self.context.structure.lock();
        self.additive.store(additive, Ordering::Release);
    }

    // --- appender ---

    pub(crate) fn appenders(&self) -> &AppenderList {
        &self.appenders
    }

    pub(crate) fn add_appender(&self, appender: SharedAppender) -> bool {
        let _guard = self.context.structure.lock();
        self.appenders.add(appender)
    }

    pub(crate) fn remove_appender(&self, appender: &SharedAppender) -> Option<SharedAppender> {
        let _guard = self.context.structure.lock();
        self.appenders.remove(appender)
    }

    pub(crate) fn remove_appender_by_name(&self, name: &str) -> Option<SharedAppender> {
        let _guard = self.context.structure.lock();
        self.appenders.remove_by_name(name)
    }

    /// 移除全部 appender，并对每个被移除的 appender 调用一次 `close`
    pub(crate) fn remove_all_appenders(&self) {
        let removed = {
            let _guard = self.context.structure.lock();
            self.appenders.take_all()
        };
        for appender in removed {
            self.close_appender(&appender);
        }
    }

    /// 关闭所有 appender，但不移除
    pub(crate) fn close_nested_appenders(&self) {
        for appender in self.appenders.snapshot().iter() {
            self.close_appender(appender);
        }
    }

    pub(crate) fn close_appender(&self, appender: &SharedAppender) {
        if let Err(e) = appender.close() {
            self.context.diagnostics.increment_appender_errors();
            tracing::warn!(
                logger = %self.name,
                appender = %appender.name(),
                error = %e,
                "Failed to close appender"
            );
        }
    }

    // --- 分发 ---

    /// 沿父链把事件写给每个 appender，直到遇到非叠加节点或处理完根
    pub(crate) fn call_appenders(&self, event: &LogEvent) {
        let diagnostics = &self.context.diagnostics;
        diagnostics.increment_events_dispatched();

        let mut invoked = 0usize;
        let mut node = Some(self);
        while let Some(current) = node {
            let appenders = current.appenders.snapshot();
            for appender in appenders.iter() {
                invoked += 1;
                match panic::catch_unwind(AssertUnwindSafe(|| appender.write(event))) {
                    Ok(Ok(())) => diagnostics.increment_appender_writes(),
                    Ok(Err(e)) => {
                        diagnostics.increment_appender_errors();
                        tracing::warn!(
                            logger = %self.name,
                            appender = %appender.name(),
                            error = %e,
                            "Appender write failed"
                        );
                    }
                    Err(payload) => {
                        diagnostics.increment_appender_errors();
                        tracing::warn!(
                            logger = %self.name,
                            appender = %appender.name(),
                            panic = %panic_message(payload.as_ref()),
                            "Appender panicked during write"
                        );
                    }
                }
            }

            if !current.is_additive() {
                break;
            }
            node = current.parent.as_deref();
        }

        if invoked == 0 {
            diagnostics.increment_events_without_appenders();
            if self.context.warn_on_missing_appenders()
                && !self.no_appender_warned.swap(true, Ordering::AcqRel)
            {
                tracing::warn!(
                    logger = %self.name,
                    "No appenders could be found for logger {}; attach an appender to it or to one of its ancestors",
                    self.name
                );
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn no_appender_warned(&self) -> bool {
        self.no_appender_warned.load(Ordering::Acquire)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appender::{Appender, AppenderResult, MemoryAppender};
    use std::io;

    #[derive(Debug)]
    struct PanickingAppender;

    impl Appender for PanickingAppender {
        fn name(&self) -> &str {
            "panicking"
        }

        fn write(&self, _event: &LogEvent) -> AppenderResult<()> {
            panic!("appender exploded");
        }
    }

    /// 收集 fmt subscriber 输出的 writer
    #[derive(Clone, Default)]
    struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

    impl CapturedOutput {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl io::Write for CapturedOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture_tracing<F: FnOnce()>(f: F) -> String {
        let output = CapturedOutput::default();
        let writer = output.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        output.contents()
    }

    fn context_with(level: Level) -> Arc<HierarchyContext> {
        Arc::new(HierarchyContext::new(level, true))
    }

    fn root_with(level: Level) -> (Arc<LoggerNode>, Arc<HierarchyContext>) {
        let ctx = context_with(level);
        (LoggerNode::root(ctx.clone(), Weak::new()), ctx)
    }

    fn child(name: &str, parent: &Arc<LoggerNode>, ctx: &Arc<HierarchyContext>) -> Arc<LoggerNode> {
        let node = LoggerNode::from_template(
            LoggerTemplate::new(name),
            parent.clone(),
            ctx.clone(),
            Weak::new(),
        );
        parent.link_child(&node);
        node
    }

    #[test]
    fn test_root_requires_concrete_level() {
        let (root, _ctx) = root_with(Level::Info);
        assert!(root.is_root());
        assert_eq!(root.name(), ROOT_NAME);
        assert!(matches!(
            root.set_level(Level::Unset),
            Err(HierarchyError::InvalidRootLevel)
        ));
        assert_eq!(root.level(), Level::Info);
    }

    #[test]
    fn test_chained_level_walks_parents() {
        let (root, ctx) = root_with(Level::Info);
        let a = child("a", &root, &ctx);
        let ab = child("a.b", &a, &ctx);

        assert_eq!(ab.level(), Level::Unset);
        assert_eq!(ab.chained_level(), Level::Info);

        a.set_level(Level::Error).unwrap();
        assert_eq!(ab.chained_level(), Level::Error);

        ab.set_level(Level::Trace).unwrap();
        assert_eq!(ab.chained_level(), Level::Trace);
        assert_eq!(a.chained_level(), Level::Error);
    }

    #[test]
    fn test_is_enabled_for_edge_levels() {
        let (root, _ctx) = root_with(Level::Trace);
        assert!(!root.is_enabled_for(Level::Unset));
        assert!(!root.is_enabled_for(Level::Off));
        assert!(root.is_enabled_for(Level::Trace));

        root.set_level(Level::Off).unwrap();
        assert!(!root.is_enabled_for(Level::Fatal));
    }

    #[test]
    fn test_disable_threshold() {
        let (root, ctx) = root_with(Level::Trace);
        ctx.set_disable_threshold(Level::Info);
        assert!(!root.is_enabled_for(Level::Info));
        assert!(root.is_enabled_for(Level::Warn));
        ctx.set_disable_threshold(Level::Unset);
        assert!(root.is_enabled_for(Level::Trace));
    }

    #[test]
    fn test_children_are_weak() {
        let (root, ctx) = root_with(Level::Info);
        let a = child("a", &root, &ctx);
        assert_eq!(root.children().len(), 1);
        drop(a);
        assert!(root.children().is_empty());
    }

    #[test]
    fn test_dispatch_climbs_and_warns_once() {
        let (root, ctx) = root_with(Level::Info);
        let a = child("a", &root, &ctx);
        let event = LogEvent::new(Level::Info, "a", "no appenders");

        a.call_appenders(&event);
        assert!(a.no_appender_warned());
        assert!(!root.no_appender_warned());
        a.call_appenders(&event);
        assert_eq!(ctx.diagnostics.snapshot().events_without_appenders, 2);

        let mem = Arc::new(MemoryAppender::new("mem"));
        root.add_appender(mem.clone());
        a.call_appenders(&event);
        assert_eq!(mem.len(), 1);
    }

    #[test]
    fn test_missing_appender_warning_emitted_once_per_node() {
        let (root, ctx) = root_with(Level::Info);
        let alpha = child("alpha", &root, &ctx);
        let beta = child("beta", &root, &ctx);

        let output = capture_tracing(|| {
            for _ in 0..3 {
                alpha.call_appenders(&LogEvent::new(Level::Info, "alpha", "lost"));
                beta.call_appenders(&LogEvent::new(Level::Info, "beta", "lost"));
            }
        });

        assert_eq!(
            output
                .matches("No appenders could be found for logger alpha;")
                .count(),
            1
        );
        assert_eq!(
            output
                .matches("No appenders could be found for logger beta;")
                .count(),
            1
        );
        assert_eq!(ctx.diagnostics.snapshot().events_without_appenders, 6);
    }

    #[test]
    fn test_missing_appender_warning_can_be_switched_off() {
        let (root, ctx) = root_with(Level::Info);
        ctx.set_warn_on_missing_appenders(false);
        let quiet = child("quiet", &root, &ctx);

        let output = capture_tracing(|| {
            quiet.call_appenders(&LogEvent::new(Level::Info, "quiet", "lost"));
        });

        assert!(!output.contains("No appenders could be found"));
        assert!(!quiet.no_appender_warned());
    }

    #[test]
    fn test_panicking_appender_does_not_abort_dispatch() {
        let (root, ctx) = root_with(Level::Info);
        let node = child("p", &root, &ctx);
        let sibling = Arc::new(MemoryAppender::new("sibling"));
        let ancestor = Arc::new(MemoryAppender::new("ancestor"));
        node.add_appender(Arc::new(PanickingAppender));
        node.add_appender(sibling.clone());
        root.add_appender(ancestor.clone());

        let event = LogEvent::new(Level::Error, "p", "survives");
        let output = capture_tracing(|| {
            let result = panic::catch_unwind(AssertUnwindSafe(|| node.call_appenders(&event)));
            assert!(result.is_ok());
        });

        assert_eq!(sibling.messages(), vec!["survives"]);
        assert_eq!(ancestor.messages(), vec!["survives"]);
        let stats = ctx.diagnostics.snapshot();
        assert_eq!(stats.appender_errors, 1);
        assert_eq!(stats.appender_writes, 2);
        assert!(output.contains("Appender panicked during write"));
        assert!(output.contains("appender exploded"));
    }

    #[test]
    fn test_panic_message_payloads() {
        let static_payload: Box<dyn Any + Send> = Box::new("static");
        let owned_payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let other_payload: Box<dyn Any + Send> = Box::new(7u32);
        assert_eq!(panic_message(static_payload.as_ref()), "static");
        assert_eq!(panic_message(owned_payload.as_ref()), "owned");
        assert_eq!(panic_message(other_payload.as_ref()), "non-string panic payload");
    }
}
