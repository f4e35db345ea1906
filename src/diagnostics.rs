//! 定义 QuantumHierarchy 的内部诊断与指标。
//!
//! 每个 `Hierarchy` 持有一个 `Diagnostics` 实例，记录 logger 创建、
//! 事件分发以及 appender 失败等情况。

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// 内部诊断与指标数据结构。
///
/// 使用原子操作确保线程安全，分发热路径上只做 `Relaxed` 自增。
#[derive(Debug, Default)]
pub struct Diagnostics {
    /// 创建时间
    start_time: Option<Instant>,

    /// 已创建的 logger 节点数（不含根）
    loggers_created: AtomicU64,

    /// 已分发的日志事件数
    events_dispatched: AtomicU64,

    /// 因级别未启用而被跳过的日志请求数
    events_suppressed: AtomicU64,

    /// 成功的 appender 写入次数
    appender_writes: AtomicU64,

    /// 失败的 appender 写入或关闭次数
    appender_errors: AtomicU64,

    /// 整条祖先链上没有任何 appender 的事件数
    events_without_appenders: AtomicU64,
}

/// 诊断数据的快照，用于外部查询。
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticsSnapshot {
    /// 运行时间
    pub uptime: Option<Duration>,

    pub loggers_created: u64,

    pub events_dispatched: u64,

    pub events_suppressed: u64,

    pub appender_writes: u64,

    pub appender_errors: u64,

    pub events_without_appenders: u64,

    /// appender 写入成功率（百分比）
    pub write_success_rate_percent: f64,
}

impl Diagnostics {
    /// 创建新的诊断实例。
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    pub fn increment_loggers_created(&self) {
        self.loggers_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_events_dispatched(&self) {
        self.events_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_events_suppressed(&self) {
        self.events_suppressed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_appender_writes(&self) {
        self.appender_writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_appender_errors(&self) {
        self.appender_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_events_without_appenders(&self) {
        self.events_without_appenders.fetch_add(1, Ordering::Relaxed);
    }

    /// 获取诊断数据的快照。
    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        let appender_writes = self.appender_writes.load(Ordering::Relaxed);
        let appender_errors = self.appender_errors.load(Ordering::Relaxed);

        let write_success_rate_percent = if appender_writes + appender_errors > 0 {
            (appender_writes as f64 / (appender_writes + appender_errors) as f64) * 100.0
        } else {
            100.0
        };

        DiagnosticsSnapshot {
            uptime: self.start_time.map(|start| start.elapsed()),
            loggers_created: self.loggers_created.load(Ordering::Relaxed),
            events_dispatched: self.events_dispatched.load(Ordering::Relaxed),
            events_suppressed: self.events_suppressed.load(Ordering::Relaxed),
            appender_writes,
            appender_errors,
            events_without_appenders: self.events_without_appenders.load(Ordering::Relaxed),
            write_success_rate_percent,
        }
    }

    /// 重置事件计数器（主要用于测试）。
    ///
    /// `loggers_created` 反映的是树的结构，不随之清零。
    pub fn reset(&self) {
        self.events_dispatched.store(0, Ordering::Relaxed);
        self.events_suppressed.store(0, Ordering::Relaxed);
        self.appender_writes.store(0, Ordering::Relaxed);
        self.appender_errors.store(0, Ordering::Relaxed);
        self.events_without_appenders.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_diagnostics_creation() {
        let diagnostics = Diagnostics::new();
        let snapshot = diagnostics.snapshot();

        assert!(snapshot.uptime.is_some());
        assert_eq!(snapshot.loggers_created, 0);
        assert_eq!(snapshot.events_dispatched, 0);
        assert_eq!(snapshot.appender_errors, 0);
        assert_eq!(snapshot.write_success_rate_percent, 100.0);
    }

    #[test]
    fn test_success_rate_calculation() {
        let diagnostics = Diagnostics::new();

        for _ in 0..3 {
            diagnostics.increment_appender_writes();
        }
        diagnostics.increment_appender_errors();

        let snapshot = diagnostics.snapshot();
        assert_eq!(snapshot.appender_writes, 3);
        assert_eq!(snapshot.appender_errors, 1);
        assert_eq!(snapshot.write_success_rate_percent, 75.0);
    }

    #[test]
    fn test_reset_keeps_structure_counter() {
        let diagnostics = Diagnostics::new();

        diagnostics.increment_loggers_created();
        diagnostics.increment_events_dispatched();
        diagnostics.increment_events_suppressed();
        diagnostics.increment_events_without_appenders();

        diagnostics.reset();

        let snapshot = diagnostics.snapshot();
        assert_eq!(snapshot.loggers_created, 1);
        assert_eq!(snapshot.events_dispatched, 0);
        assert_eq!(snapshot.events_suppressed, 0);
        assert_eq!(snapshot.events_without_appenders, 0);
    }

    #[test]
    fn test_concurrent_access() {
        let diagnostics = Arc::new(Diagnostics::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let diagnostics_clone = diagnostics.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    diagnostics_clone.increment_events_dispatched();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(diagnostics.snapshot().events_dispatched, 1000);
    }

    #[test]
    fn test_only_errors() {
        let diagnostics = Diagnostics::new();
        diagnostics.increment_appender_errors();
        assert_eq!(diagnostics.snapshot().write_success_rate_percent, 0.0);
    }
}
