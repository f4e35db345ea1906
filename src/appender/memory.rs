//! 内存 Appender
//!
//! 把收到的事件保存在内存中，便于测试和运行时检查。

use crate::appender::traits::{Appender, AppenderError, AppenderResult};
use crate::core::event::LogEvent;
use std::sync::atomic::{AtomicUsize, Ordering};
use parking_lot::Mutex;

/// 内存 Appender
#[derive(Debug)]
pub struct MemoryAppender {
    name: String,
    events: Mutex<Vec<LogEvent>>,
    close_count: AtomicUsize,
}

impl MemoryAppender {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            events: Mutex::new(Vec::new()),
            close_count: AtomicUsize::new(0),
        }
    }

    /// 已记录事件的副本
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().clone()
    }

    /// 已记录事件的消息
    pub fn messages(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .map(|e| e.message.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// `close` 被调用的次数
    pub fn close_count(&self) -> usize {
        self.close_count.load(Ordering::Acquire)
    }

    pub fn is_closed(&self) -> bool {
        self.close_count() > 0
    }
}

impl Appender for MemoryAppender {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&self, event: &LogEvent) -> AppenderResult<()> {
        if self.is_closed() {
            return Err(AppenderError::Closed(self.name.clone()));
        }
        self.events.lock().push(event.clone());
        Ok(())
    }

    fn close(&self) -> AppenderResult<()> {
        self.close_count.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Level;

    #[test]
    fn test_records_events() {
        let appender = MemoryAppender::new("mem");
        appender.write(&LogEvent::new(Level::Info, "a", "one")).unwrap();
        appender.write(&LogEvent::new(Level::Warn, "a.b", "two")).unwrap();
        assert_eq!(appender.len(), 2);
        assert_eq!(appender.messages(), vec!["one", "two"]);
        assert_eq!(appender.events()[1].logger, "a.b");

        appender.clear();
        assert!(appender.is_empty());
    }

    #[test]
    fn test_close_counts_and_rejects_writes() {
        let appender = MemoryAppender::new("mem");
        assert!(!appender.is_closed());
        appender.close().unwrap();
        assert_eq!(appender.close_count(), 1);
        let result = appender.write(&LogEvent::new(Level::Info, "a", "late"));
        assert!(matches!(result, Err(AppenderError::Closed(_))));
        assert!(appender.is_empty());
    }
}
