use crate::core::config::ExecConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Per-task state shared by the operators of one tree.
///
/// Cloning is cheap and every clone observes the same stop flag, so the
/// driver (or another thread) can abort a running tree between pulls.
#[derive(Debug, Clone, Default)]
pub struct TaskContext {
    config: Arc<ExecConfig>,
    stopped: Arc<AtomicBool>,
}

impl TaskContext {
    pub fn new(config: ExecConfig) -> Self {
        Self { config: Arc::new(config), stopped: Arc::new(AtomicBool::new(false)) }
    }

    pub fn config(&self) -> &ExecConfig {
        &self.config
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_flag_is_shared_between_clones() {
        let ctx = TaskContext::new(ExecConfig::default());
        let handle = ctx.clone();
        assert!(!ctx.is_stopped());

        std::thread::spawn(move || handle.stop()).join().unwrap();
        assert!(ctx.is_stopped());
    }
}
