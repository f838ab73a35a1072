use std::sync::atomic::{AtomicBool, Ordering};

/// The process-wide switch for timestamp capture.
///
/// Read by every wrapper on every intercepted call and written by the
/// operator through the [`management`](crate::management) registry. A single
/// instance is shared by all wrappers in the process; it starts disabled on
/// every process start and is never persisted.
///
/// Reads and writes use relaxed atomics - the flag guards no other data, so
/// the only requirement is that readers eventually observe the latest write
/// without torn values.
#[derive(Debug, Default)]
pub struct ToggleController {
    enabled: AtomicBool,
}

impl ToggleController {
    /// A new controller with timing capture disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether timing capture is currently on.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Turn timing capture on or off for the whole process.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_by_default() {
        assert!(!ToggleController::new().is_enabled());
    }

    #[test]
    fn test_set_and_read_back() {
        let toggle = ToggleController::new();
        toggle.set_enabled(true);
        assert!(toggle.is_enabled());
        toggle.set_enabled(false);
        assert!(!toggle.is_enabled());
    }
}
