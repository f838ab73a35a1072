use std::{
    sync::Arc,
    time::SystemTime,
};

use crate::{LogSink, ToggleController};

/// The invocation-time logging protocol shared by every proxy.
///
/// One recorder is created per wrapped component, binding the shared toggle
/// to the component's log sink. [`record`](CallRecorder::record) runs once
/// per intercepted call, synchronously on the calling thread:
///
/// 1. reads the toggle once,
/// 2. writes the start line (with a millisecond epoch timestamp when the
///    toggle is on),
/// 3. delegates to the real method,
/// 4. writes the end line with the rendered return value.
///
/// Line shapes, kept structurally comparable between calls:
///
/// ```text
/// quote - start; symbol = BTC, amount = 3
/// quote - end; 6
/// quote - start; symbol = BTC, amount = 3; profiling: 1761734400123
/// quote - end; 6; profiling: 1761734400124
/// ```
///
/// The toggle is read exactly once, so flipping it mid-call never changes
/// the shape of a pair already in flight. A panic in the delegated call
/// unwinds through the recorder untouched and the end line is skipped. No
/// lock is held across the delegated call and no per-call state outlives
/// the call, so one recorder is safe to use from many threads at once.
#[derive(Clone)]
pub struct CallRecorder {
    toggle: Arc<ToggleController>,
    sink: Arc<dyn LogSink>,
}

impl CallRecorder {
    pub fn new(toggle: Arc<ToggleController>, sink: Arc<dyn LogSink>) -> Self {
        Self { toggle, sink }
    }

    /// Run `call` between a start and an end log line.
    ///
    /// `binding` is the pre-formatted `"name = value"` argument list (empty
    /// for zero-parameter methods) and `render` turns the return value into
    /// its logged form - the empty string for unit returns, never a
    /// null-like token.
    pub fn record<R>(
        &self,
        method: &'static str,
        binding: &str,
        call: impl FnOnce() -> R,
        render: impl FnOnce(&R) -> String,
    ) -> R {
        if self.toggle.is_enabled() {
            let start = epoch_millis();
            self.sink
                .info(&format!("{method} - start; {binding}; profiling: {start}"));
            let ret = call();
            let end = epoch_millis();
            self.sink
                .info(&format!("{method} - end; {}; profiling: {end}", render(&ret)));
            ret
        } else {
            self.sink.info(&format!("{method} - start; {binding}"));
            let ret = call();
            self.sink.info(&format!("{method} - end; {}", render(&ret)));
            ret
        }
    }
}

impl std::fmt::Debug for CallRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallRecorder")
            .field("enabled", &self.toggle.is_enabled())
            .finish()
    }
}

/// Milliseconds since Unix epoch.
///
/// # Panics
///
/// Panics if the system clock is set before the Unix epoch.
fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .expect("SystemTime before Unix epoch")
        .as_millis()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Lines(Mutex<Vec<String>>);

    impl LogSink for Lines {
        fn info(&self, line: &str) {
            self.0.lock().expect("lines lock poisoned").push(line.into());
        }
    }

    fn recorder() -> (CallRecorder, Arc<Lines>, Arc<ToggleController>) {
        let toggle = Arc::new(ToggleController::new());
        let lines = Arc::new(Lines::default());
        let recorder = CallRecorder::new(toggle.clone(), lines.clone());
        (recorder, lines, toggle)
    }

    #[test]
    fn test_lines_without_timestamps_when_disabled() {
        let (recorder, lines, _) = recorder();
        let ret = recorder.record("quote", "symbol = BTC, amount = 3", || 6, |r| r.to_string());
        assert_eq!(ret, 6);

        let lines = lines.0.lock().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "quote - start; symbol = BTC, amount = 3");
        assert_eq!(lines[1], "quote - end; 6");
    }

    #[test]
    fn test_lines_with_timestamps_when_enabled() {
        let (recorder, lines, toggle) = recorder();
        toggle.set_enabled(true);
        recorder.record("refresh", "", || (), |_| String::new());

        let lines = lines.0.lock().unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("refresh - start; ; profiling: "));
        assert!(lines[1].starts_with("refresh - end; ; profiling: "));
        for line in lines.iter() {
            let millis = line
                .rsplit("profiling: ")
                .next()
                .and_then(|ts| ts.parse::<u128>().ok());
            assert!(millis.is_some(), "timestamp missing in '{line}'");
        }
    }

    #[test]
    fn test_end_line_skipped_on_panic() {
        let (recorder, lines, _) = recorder();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            recorder.record("explode", "", || panic!("boom"), |_: &()| String::new())
        }));
        assert!(result.is_err());

        let lines = lines.0.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0], "explode - start; ");
    }
}
