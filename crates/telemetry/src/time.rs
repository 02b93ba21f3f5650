// Path: crates/telemetry/src/time.rs
use crate::sinks::HostMetricsSink;
use std::time::Instant;

/// Reports the elapsed time of one host call when dropped.
pub struct Timer<'a> {
    sink: &'a dyn HostMetricsSink,
    call: &'static str,
    start: Instant,
}

impl<'a> Timer<'a> {
    pub fn new(sink: &'a dyn HostMetricsSink, call: &'static str) -> Self {
        Self {
            sink,
            call,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer<'_> {
    fn drop(&mut self) {
        self.sink
            .observe_host_call_duration(self.call, self.start.elapsed().as_secs_f64());
    }
}
