//! Cooperative cancellation and progress reporting hooks.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde_json::json;

/// Polled by the driver between iterations; never blocks.
pub trait TerminationFlag {
    fn running(&self) -> bool;
}

/// Never asks to stop.
#[derive(Clone, Copy, Debug, Default)]
pub struct RunningTrue;

impl TerminationFlag for RunningTrue {
    fn running(&self) -> bool {
        true
    }
}

/// A flag another thread can flip through any clone.
#[derive(Clone, Debug, Default)]
pub struct StopFlag {
    stopped: Arc<AtomicBool>,
}

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed)
    }
}

impl TerminationFlag for StopFlag {
    fn running(&self) -> bool {
        !self.stopped.load(Ordering::Relaxed)
    }
}

/// Stops once the wall clock passes a fixed instant.
#[derive(Clone, Copy, Debug)]
pub struct Deadline(pub Instant);

impl TerminationFlag for Deadline {
    fn running(&self) -> bool {
        Instant::now() < self.0
    }
}

/// Receives the settled fraction of nodes after each iteration.
///
/// Reporting is best-effort: implementations swallow their own failures.
pub trait ProgressSink {
    fn log_progress(&self, fraction: f64);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn log_progress(&self, _fraction: f64) {}
}

/// Forwards progress as `tracing` events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn log_progress(&self, fraction: f64) {
        tracing::info!(progress = fraction, "k1 coloring");
    }
}

/// Writes one JSON object per report, e.g. `{"k1coloring_progress":0.5}`.
pub struct JsonProgress<W> {
    out: Mutex<W>,
}

impl<W: Write> JsonProgress<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write> ProgressSink for JsonProgress<W> {
    fn log_progress(&self, fraction: f64) {
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        let line = json!({ "k1coloring_progress": fraction });
        if let Err(e) = writeln!(out, "{}", line) {
            tracing::warn!(error = %e, "dropping progress report");
        }
    }
}

impl<P: ProgressSink + ?Sized> ProgressSink for &P {
    fn log_progress(&self, fraction: f64) {
        (**self).log_progress(fraction)
    }
}

impl<T: TerminationFlag + ?Sized> TerminationFlag for &T {
    fn running(&self) -> bool {
        (**self).running()
    }
}
