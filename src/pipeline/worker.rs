//! Blocking stages on a worker thread with an optional time budget.

use crate::error::{ForecastError, Result};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// Run `task` on its own thread and wait for its result.
///
/// With a `timeout`, waiting stops after that long and the caller gets
/// [`ForecastError::Timeout`]; the worker is detached and its result is
/// dropped when it eventually finishes. A panic in the worker is resumed
/// on the calling thread.
pub fn run_blocking<T, F>(stage: &'static str, timeout: Option<Duration>, task: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let (sender, receiver) = mpsc::channel();
    let handle = thread::Builder::new()
        .name(format!("{stage}-worker"))
        .spawn(move || {
            // The receiver is gone after a timeout.
            let _ = sender.send(task());
        })
        .map_err(|e| ForecastError::Output(format!("cannot start {stage} worker: {e}")))?;

    let received = match timeout {
        Some(limit) => receiver.recv_timeout(limit),
        None => receiver.recv().map_err(|_| RecvTimeoutError::Disconnected),
    };

    match received {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            let seconds = timeout.map(|t| t.as_secs()).unwrap_or_default();
            tracing::warn!(stage, seconds, "stage timed out, detaching worker");
            Err(ForecastError::Timeout { stage, seconds })
        }
        Err(RecvTimeoutError::Disconnected) => match handle.join() {
            Err(payload) => std::panic::resume_unwind(payload),
            Ok(()) => unreachable!("{stage} worker exited without sending a result"),
        },
    }
}
