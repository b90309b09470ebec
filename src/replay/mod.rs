//! Live keystroke replay
//!
//! Re-injects a decoded event stream into the operating system. The engine
//! keeps track of which modifiers it is holding on the target and releases
//! every one of them before it returns, whether the stream finished, the
//! operator cancelled, or the injector failed.
//!
//! The engine does not check which window has focus. Pointing the replay at
//! the right window is up to the operator.

mod console;
mod engine;
mod injector;

pub use console::{parse_signal_key, spawn_stop_watcher, AutoStart, DeviceConsole, OperatorConsole};
pub use engine::{HoldOrder, ReplayEngine, ReplayOutcome, ReplaySettings, ReplayStatus};
pub use injector::KeyInjector;

#[cfg(feature = "virtual-send")]
pub use injector::EnigoInjector;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors raised while replaying
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplayError {
    /// The injection backend could not be created
    #[error("failed to initialise key injection: {0}")]
    Init(String),
    /// The backend rejected an action
    #[error("{action} failed: {reason}")]
    Inject { action: String, reason: String },
    /// The backend has no way to produce this key
    #[error("key {0} cannot be injected on this platform")]
    UnsupportedKey(String),
}

/// Granularity of cancellable sleeps
const SLEEP_SLICE: Duration = Duration::from_millis(10);

/// Cooperative cancellation flag shared between the replay loop, the
/// interrupt handler and the stop-key watcher
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Sleep for `duration`, waking early on cancellation.
    ///
    /// Returns `false` when cancelled.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if self.is_cancelled() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep(SLEEP_SLICE.min(deadline - now));
        }
    }
}
