// src/engine/teardown.rs

//! One-shot teardown after the first failure.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use crate::console::{Console, failure_notice};
use crate::exec::ChildRegistry;

/// Flips from `false` to `true` at most once.
#[derive(Debug, Default)]
pub struct FailureLatch(AtomicBool);

impl FailureLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` only for the call that performed the transition.
    pub fn trip(&self) -> bool {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// Kills every live child and reports the offending directory, once.
#[derive(Debug)]
pub struct TeardownController {
    latch: FailureLatch,
    console: Arc<dyn Console>,
}

impl TeardownController {
    pub fn new(console: Arc<dyn Console>) -> Self {
        Self {
            latch: FailureLatch::new(),
            console,
        }
    }

    /// Signal every child in `registry` to terminate and print the failure
    /// notice for `offending`.
    ///
    /// Only the first call does anything; it returns `true`. Later calls
    /// return `false` without touching the registry or the console.
    pub fn abort(&self, offending: &Path, registry: &mut ChildRegistry) -> bool {
        if !self.latch.trip() {
            debug!(directory = ?offending, "teardown already performed; ignoring");
            return false;
        }

        let signalled = registry.signal_all();
        info!(directory = ?offending, signalled, "task failed; terminating remaining tasks");
        self.console.write_str(&failure_notice(offending));
        true
    }
}
