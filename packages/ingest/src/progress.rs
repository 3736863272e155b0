//! Progress reporting for source loading.
//!
//! Loading a large sighting CSV over the network can take a while. The loader
//! reports through [`ProgressCallback`] so binaries can render a progress bar
//! while library callers and tests pass [`null_progress()`].

use std::sync::Arc;

/// Receives progress updates from [`crate::source::load_clean_dataset`].
pub trait ProgressCallback: Send + Sync {
    /// Advance by `delta` records parsed.
    fn inc(&self, delta: u64);

    /// Update the message shown next to the indicator.
    fn set_message(&self, msg: String);

    /// Mark loading as finished.
    fn finish(&self, msg: String);
}

/// Ignores every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`].
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
