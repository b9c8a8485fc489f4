//! Instrumentation collaborator interfaces.
//!
//! The native-frames and stall-tracking samplers, and the native layer that
//! owns app-start timing, live outside this crate. These traits are the seams
//! the coordinator drives them through.

use async_trait::async_trait;

use crate::app_start::AppStartData;
use crate::transaction::Transaction;

/// Start/finish hooks implemented by the native-frames and stall-tracking
/// collaborators.
///
/// Start hooks fire only for transactions whose start timestamp is near
/// "now"; finish hooks fire unconditionally, because cost-measurement windows
/// are computed independently of back-dating.
pub trait InstrumentationHook {
    /// Called when a genuinely new transaction starts.
    fn on_transaction_start(&mut self, transaction: &Transaction);

    /// Called when a transaction finishes, before it is sealed.
    fn on_transaction_finish(&mut self, transaction: &Transaction, end_timestamp_ms: Option<u64>);
}

/// The native layer: app-start timing source and frame-tracking switch.
///
/// `?Send` because the coordinator runs on a single cooperative execution
/// context; the fetch suspends the caller without blocking it and resumes on
/// the same queue.
#[async_trait(?Send)]
pub trait NativeLayer {
    /// Whether the native layer is available at all.
    fn is_enabled(&self) -> bool;

    /// Fetches the one-shot app-start data.
    ///
    /// At most one meaningful delivery per process: after the first, the
    /// native layer either returns `None` or data flagged `already_fetched`.
    async fn fetch_app_start(&self) -> Option<AppStartData>;

    /// Turns native frame tracking on.
    fn enable_native_frames_tracking(&self);

    /// Turns native frame tracking off.
    fn disable_native_frames_tracking(&self);
}
