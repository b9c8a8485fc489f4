//! App-start correlation.
//!
//! The native layer reports one-shot app-start timing data (begin timestamp,
//! cold/warm). Once an anchoring transaction exists and the first meaningful
//! render has stamped the finish timestamp, [`attach_app_start`] hangs a
//! synthetic child span off the transaction and records a duration
//! measurement.
//!
//! App starts measured at 60 seconds or more are a known data-quality defect
//! (prior process generations can leave begin timestamps hours or days in the
//! past). For those the child span is still attached — the trace records what
//! happened — but the aggregate measurement is suppressed.

use serde::{Deserialize, Serialize};

use crate::transaction::{APP_START_COLD_OP, APP_START_WARM_OP, Transaction};

/// Measurement name for cold app starts.
pub const APP_START_COLD_MEASUREMENT: &str = "app_start_cold";
/// Measurement name for warm app starts.
pub const APP_START_WARM_MEASUREMENT: &str = "app_start_warm";

/// App starts at or above this duration attach a span but record no
/// measurement.
pub const MAX_APP_START_MS: u64 = 60_000;

/// One-shot native app-start timing data.
///
/// The native layer guarantees idempotent single delivery: `already_fetched`
/// is set on every fetch after the first meaningful one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppStartData {
    /// App-start begin timestamp in milliseconds.
    pub begin_timestamp_ms: u64,
    /// Whether this was a cold start (process created) or a warm start.
    pub is_cold_start: bool,
    /// Set when this data was already delivered once.
    pub already_fetched: bool,
}

/// Attaches app-start data to a transaction.
///
/// Requires the app-start finish timestamp (stamped when the first meaningful
/// render completes); without it the app start is considered never finished
/// and is dropped with a warning, leaving the transaction untouched.
///
/// The child span always covers `[begin, finish]`; the cold/warm measurement
/// is recorded only for durations below [`MAX_APP_START_MS`].
pub fn attach_app_start(
    transaction: &mut Transaction,
    app_start: &AppStartData,
    finish_timestamp_ms: Option<u64>,
) {
    let Some(finish_ms) = finish_timestamp_ms else {
        tracing::warn!(
            transaction = transaction.name(),
            "app start was never finished; dropping app start data"
        );
        return;
    };

    let (op, description) = if app_start.is_cold_start {
        (APP_START_COLD_OP, "Cold App Start")
    } else {
        (APP_START_WARM_OP, "Warm App Start")
    };
    transaction.start_child(description, op, app_start.begin_timestamp_ms, finish_ms);

    let duration_ms = finish_ms.saturating_sub(app_start.begin_timestamp_ms);
    if duration_ms >= MAX_APP_START_MS {
        tracing::debug!(
            duration_ms,
            "app start exceeds the sanity ceiling; span attached, measurement suppressed"
        );
        return;
    }

    let measurement = if app_start.is_cold_start {
        APP_START_COLD_MEASUREMENT
    } else {
        APP_START_WARM_MEASUREMENT
    };
    #[allow(clippy::cast_precision_loss)]
    transaction.set_measurement(measurement, duration_ms as f64, "millisecond");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::{TransactionContext, UI_LOAD_OP};

    fn cold_start(begin_ms: u64) -> AppStartData {
        AppStartData {
            begin_timestamp_ms: begin_ms,
            is_cold_start: true,
            already_fetched: false,
        }
    }

    fn ui_load_transaction() -> Transaction {
        Transaction::from_context(&TransactionContext::new("App Start", UI_LOAD_OP), 0)
    }

    #[test]
    fn attaches_span_and_measurement_for_a_normal_cold_start() {
        let mut tx = ui_load_transaction();
        attach_app_start(&mut tx, &cold_start(100), Some(2_100));

        let span = &tx.child_spans()[0];
        assert_eq!(span.op, APP_START_COLD_OP);
        assert_eq!(span.description, "Cold App Start");
        assert_eq!((span.start_timestamp_ms, span.end_timestamp_ms), (100, 2_100));

        let measurement = &tx.measurements()[APP_START_COLD_MEASUREMENT];
        assert!((measurement.value - 2_000.0).abs() < f64::EPSILON);
        assert_eq!(measurement.unit, "millisecond");
    }

    #[test]
    fn warm_start_uses_the_warm_op_and_measurement() {
        let mut tx = ui_load_transaction();
        let warm = AppStartData {
            is_cold_start: false,
            ..cold_start(0)
        };
        attach_app_start(&mut tx, &warm, Some(500));
        assert_eq!(tx.child_spans()[0].op, APP_START_WARM_OP);
        assert!(tx.measurements().contains_key(APP_START_WARM_MEASUREMENT));
    }

    #[test]
    fn no_finish_timestamp_means_no_mutation() {
        let mut tx = ui_load_transaction();
        attach_app_start(&mut tx, &cold_start(100), None);
        assert!(tx.child_spans().is_empty());
        assert!(tx.measurements().is_empty());
    }

    #[test]
    fn measurement_recorded_just_below_the_ceiling() {
        let mut tx = ui_load_transaction();
        attach_app_start(&mut tx, &cold_start(1), Some(60_000));
        assert_eq!(tx.child_spans().len(), 1);
        assert!(tx.measurements().contains_key(APP_START_COLD_MEASUREMENT));
    }

    #[test]
    fn measurement_suppressed_at_the_ceiling_but_span_kept() {
        let mut tx = ui_load_transaction();
        attach_app_start(&mut tx, &cold_start(0), Some(60_000));
        assert_eq!(tx.child_spans().len(), 1, "span records what happened");
        assert!(tx.measurements().is_empty(), "outlier measurement dropped");
    }
}
