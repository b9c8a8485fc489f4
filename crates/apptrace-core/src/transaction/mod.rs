//! Transaction data model.
//!
//! A [`Transaction`] is a named, timed unit of work with an operation tag, a
//! sampling decision, child spans, and a measurement map. It is owned
//! exclusively by whichever controller created it until it finishes; after
//! finish it is sealed (end timestamp set) and handed to the reporting
//! pipeline through the hub.

pub mod idle;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Operation tag for the first route transaction of a session (UI load).
pub const UI_LOAD_OP: &str = "ui.load";
/// Operation tag for the cold app-start child span.
pub const APP_START_COLD_OP: &str = "app.start.cold";
/// Operation tag for the warm app-start child span.
pub const APP_START_WARM_OP: &str = "app.start.warm";
/// Default operation tag for navigation transactions.
pub const NAVIGATION_OP: &str = "navigation";

/// Completion status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanStatus {
    /// Finished normally.
    Ok,
    /// Explicitly cancelled before it could finish on its own.
    Cancelled,
    /// Hit the final timeout (hard cap on duration).
    DeadlineExceeded,
}

/// Route metadata carried by navigation transaction contexts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteData {
    /// Name of the destination route.
    pub name: String,
    /// Whether this route has been visited before in this session.
    pub has_been_seen: bool,
    /// Name of the route navigated away from, if any.
    pub previous_route: Option<String>,
}

/// Immutable construction record for a transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionContext {
    /// Transaction name.
    pub name: String,
    /// Operation tag.
    pub op: String,
    /// Route metadata, for navigation transactions.
    pub route: Option<RouteData>,
    /// Pre-set sampling decision; `None` defers to the hub's default.
    pub sampled: Option<bool>,
    /// Explicit start timestamp; `None` means "now".
    pub start_timestamp_ms: Option<u64>,
    /// Clamp the end timestamp to the last child span's end at finish.
    pub trim_end: bool,
}

impl TransactionContext {
    /// Creates a context with just a name and operation tag.
    #[must_use]
    pub fn new(name: impl Into<String>, op: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            op: op.into(),
            ..Self::default()
        }
    }

    /// Returns the context with `trim_end` set.
    #[must_use]
    pub fn with_trim_end(mut self) -> Self {
        self.trim_end = true;
        self
    }

    /// Returns the context with the given route metadata.
    #[must_use]
    pub fn with_route(mut self, route: RouteData) -> Self {
        self.route = Some(route);
        self
    }
}

/// A named measurement attached to a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Measured value.
    pub value: f64,
    /// Unit of the value, e.g. `"millisecond"`.
    pub unit: String,
}

/// A nested timed operation attached to a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildSpan {
    /// Span ID.
    pub id: Uuid,
    /// Human-readable description, e.g. `"Cold App Start"`.
    pub description: String,
    /// Operation tag.
    pub op: String,
    /// Start timestamp in milliseconds.
    pub start_timestamp_ms: u64,
    /// End timestamp in milliseconds.
    pub end_timestamp_ms: u64,
}

/// A named, timed unit of work.
///
/// The child-span list never contains the transaction's own root span, so
/// "has no child spans" checks are a plain `is_empty()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    id: Uuid,
    name: String,
    op: String,
    start_timestamp_ms: u64,
    end_timestamp_ms: Option<u64>,
    status: Option<SpanStatus>,
    sampled: bool,
    route: Option<RouteData>,
    child_spans: Vec<ChildSpan>,
    measurements: BTreeMap<String, Measurement>,
}

impl Transaction {
    /// Creates a new transaction from a context.
    ///
    /// `sampled` defaults to `true` when the context carries no pre-set
    /// decision; the hub's sampler may refine this before handing the
    /// transaction out.
    #[must_use]
    pub fn from_context(context: &TransactionContext, start_timestamp_ms: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: context.name.clone(),
            op: context.op.clone(),
            start_timestamp_ms: context.start_timestamp_ms.unwrap_or(start_timestamp_ms),
            end_timestamp_ms: None,
            status: None,
            sampled: context.sampled.unwrap_or(true),
            route: context.route.clone(),
            child_spans: Vec::new(),
            measurements: BTreeMap::new(),
        }
    }

    /// Returns the transaction ID.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the transaction name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the operation tag.
    #[must_use]
    pub fn op(&self) -> &str {
        &self.op
    }

    /// Overwrites the operation tag.
    pub fn set_op(&mut self, op: impl Into<String>) {
        self.op = op.into();
    }

    /// Returns the start timestamp in milliseconds.
    #[must_use]
    pub const fn start_timestamp_ms(&self) -> u64 {
        self.start_timestamp_ms
    }

    /// Overwrites the start timestamp (used when back-dating to app start).
    pub fn set_start_timestamp_ms(&mut self, start_timestamp_ms: u64) {
        self.start_timestamp_ms = start_timestamp_ms;
    }

    /// Returns the end timestamp, set once the transaction is sealed.
    #[must_use]
    pub const fn end_timestamp_ms(&self) -> Option<u64> {
        self.end_timestamp_ms
    }

    pub(crate) fn set_end_timestamp_ms(&mut self, end_timestamp_ms: u64) {
        self.end_timestamp_ms = Some(end_timestamp_ms);
    }

    /// Returns the completion status, if one was set.
    #[must_use]
    pub const fn status(&self) -> Option<SpanStatus> {
        self.status
    }

    /// Sets the completion status.
    pub fn set_status(&mut self, status: SpanStatus) {
        self.status = Some(status);
    }

    /// Returns the sampling decision.
    #[must_use]
    pub const fn sampled(&self) -> bool {
        self.sampled
    }

    /// Overrides the sampling decision.
    pub fn set_sampled(&mut self, sampled: bool) {
        self.sampled = sampled;
    }

    /// Returns the route metadata, if this is a navigation transaction.
    #[must_use]
    pub const fn route(&self) -> Option<&RouteData> {
        self.route.as_ref()
    }

    /// Returns the child spans (the root span is not included).
    #[must_use]
    pub fn child_spans(&self) -> &[ChildSpan] {
        &self.child_spans
    }

    /// Attaches a completed child span and returns its ID.
    pub fn start_child(
        &mut self,
        description: impl Into<String>,
        op: impl Into<String>,
        start_timestamp_ms: u64,
        end_timestamp_ms: u64,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.child_spans.push(ChildSpan {
            id,
            description: description.into(),
            op: op.into(),
            start_timestamp_ms,
            end_timestamp_ms,
        });
        id
    }

    /// Returns the measurement map.
    #[must_use]
    pub const fn measurements(&self) -> &BTreeMap<String, Measurement> {
        &self.measurements
    }

    /// Records a named measurement.
    pub fn set_measurement(&mut self, name: impl Into<String>, value: f64, unit: impl Into<String>) {
        self.measurements.insert(
            name.into(),
            Measurement {
                value,
                unit: unit.into(),
            },
        );
    }

    /// Returns the end-minus-start duration once sealed.
    #[must_use]
    pub fn duration_ms(&self) -> Option<u64> {
        self.end_timestamp_ms
            .map(|end| end.saturating_sub(self.start_timestamp_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_context_uses_explicit_start_over_now() {
        let context = TransactionContext {
            start_timestamp_ms: Some(250),
            ..TransactionContext::new("Home", NAVIGATION_OP)
        };
        let tx = Transaction::from_context(&context, 1_000);
        assert_eq!(tx.start_timestamp_ms(), 250);

        let tx = Transaction::from_context(&TransactionContext::new("Home", NAVIGATION_OP), 1_000);
        assert_eq!(tx.start_timestamp_ms(), 1_000);
    }

    #[test]
    fn presampled_context_overrides_default_decision() {
        let context = TransactionContext {
            sampled: Some(false),
            ..TransactionContext::new("Home", NAVIGATION_OP)
        };
        assert!(!Transaction::from_context(&context, 0).sampled());
    }

    #[test]
    fn child_spans_exclude_the_root() {
        let mut tx = Transaction::from_context(&TransactionContext::new("Home", NAVIGATION_OP), 0);
        assert!(tx.child_spans().is_empty());
        tx.start_child("query", "db", 10, 20);
        assert_eq!(tx.child_spans().len(), 1);
    }

    #[test]
    fn measurements_are_keyed_by_name() {
        let mut tx = Transaction::from_context(&TransactionContext::new("Home", NAVIGATION_OP), 0);
        tx.set_measurement("app_start_cold", 1_234.0, "millisecond");
        tx.set_measurement("app_start_cold", 2_000.0, "millisecond");
        assert_eq!(tx.measurements().len(), 1);
        assert!(
            (tx.measurements()["app_start_cold"].value - 2_000.0).abs() < f64::EPSILON,
            "later write wins"
        );
    }

    #[test]
    fn finished_transaction_serializes_for_export() {
        let mut tx = Transaction::from_context(
            &TransactionContext::new("Home", NAVIGATION_OP).with_route(RouteData {
                name: "Home".to_string(),
                has_been_seen: false,
                previous_route: None,
            }),
            100,
        );
        tx.set_measurement("app_start_cold", 250.0, "millisecond");
        tx.set_end_timestamp_ms(400);
        tx.set_status(SpanStatus::Ok);
        let json = serde_json::to_value(&tx).expect("serializes");
        assert_eq!(json["name"], "Home");
        assert_eq!(json["status"], "ok");
        assert_eq!(json["end_timestamp_ms"], 400);
        assert_eq!(json["measurements"]["app_start_cold"]["unit"], "millisecond");
    }

    #[test]
    fn exported_transaction_reimports_with_measurements_intact() {
        let mut tx = Transaction::from_context(&TransactionContext::new("Home", NAVIGATION_OP), 0);
        tx.set_measurement("app_start_cold", 1_234.0, "millisecond");
        tx.set_end_timestamp_ms(2_000);
        let json = serde_json::to_string(&tx).expect("serializes");
        let imported: Transaction = serde_json::from_str(&json).expect("deserializes");
        let measurement = &imported.measurements()["app_start_cold"];
        assert!((measurement.value - 1_234.0).abs() < f64::EPSILON);
        assert_eq!(measurement.unit, "millisecond");
    }
}
