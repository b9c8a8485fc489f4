//! Idle transactions and their timeout scheduler.
//!
//! An [`IdleTransaction`] auto-finishes when either deadline is reached:
//!
//! - **idle timeout** since the last child-span activity, or
//! - **final timeout** since creation (`0` disables the hard cap),
//!
//! whichever comes first. Deadlines are delivered cooperatively: the owner
//! calls [`IdleTransaction::poll`] on the host tick and finishes the
//! transaction when a [`FinishReason`] is due. Finish is idempotent per
//! instance; a poll after an explicit finish reports nothing.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{SpanStatus, Transaction, TransactionContext};
use crate::pipeline::{FinishPipeline, FinishStep};

/// Why an idle transaction's scheduler declared it due for finishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishReason {
    /// The idle timeout elapsed with no new child-span activity.
    IdleTimeout,
    /// The final timeout elapsed since creation (hard cap).
    FinalTimeout,
}

/// A transaction that auto-finishes after inactivity or a hard timeout.
#[derive(Debug)]
pub struct IdleTransaction {
    transaction: Transaction,
    idle_timeout_ms: u64,
    final_timeout_ms: u64,
    trim_end: bool,
    created_ms: u64,
    last_activity_ms: u64,
    idle_timeout_cancelled: bool,
    end_override_ms: Option<u64>,
    finished: bool,
    pipeline: FinishPipeline,
}

impl IdleTransaction {
    /// Creates an idle transaction from a context.
    #[must_use]
    pub fn new(
        context: &TransactionContext,
        idle_timeout_ms: u64,
        final_timeout_ms: u64,
        now_ms: u64,
    ) -> Self {
        Self {
            transaction: Transaction::from_context(context, now_ms),
            idle_timeout_ms,
            final_timeout_ms,
            trim_end: context.trim_end,
            created_ms: now_ms,
            last_activity_ms: now_ms,
            idle_timeout_cancelled: false,
            end_override_ms: None,
            finished: false,
            pipeline: FinishPipeline::new(),
        }
    }

    /// Returns the transaction ID.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.transaction.id()
    }

    /// Returns the wrapped transaction.
    #[must_use]
    pub const fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// Returns the wrapped transaction mutably.
    pub fn transaction_mut(&mut self) -> &mut Transaction {
        &mut self.transaction
    }

    /// Whether this transaction has already been finished.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Registers a finish-pipeline step. Steps run in registration order.
    pub fn register_finish_step(&mut self, step: FinishStep) {
        self.pipeline.register(step);
    }

    /// Returns the registered finish-pipeline steps, in execution order.
    #[must_use]
    pub fn registered_finish_steps(&self) -> &[FinishStep] {
        self.pipeline.steps()
    }

    /// Takes the finish pipeline steps, exactly once.
    pub(crate) fn take_finish_steps(&mut self) -> Vec<FinishStep> {
        self.pipeline.take_steps()
    }

    /// Refreshes the idle deadline; call whenever child-span work happens.
    pub fn record_activity(&mut self, now_ms: u64) {
        if now_ms > self.last_activity_ms {
            self.last_activity_ms = now_ms;
        }
    }

    /// Attaches a completed child span, refreshing the idle deadline to the
    /// span's end.
    pub fn start_child(
        &mut self,
        description: impl Into<String>,
        op: impl Into<String>,
        start_timestamp_ms: u64,
        end_timestamp_ms: u64,
    ) -> Uuid {
        let id = self
            .transaction
            .start_child(description, op, start_timestamp_ms, end_timestamp_ms);
        self.record_activity(end_timestamp_ms);
        id
    }

    /// Permanently stops the idle timer, without restart-on-child-span
    /// semantics. The final timeout (if any) still applies.
    pub fn cancel_idle_timeout(&mut self) {
        self.idle_timeout_cancelled = true;
    }

    /// Reports whether a timeout is due at `now_ms`, and which one.
    ///
    /// When both deadlines have passed, the earlier deadline wins. Returns
    /// `None` once finished.
    #[must_use]
    pub fn poll(&self, now_ms: u64) -> Option<FinishReason> {
        if self.finished {
            return None;
        }
        let final_deadline = (self.final_timeout_ms > 0)
            .then(|| self.created_ms.saturating_add(self.final_timeout_ms));
        let idle_deadline = (!self.idle_timeout_cancelled)
            .then(|| self.last_activity_ms.saturating_add(self.idle_timeout_ms));

        let due = |deadline: Option<u64>| deadline.filter(|&d| d <= now_ms);
        match (due(idle_deadline), due(final_deadline)) {
            (Some(idle), Some(fin)) => {
                if fin <= idle {
                    Some(FinishReason::FinalTimeout)
                } else {
                    Some(FinishReason::IdleTimeout)
                }
            },
            (Some(_), None) => Some(FinishReason::IdleTimeout),
            (None, Some(_)) => Some(FinishReason::FinalTimeout),
            (None, None) => None,
        }
    }

    /// Pins the end timestamp, overriding the requested finish time.
    ///
    /// Used by the duration clamp so the reported duration never exceeds the
    /// final timeout.
    pub fn set_end_override_ms(&mut self, end_ms: u64) {
        self.end_override_ms = Some(end_ms);
    }

    /// Seals the transaction: resolves the end timestamp and marks it
    /// finished. Returns the now-immutable transaction.
    ///
    /// End resolution order: the override (duration clamp) beats the
    /// requested end; with `trim_end`, the last child span's end beats both
    /// when it is earlier; the end never precedes the start.
    pub(crate) fn seal(mut self, requested_end_ms: u64) -> Transaction {
        let mut end = self.end_override_ms.unwrap_or(requested_end_ms);
        if self.trim_end {
            if let Some(last_child_end) = self
                .transaction
                .child_spans()
                .iter()
                .map(|span| span.end_timestamp_ms)
                .max()
            {
                if last_child_end < end {
                    end = last_child_end;
                }
            }
        }
        let end = end.max(self.transaction.start_timestamp_ms());
        self.transaction.set_end_timestamp_ms(end);
        if self.transaction.status().is_none() {
            self.transaction.set_status(SpanStatus::Ok);
        }
        self.finished = true;
        self.transaction
    }
}
