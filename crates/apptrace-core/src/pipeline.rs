//! Before-finish callback pipeline.
//!
//! An ordered sequence of named mutation steps attached to an idle
//! transaction at creation time and executed synchronously, exactly once, at
//! finish time — before the transaction is sealed. **Ordering is a contract,
//! not an implementation detail**: each step may mutate fields a later step
//! reads.
//!
//! Route transactions register, in this order:
//!
//! 1. [`FinishStep::InstrumentationFinish`] — notify the native-frames and
//!    stall-tracking collaborators.
//! 2. [`FinishStep::AppStartMerge`] — back-date the transaction to the
//!    app-start begin time and attach the app-start span/measurement. Must
//!    run before duration-based steps.
//! 3. [`FinishStep::DurationClamp`] — cap the reported duration at the final
//!    timeout (protects against step 2 producing an implausible duration).
//! 4. [`FinishStep::BackNavigationSuppression`] — unsample empty transactions
//!    for routes that have been seen before.
//!
//! Interaction transactions register:
//!
//! 1. [`FinishStep::ClearInflightInteraction`] — drop the in-flight handle
//!    and notify the instrumentation collaborators.
//! 2. [`FinishStep::DropIfNoChildSpans`] — unsample interaction transactions
//!    that produced no work.
//!
//! The steps are plain names; the coordinator executes them because most
//! steps mutate both the transaction and the coordinator's cross-cutting
//! state.

/// A named finish-pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishStep {
    /// Notify native-frames and stall-tracking collaborators of the finish.
    InstrumentationFinish,
    /// Merge pending app-start data: back-date the start, force the UI-load
    /// operation, attach the app-start child span and measurement, and clear
    /// the pending slot.
    AppStartMerge,
    /// Clamp the end timestamp so the reported duration never exceeds the
    /// final timeout (no-op when the final timeout is zero).
    DurationClamp,
    /// Mark the transaction unsampled when its route has been seen before and
    /// it has no child spans.
    BackNavigationSuppression,
    /// Clear the coordinator's in-flight interaction handle and notify the
    /// instrumentation collaborators.
    ClearInflightInteraction,
    /// Mark the transaction unsampled when it has no child spans.
    DropIfNoChildSpans,
}

/// Ordered, run-exactly-once collection of finish steps.
#[derive(Debug, Default)]
pub struct FinishPipeline {
    steps: Vec<FinishStep>,
    executed: bool,
}

impl FinishPipeline {
    /// Creates an empty pipeline.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            steps: Vec::new(),
            executed: false,
        }
    }

    /// Appends a step. Steps run in registration order.
    pub fn register(&mut self, step: FinishStep) {
        self.steps.push(step);
    }

    /// Returns the registered steps without consuming them.
    #[must_use]
    pub fn steps(&self) -> &[FinishStep] {
        &self.steps
    }

    /// Takes the steps for execution. Subsequent calls return nothing, which
    /// is what makes finish idempotent at the pipeline level.
    pub fn take_steps(&mut self) -> Vec<FinishStep> {
        if self.executed {
            return Vec::new();
        }
        self.executed = true;
        std::mem::take(&mut self.steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_run_in_registration_order() {
        let mut pipeline = FinishPipeline::new();
        pipeline.register(FinishStep::InstrumentationFinish);
        pipeline.register(FinishStep::AppStartMerge);
        pipeline.register(FinishStep::DurationClamp);
        pipeline.register(FinishStep::BackNavigationSuppression);
        assert_eq!(
            pipeline.take_steps(),
            vec![
                FinishStep::InstrumentationFinish,
                FinishStep::AppStartMerge,
                FinishStep::DurationClamp,
                FinishStep::BackNavigationSuppression,
            ]
        );
    }

    #[test]
    fn steps_are_taken_exactly_once() {
        let mut pipeline = FinishPipeline::new();
        pipeline.register(FinishStep::DropIfNoChildSpans);
        assert_eq!(pipeline.take_steps().len(), 1);
        assert!(pipeline.take_steps().is_empty());
        pipeline.register(FinishStep::DropIfNoChildSpans);
        assert!(pipeline.take_steps().is_empty(), "pipeline stays consumed");
    }
}
