//! Transaction lifecycle coordination.
//!
//! [`TracingCoordinator`] arbitrates between the three concurrent sources of
//! transaction starts — screen navigation, user interaction, and application
//! cold/warm start — enforces idle/final timeout semantics, and pipes every
//! transaction through an ordered finish pipeline before it is captured.
//!
//! # State
//!
//! The coordinator holds the single piece of cross-cutting state:
//!
//! - the current route name (set on route confirmation, read by interaction
//!   naming),
//! - the in-flight interaction handle (at most one at any time),
//! - the pending app-start data slot (consume-once, reconciled by whichever
//!   of data arrival or route-transaction creation happens second),
//! - the app-start finish timestamp (stamped by the view layer on first
//!   meaningful render).
//!
//! All mutation happens on one logical execution context; collaborators hold
//! cheap clones of the coordinator handle rather than ambient global state.
//!
//! # Arbitration rules
//!
//! - Navigation always pre-empts interaction tracking: creating a route
//!   transaction force-cancels an in-flight interaction first.
//! - Interaction tracing never clobbers a transaction it does not own: a
//!   foreign active transaction on the scope rejects the interaction start.
//! - Starting a second interaction invalidates the first, without restart
//!   semantics on its idle timer.
//!
//! # Timeouts
//!
//! The host drives time by calling [`TracingCoordinator::poll_timeouts`] on
//! its tick. A timer firing after a transaction was already finished by
//! another path is a no-op; finish is idempotent per transaction instance.

mod error;


use std::cell::RefCell;
use std::rc::Rc;

pub use error::{InteractionStartError, RouteStartError};
use uuid::Uuid;

use crate::app_start::{self, AppStartData};
use crate::clock::{Clock, SystemClock};
use crate::hooks::{InstrumentationHook, NativeLayer};
use crate::hub::{Breadcrumb, Hub, Scope};
use crate::pipeline::FinishStep;
use crate::routing::{BeforeNavigate, RoutingAdapter, RoutingBinding};
use crate::transaction::idle::{FinishReason, IdleTransaction};
use crate::transaction::{SpanStatus, Transaction, TransactionContext, UI_LOAD_OP};

/// Start hooks fire only for transactions whose start timestamp is within
/// this margin of "now"; back-dated transactions must not re-trigger
/// instrumentation meant for genuinely new work.
const NEAR_TO_NOW_MARGIN_MS: u64 = 1_000;

/// Configuration for the lifecycle coordinator.
#[derive(Debug, Clone)]
pub struct TracingOptions {
    /// Time to wait until an idle transaction finishes after its last child
    /// span activity. Default: 1000 ms.
    pub idle_timeout_ms: u64,

    /// Hard cap on transaction duration; transactions exceeding it are marked
    /// `deadline_exceeded` and clamped. `0` disables the cap.
    /// Default: 600 000 ms.
    pub final_timeout_ms: u64,

    /// Do not sample route transactions whose route has been seen before and
    /// which end with no child spans; repeated back-navigations to an
    /// already-visited idle screen are noise. Default: true.
    pub ignore_empty_back_navigation_transactions: bool,

    /// Attach app-start measurements to the first route transaction (or a
    /// synthetic one when no routing instrumentation exists). Default: true.
    pub enable_app_start_tracking: bool,

    /// Drive the native-frames collaborator. Default: true.
    pub enable_native_frames_tracking: bool,

    /// Drive the stall-tracking collaborator. Default: true.
    pub enable_stall_tracking: bool,

    /// Trace user interaction events like touches and gestures.
    /// Default: false.
    pub enable_user_interaction_tracing: bool,
}

impl Default for TracingOptions {
    fn default() -> Self {
        Self {
            idle_timeout_ms: 1_000,
            final_timeout_ms: 600_000,
            ignore_empty_back_navigation_transactions: true,
            enable_app_start_tracking: true,
            enable_native_frames_tracking: true,
            enable_stall_tracking: true,
            enable_user_interaction_tracing: false,
        }
    }
}

/// Collaborators wired into the coordinator at setup.
pub struct Collaborators {
    /// Transaction-creation capability and ambient scope.
    pub hub: Hub,
    /// Native layer for app-start data and frame-tracking switches.
    pub native: Option<Rc<dyn NativeLayer>>,
    /// Native-frames instrumentation hooks.
    pub native_frames: Option<Box<dyn InstrumentationHook>>,
    /// Stall-tracking instrumentation hooks.
    pub stall_tracking: Option<Box<dyn InstrumentationHook>>,
}

impl Collaborators {
    /// Creates a collaborator set with just a hub.
    #[must_use]
    pub fn new(hub: Hub) -> Self {
        Self {
            hub,
            native: None,
            native_frames: None,
            stall_tracking: None,
        }
    }
}

/// Summary of a transaction the coordinator created and owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedTransaction {
    /// Transaction ID.
    pub id: Uuid,
    /// Transaction name.
    pub name: String,
    /// Operation tag.
    pub op: String,
    /// Start timestamp in milliseconds.
    pub start_timestamp_ms: u64,
    /// Sampling decision at creation time.
    pub sampled: bool,
}

impl From<&IdleTransaction> for StartedTransaction {
    fn from(idle: &IdleTransaction) -> Self {
        let transaction = idle.transaction();
        Self {
            id: transaction.id(),
            name: transaction.name().to_string(),
            op: transaction.op().to_string(),
            start_timestamp_ms: transaction.start_timestamp_ms(),
            sampled: transaction.sampled(),
        }
    }
}

/// The transaction lifecycle coordinator.
///
/// Cheap to clone; clones share state. Routing bindings and host layers each
/// hold a clone and feed events in from the same cooperative execution
/// context.
#[derive(Clone)]
pub struct TracingCoordinator {
    inner: Rc<RefCell<Inner>>,
}

struct Inner {
    options: TracingOptions,
    before_navigate: Option<BeforeNavigate>,
    clock: Rc<dyn Clock>,
    hub: Option<Hub>,
    native: Option<Rc<dyn NativeLayer>>,
    native_frames: Option<Box<dyn InstrumentationHook>>,
    stall_tracking: Option<Box<dyn InstrumentationHook>>,
    has_routing: bool,
    current_route: Option<String>,
    route_transaction: Option<IdleTransaction>,
    inflight_interaction: Option<IdleTransaction>,
    pending_app_start: Option<AppStartData>,
    app_start_finish_ms: Option<u64>,
    use_app_start_with_profiler: bool,
}

impl TracingCoordinator {
    /// Creates a coordinator with the system clock.
    #[must_use]
    pub fn new(options: TracingOptions) -> Self {
        Self::with_clock(options, Rc::new(SystemClock))
    }

    /// Creates a coordinator with an explicit clock (tests, deterministic
    /// hosts).
    #[must_use]
    pub fn with_clock(options: TracingOptions, clock: Rc<dyn Clock>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                options,
                before_navigate: None,
                clock,
                hub: None,
                native: None,
                native_frames: None,
                stall_tracking: None,
                has_routing: false,
                current_route: None,
                route_transaction: None,
                inflight_interaction: None,
                pending_app_start: None,
                app_start_finish_ms: None,
                use_app_start_with_profiler: false,
            })),
        }
    }

    /// Returns a copy of the options.
    #[must_use]
    pub fn options(&self) -> TracingOptions {
        self.inner.borrow().options.clone()
    }

    /// Installs the context transform run before each navigation transaction
    /// is created. The transform may force `sampled = Some(false)` to drop
    /// the transaction.
    pub fn set_before_navigate(
        &self,
        before_navigate: impl FnMut(TransactionContext) -> TransactionContext + 'static,
    ) {
        self.inner.borrow_mut().before_navigate = Some(Box::new(before_navigate));
    }

    /// Marks that an external profiler owns the app-start finish timestamp,
    /// so the correlator must not stamp it best-effort at fetch time.
    pub fn set_use_app_start_with_profiler(&self, value: bool) {
        self.inner.borrow_mut().use_app_start_with_profiler = value;
    }

    /// Wires collaborators and registers routing instrumentation.
    ///
    /// With no routing adapter, route changes are not instrumented (and the
    /// app-start correlator will synthesize its own anchoring transaction).
    pub fn setup(&self, collaborators: Collaborators, routing: Option<&mut dyn RoutingAdapter>) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.hub = Some(collaborators.hub);
            if inner.options.enable_native_frames_tracking {
                if let Some(native) = &collaborators.native {
                    native.enable_native_frames_tracking();
                }
                inner.native_frames = collaborators.native_frames;
            } else if let Some(native) = &collaborators.native {
                native.disable_native_frames_tracking();
            }
            if inner.options.enable_stall_tracking {
                inner.stall_tracking = collaborators.stall_tracking;
            }
            inner.native = collaborators.native;
            inner.has_routing = routing.is_some();
        }
        if let Some(adapter) = routing {
            adapter.register_routing_instrumentation(RoutingBinding::new(self.clone()));
        } else {
            tracing::debug!("not instrumenting route changes; no routing adapter configured");
        }
    }

    /// Route is about to change, before the new route's components mount:
    /// runs the `before_navigate` transform and creates the route
    /// transaction.
    pub fn on_route_will_change(&self, context: TransactionContext) -> Option<StartedTransaction> {
        let mut inner = self.inner.borrow_mut();
        let context = match inner.before_navigate.as_mut() {
            Some(transform) => transform(context),
            None => context,
        };
        let op = context.op.clone();
        match inner.create_route_transaction(context) {
            Ok(started) => Some(started),
            Err(err) => {
                tracing::warn!(op = %op, error = %err, "did not create route transaction");
                None
            },
        }
    }

    /// Route change is confirmed: records the current route name and writes
    /// the navigation breadcrumb and route tag to the scope.
    pub fn on_confirm_route(&self, context: &TransactionContext) {
        self.inner.borrow_mut().confirm_route(context);
    }

    /// Starts a transaction for a user interaction on the current route.
    ///
    /// `element_id` is the unique identifier of the touched element; `op`
    /// names the UI event, e.g. `"ui.action.touch"`. Returns `None` (after
    /// logging) when the feature is disabled, no routing instrumentation or
    /// current route exists, the element has no identifier, or a foreign
    /// transaction owns the scope.
    pub fn start_user_interaction_transaction(
        &self,
        element_id: Option<&str>,
        op: &str,
    ) -> Option<StartedTransaction> {
        let mut inner = self.inner.borrow_mut();
        match inner.start_user_interaction(element_id, op) {
            Ok(started) => Some(started),
            Err(err) => {
                match err {
                    InteractionStartError::NoRoutingInstrumentation
                    | InteractionStartError::ForeignActiveTransaction { .. }
                    | InteractionStartError::HubUnavailable => {
                        tracing::warn!(op, error = %err, "did not create interaction transaction");
                    },
                    InteractionStartError::TracingDisabled
                    | InteractionStartError::MissingElementId
                    | InteractionStartError::NoCurrentRoute => {
                        tracing::debug!(op, error = %err, "did not create interaction transaction");
                    },
                }
                None
            },
        }
    }

    /// Forwards a transaction start to the instrumentation collaborators,
    /// only when the start timestamp is near "now".
    pub fn on_transaction_start(&self, transaction: &Transaction) {
        self.inner.borrow_mut().fire_start_hooks(transaction);
    }

    /// Forwards a transaction finish to the instrumentation collaborators,
    /// unconditionally: cost-measurement windows are computed independently,
    /// so finish hooks run even for back-dated transactions.
    pub fn on_transaction_finish(&self, transaction: &Transaction, end_timestamp_ms: Option<u64>) {
        self.inner.borrow_mut().fire_finish_hooks(transaction, end_timestamp_ms);
    }

    /// Called by the view layer when the first meaningful render completes;
    /// records the app-start finish timestamp.
    pub fn on_app_start_finish(&self, end_timestamp_ms: u64) {
        self.inner.borrow_mut().app_start_finish_ms = Some(end_timestamp_ms);
    }

    /// Fetches the one-shot native app-start data and correlates it.
    ///
    /// Runs to completion without blocking the caller; the continuation
    /// resumes on the same cooperative queue. With routing instrumentation
    /// configured the data is parked for the next route transaction to
    /// consume at finish time; without, a synthetic "App Start" transaction
    /// is created immediately. Arrival order relative to the first navigation
    /// does not matter — both orders converge to the same outcome.
    pub async fn instrument_app_start(&self) {
        let (enabled, native) = {
            let inner = self.inner.borrow();
            (inner.options.enable_app_start_tracking, inner.native.clone())
        };
        if !enabled {
            tracing::debug!("app start tracking is disabled");
            return;
        }
        let Some(native) = native else {
            tracing::debug!("no native layer configured; skipping app start instrumentation");
            return;
        };
        if !native.is_enabled() {
            tracing::debug!("native layer is disabled; skipping app start instrumentation");
            return;
        }
        let Some(app_start) = native.fetch_app_start().await else {
            return;
        };
        if app_start.already_fetched {
            return;
        }
        self.inner.borrow_mut().apply_app_start(app_start);
    }

    /// Drives idle/final timeout finishing for the transactions the
    /// coordinator owns. Call on the host's tick.
    pub fn poll_timeouts(&self) {
        let mut inner = self.inner.borrow_mut();
        let now_ms = inner.clock.now_ms();
        inner.poll_timeouts(now_ms);
    }

    /// Runs a closure against the ambient scope, if a hub is wired up.
    pub fn configure_scope(&self, f: impl FnOnce(&mut Scope)) {
        if let Some(hub) = self.inner.borrow_mut().hub.as_mut() {
            f(hub.scope_mut());
        }
    }

    /// Returns the confirmed current route name, if any.
    #[must_use]
    pub fn current_route(&self) -> Option<String> {
        self.inner.borrow().current_route.clone()
    }
}

impl std::fmt::Debug for TracingCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("TracingCoordinator")
            .field("options", &inner.options)
            .field("current_route", &inner.current_route)
            .field("has_routing", &inner.has_routing)
            .finish_non_exhaustive()
    }
}

impl Inner {
    /// Creates the route transaction for a navigation event.
    ///
    /// Force-cancels an in-flight interaction first — navigation always
    /// pre-empts interaction tracking — and finishes a still-open previous
    /// route transaction so the route slot stays single-occupancy.
    fn create_route_transaction(
        &mut self,
        context: TransactionContext,
    ) -> Result<StartedTransaction, RouteStartError> {
        if self.hub.is_none() {
            return Err(RouteStartError::HubUnavailable);
        }
        let now_ms = self.clock.now_ms();

        if let Some(mut interaction) = self.inflight_interaction.take() {
            tracing::debug!(
                cancelled = interaction.transaction().name(),
                op = %context.op,
                "cancelling in-flight interaction transaction for navigation"
            );
            interaction.transaction_mut().set_status(SpanStatus::Cancelled);
            self.finish_idle_transaction(interaction, now_ms, None);
        }

        if let Some(previous) = self.route_transaction.take() {
            tracing::debug!(
                name = previous.transaction().name(),
                "finishing previous route transaction before starting a new one"
            );
            self.finish_idle_transaction(previous, now_ms, None);
        }

        let context = context.with_trim_end();
        let (idle_timeout_ms, final_timeout_ms) =
            (self.options.idle_timeout_ms, self.options.final_timeout_ms);
        let Some(hub) = self.hub.as_mut() else {
            return Err(RouteStartError::HubUnavailable);
        };
        let mut idle =
            hub.start_idle_transaction(&context, idle_timeout_ms, final_timeout_ms, true, now_ms);

        idle.register_finish_step(FinishStep::InstrumentationFinish);
        idle.register_finish_step(FinishStep::AppStartMerge);
        idle.register_finish_step(FinishStep::DurationClamp);
        if self.options.ignore_empty_back_navigation_transactions {
            idle.register_finish_step(FinishStep::BackNavigationSuppression);
        }

        self.fire_start_hooks(idle.transaction());
        tracing::debug!(
            op = %context.op,
            name = %context.name,
            "starting route transaction on scope"
        );

        let started = StartedTransaction::from(&idle);
        self.route_transaction = Some(idle);
        Ok(started)
    }

    /// Starts a user-interaction transaction, arbitrating against whatever is
    /// already active.
    fn start_user_interaction(
        &mut self,
        element_id: Option<&str>,
        op: &str,
    ) -> Result<StartedTransaction, InteractionStartError> {
        if !self.options.enable_user_interaction_tracing {
            return Err(InteractionStartError::TracingDisabled);
        }
        if !self.has_routing {
            return Err(InteractionStartError::NoRoutingInstrumentation);
        }
        let element_id = element_id.ok_or(InteractionStartError::MissingElementId)?;
        let current_route = self
            .current_route
            .clone()
            .ok_or(InteractionStartError::NoCurrentRoute)?;

        let hub = self.hub.as_ref().ok_or(InteractionStartError::HubUnavailable)?;
        if let Some(active) = hub.scope().active_transaction() {
            let owns_active = self
                .inflight_interaction
                .as_ref()
                .is_some_and(|interaction| interaction.id() == active.id);
            if !owns_active {
                return Err(InteractionStartError::ForeignActiveTransaction {
                    name: active.name.clone(),
                });
            }
        }

        let now_ms = self.clock.now_ms();
        if let Some(mut previous) = self.inflight_interaction.take() {
            tracing::debug!(
                name = previous.transaction().name(),
                "replacing in-flight interaction transaction"
            );
            previous.cancel_idle_timeout();
            self.finish_idle_transaction(previous, now_ms, None);
        }

        let name = format!("{current_route}.{element_id}");
        let context = TransactionContext::new(name.clone(), op).with_trim_end();
        let (idle_timeout_ms, final_timeout_ms) =
            (self.options.idle_timeout_ms, self.options.final_timeout_ms);
        let Some(hub) = self.hub.as_mut() else {
            return Err(InteractionStartError::HubUnavailable);
        };
        let mut idle =
            hub.start_idle_transaction(&context, idle_timeout_ms, final_timeout_ms, true, now_ms);

        idle.register_finish_step(FinishStep::ClearInflightInteraction);
        idle.register_finish_step(FinishStep::DropIfNoChildSpans);

        self.fire_start_hooks(idle.transaction());
        tracing::debug!(op, name = %name, "created user interaction transaction");

        let started = StartedTransaction::from(&idle);
        self.inflight_interaction = Some(idle);
        Ok(started)
    }

    /// Records the confirmed route and writes scope metadata.
    fn confirm_route(&mut self, context: &TransactionContext) {
        self.current_route = context.route.as_ref().map(|route| route.name.clone());
        let Some(hub) = self.hub.as_mut() else {
            return;
        };
        if let Some(route) = &context.route {
            hub.scope_mut().add_breadcrumb(Breadcrumb::navigation(
                route.previous_route.clone(),
                route.name.clone(),
            ));
        }
        hub.scope_mut().set_tag("routing.route.name", context.name.clone());
    }

    /// Reconciles fetched app-start data with the navigation stream.
    fn apply_app_start(&mut self, app_start: AppStartData) {
        if !self.use_app_start_with_profiler {
            // Best-effort finish stamp when no profiler owns it.
            self.app_start_finish_ms = Some(self.clock.now_ms());
        }

        if self.has_routing {
            tracing::debug!("parking app start data for the next route transaction");
            self.pending_app_start = Some(app_start);
            return;
        }

        // No routing instrumentation: synthesize the anchoring transaction
        // immediately, bypassing the pending-data slot.
        let context = TransactionContext {
            start_timestamp_ms: Some(app_start.begin_timestamp_ms),
            ..TransactionContext::new("App Start", UI_LOAD_OP)
        };
        match self.create_route_transaction(context) {
            Ok(_) => {
                let finish_ms = self.app_start_finish_ms;
                if let Some(idle) = self.route_transaction.as_mut() {
                    app_start::attach_app_start(idle.transaction_mut(), &app_start, finish_ms);
                    if let Some(finish) = finish_ms {
                        idle.record_activity(finish);
                    }
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "could not create app start transaction");
            },
        }
    }

    /// Finishes an idle transaction: runs its pipeline steps in registration
    /// order, seals it, and captures it through the hub. Idempotent.
    fn finish_idle_transaction(
        &mut self,
        mut idle: IdleTransaction,
        end_timestamp_ms: u64,
        reason: Option<FinishReason>,
    ) {
        if idle.is_finished() {
            return;
        }
        if reason == Some(FinishReason::FinalTimeout) {
            idle.transaction_mut().set_status(SpanStatus::DeadlineExceeded);
        }
        for step in idle.take_finish_steps() {
            self.run_finish_step(&mut idle, step, end_timestamp_ms);
        }
        let transaction = idle.seal(end_timestamp_ms);
        tracing::debug!(
            name = transaction.name(),
            op = transaction.op(),
            sampled = transaction.sampled(),
            "finishing transaction"
        );
        if let Some(hub) = self.hub.as_mut() {
            hub.capture_transaction(transaction);
        }
    }

    /// Executes one named finish-pipeline step. See the `pipeline` module
    /// docs for the ordering contract.
    fn run_finish_step(&mut self, idle: &mut IdleTransaction, step: FinishStep, end_ms: u64) {
        match step {
            FinishStep::InstrumentationFinish => {
                self.fire_finish_hooks(idle.transaction(), Some(end_ms));
            },
            FinishStep::AppStartMerge => {
                if !self.options.enable_app_start_tracking {
                    return;
                }
                let Some(app_start) = self.pending_app_start.take() else {
                    return;
                };
                // Back-date the transaction to the app-start begin; this must
                // run before any duration-based step.
                let transaction = idle.transaction_mut();
                transaction.set_start_timestamp_ms(app_start.begin_timestamp_ms);
                transaction.set_op(UI_LOAD_OP);
                app_start::attach_app_start(transaction, &app_start, self.app_start_finish_ms);
            },
            FinishStep::DurationClamp => {
                let final_timeout_ms = self.options.final_timeout_ms;
                if final_timeout_ms == 0 {
                    return;
                }
                let start_ms = idle.transaction().start_timestamp_ms();
                if end_ms.saturating_sub(start_ms) > final_timeout_ms {
                    idle.transaction_mut().set_status(SpanStatus::DeadlineExceeded);
                    idle.set_end_override_ms(start_ms.saturating_add(final_timeout_ms));
                }
            },
            FinishStep::BackNavigationSuppression => {
                let transaction = idle.transaction_mut();
                let seen_before = transaction.route().is_some_and(|route| route.has_been_seen);
                if seen_before && transaction.child_spans().is_empty() {
                    tracing::debug!(
                        name = transaction.name(),
                        "not sampling empty back-navigation transaction; route was seen before"
                    );
                    transaction.set_sampled(false);
                }
            },
            FinishStep::ClearInflightInteraction => {
                self.inflight_interaction = None;
                self.fire_finish_hooks(idle.transaction(), Some(end_ms));
            },
            FinishStep::DropIfNoChildSpans => {
                let transaction = idle.transaction_mut();
                if transaction.child_spans().is_empty() {
                    tracing::debug!(
                        name = transaction.name(),
                        "not sampling interaction transaction with no child spans"
                    );
                    transaction.set_sampled(false);
                }
            },
        }
    }

    /// Polls both owned transactions against their timeout schedulers.
    fn poll_timeouts(&mut self, now_ms: u64) {
        if let Some(route) = self.route_transaction.take() {
            match route.poll(now_ms) {
                Some(reason) => self.finish_idle_transaction(route, now_ms, Some(reason)),
                None => self.route_transaction = Some(route),
            }
        }
        if let Some(interaction) = self.inflight_interaction.take() {
            match interaction.poll(now_ms) {
                Some(reason) => self.finish_idle_transaction(interaction, now_ms, Some(reason)),
                None => self.inflight_interaction = Some(interaction),
            }
        }
    }

    /// Forwards a start to the collaborators when the transaction is
    /// genuinely new.
    fn fire_start_hooks(&mut self, transaction: &Transaction) {
        let now_ms = self.clock.now_ms();
        if now_ms.abs_diff(transaction.start_timestamp_ms()) > NEAR_TO_NOW_MARGIN_MS {
            tracing::debug!(
                name = transaction.name(),
                "skipping start hooks for back-dated transaction"
            );
            return;
        }
        if let Some(hook) = self.native_frames.as_mut() {
            hook.on_transaction_start(transaction);
        }
        if let Some(hook) = self.stall_tracking.as_mut() {
            hook.on_transaction_start(transaction);
        }
    }

    /// Forwards a finish to the collaborators, unconditionally.
    fn fire_finish_hooks(&mut self, transaction: &Transaction, end_timestamp_ms: Option<u64>) {
        if let Some(hook) = self.native_frames.as_mut() {
            hook.on_transaction_finish(transaction, end_timestamp_ms);
        }
        if let Some(hook) = self.stall_tracking.as_mut() {
            hook.on_transaction_finish(transaction, end_timestamp_ms);
        }
    }
}
