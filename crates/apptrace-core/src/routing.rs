//! Routing instrumentation seam.
//!
//! The routing-library adapter detects navigation events; this crate only
//! defines the registration contract. At setup the coordinator hands the
//! adapter a [`RoutingBinding`] (register-then-fire-later); the adapter calls
//! back into it when navigation happens:
//!
//! - [`RoutingBinding::on_route_will_change`] when the route changes, before
//!   the new route's components mount — this starts the route transaction,
//!   after running the host's `before_navigate` transform on the context.
//! - [`RoutingBinding::on_confirm_route`] once the destination route is
//!   settled — this records the current route name and writes the navigation
//!   breadcrumb and route tag to the scope.

use crate::coordinator::{StartedTransaction, TracingCoordinator};
use crate::transaction::TransactionContext;

/// Context transform run before each navigation transaction is created.
///
/// May rename the transaction, rewrite route metadata, or drop it entirely by
/// forcing `sampled = Some(false)`.
pub type BeforeNavigate = Box<dyn FnMut(TransactionContext) -> TransactionContext>;

/// Implemented by routing-library adapters.
pub trait RoutingAdapter {
    /// Receives the binding the adapter must drive on navigation events.
    fn register_routing_instrumentation(&mut self, binding: RoutingBinding);
}

/// Handle through which a routing adapter feeds navigation events back into
/// the coordinator.
#[derive(Clone)]
pub struct RoutingBinding {
    coordinator: TracingCoordinator,
}

impl RoutingBinding {
    pub(crate) fn new(coordinator: TracingCoordinator) -> Self {
        Self { coordinator }
    }

    /// Route is about to change: create the route transaction.
    pub fn on_route_will_change(&self, context: TransactionContext) -> Option<StartedTransaction> {
        self.coordinator.on_route_will_change(context)
    }

    /// Route change is confirmed: record the route and scope metadata.
    pub fn on_confirm_route(&self, context: &TransactionContext) {
        self.coordinator.on_confirm_route(context);
    }
}

impl std::fmt::Debug for RoutingBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingBinding").finish_non_exhaustive()
    }
}
