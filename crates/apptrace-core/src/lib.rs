//! Transaction lifecycle coordination for the apptrace mobile performance
//! agent.
//!
//! This crate decides when a unit-of-work span ("transaction") starts, how
//! long it stays open, what data gets attached to it, and the exact moment and
//! condition under which it closes and is handed to the reporting pipeline.
//! Three concurrent trigger sources are arbitrated: screen navigation, user
//! interaction, and application cold/warm start.
//!
//! # Architecture
//!
//! ```text
//!  host routing layer          host view layer        native layer
//!        |                          |                      |
//!  RoutingBinding            on_app_start_finish    fetch_app_start (async)
//!        |                          |                      |
//!        v                          v                      v
//!  +---------------------------------------------------------------+
//!  |                     TracingCoordinator                        |
//!  |  current route | in-flight interaction | pending app start    |
//!  |                                                               |
//!  |  route controller --- interaction controller --- app-start    |
//!  |        \                    |                    correlator   |
//!  |         v                   v                                 |
//!  |      IdleTransaction (idle/final timeout scheduler +          |
//!  |                       ordered finish pipeline)                |
//!  +---------------------------------------------------------------+
//!        |
//!        v
//!  Hub (scope, capture) ---> TransactionSink (reporting, out of scope)
//! ```
//!
//! All mutation happens on one logical execution context (the host's
//! cooperative event loop); the coordinator holds no locks. Timeouts are
//! delivered by the host calling [`TracingCoordinator::poll_timeouts`] on its
//! tick, which keeps transaction finishing deterministic and idempotent.

pub mod app_start;
pub mod clock;
pub mod coordinator;
pub mod hooks;
pub mod hub;
pub mod pipeline;
pub mod routing;
pub mod transaction;

pub use app_start::{AppStartData, MAX_APP_START_MS};
pub use clock::{Clock, ManualClock, SystemClock};
pub use coordinator::{
    Collaborators, InteractionStartError, RouteStartError, StartedTransaction,
    TracingCoordinator, TracingOptions,
};
pub use hooks::{InstrumentationHook, NativeLayer};
pub use hub::{Breadcrumb, CollectingSink, Hub, Scope, TransactionSink};
pub use pipeline::{FinishPipeline, FinishStep};
pub use routing::{BeforeNavigate, RoutingAdapter, RoutingBinding};
pub use transaction::idle::{FinishReason, IdleTransaction};
pub use transaction::{
    ChildSpan, Measurement, RouteData, SpanStatus, Transaction, TransactionContext,
};
