//! Rejection reasons for transaction-start operations.
//!
//! None of these are fatal and none cross the public boundary as `Err`: the
//! coordinator logs the reason and returns an absent result, so the host
//! application proceeds without a transaction rather than crashing.

use thiserror::Error;

/// Why a route transaction was not created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteStartError {
    /// No transaction-creation capability was wired up.
    #[error("transaction-creation capability unavailable; setup was not called with a hub")]
    HubUnavailable,
}

/// Why a user-interaction transaction was not created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteractionStartError {
    /// The feature is switched off.
    #[error("user interaction tracing is disabled")]
    TracingDisabled,

    /// Interaction names are derived from routes; without routing
    /// instrumentation there is nothing to anchor them to.
    #[error("no routing instrumentation is configured")]
    NoRoutingInstrumentation,

    /// The touched element carries no identifier.
    #[error("cannot create an interaction transaction without an element id")]
    MissingElementId,

    /// No route has been confirmed yet.
    #[error("cannot create an interaction transaction without a current route")]
    NoCurrentRoute,

    /// Another component's transaction owns the scope; interaction tracing
    /// must never clobber a transaction it does not own.
    #[error("active transaction {name} already exists on the scope")]
    ForeignActiveTransaction {
        /// Name of the foreign active transaction.
        name: String,
    },

    /// No transaction-creation capability was wired up.
    #[error("transaction-creation capability unavailable; setup was not called with a hub")]
    HubUnavailable,
}
