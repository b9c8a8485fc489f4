//! Transaction-creation capability and ambient scope.
//!
//! The [`Hub`] is the coordinator's gateway to the (out-of-scope) span engine
//! and reporting pipeline: it creates idle transactions, tracks which
//! transaction currently owns the scope, and captures finished transactions
//! into a [`TransactionSink`]. Unsampled transactions are dropped at capture.
//!
//! The [`Scope`] also stores breadcrumbs and tags, which the coordinator
//! writes on route confirmation.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use uuid::Uuid;

use crate::transaction::idle::IdleTransaction;
use crate::transaction::{Transaction, TransactionContext};

/// Identity of the transaction currently bound to the scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTransaction {
    /// Transaction ID.
    pub id: Uuid,
    /// Transaction name, used in ownership-conflict diagnostics.
    pub name: String,
}

/// A breadcrumb recorded on the scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    /// Breadcrumb category, e.g. `"navigation"`.
    pub category: String,
    /// Human-readable message.
    pub message: String,
    /// Route navigated away from, for navigation breadcrumbs.
    pub from: Option<String>,
    /// Route navigated to, for navigation breadcrumbs.
    pub to: Option<String>,
}

impl Breadcrumb {
    /// Builds a navigation breadcrumb.
    #[must_use]
    pub fn navigation(from: Option<String>, to: String) -> Self {
        Self {
            category: "navigation".to_string(),
            message: format!("Navigation to {to}"),
            from,
            to: Some(to),
        }
    }
}

/// Ambient scope: the active transaction plus breadcrumb/tag storage.
#[derive(Debug, Default)]
pub struct Scope {
    active: Option<ActiveTransaction>,
    breadcrumbs: Vec<Breadcrumb>,
    tags: BTreeMap<String, String>,
}

impl Scope {
    /// Returns the transaction currently bound to the scope.
    #[must_use]
    pub const fn active_transaction(&self) -> Option<&ActiveTransaction> {
        self.active.as_ref()
    }

    /// Binds a transaction to the scope.
    pub fn set_active_transaction(&mut self, active: ActiveTransaction) {
        self.active = Some(active);
    }

    /// Unbinds the given transaction if it is the one on the scope.
    pub fn clear_active_transaction(&mut self, id: Uuid) {
        if self.active.as_ref().is_some_and(|active| active.id == id) {
            self.active = None;
        }
    }

    /// Records a breadcrumb.
    pub fn add_breadcrumb(&mut self, breadcrumb: Breadcrumb) {
        self.breadcrumbs.push(breadcrumb);
    }

    /// Returns the recorded breadcrumbs.
    #[must_use]
    pub fn breadcrumbs(&self) -> &[Breadcrumb] {
        &self.breadcrumbs
    }

    /// Sets a tag.
    pub fn set_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(key.into(), value.into());
    }

    /// Returns the tag map.
    #[must_use]
    pub const fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }
}

/// Destination for finished, sampled transactions.
///
/// This is the boundary to the reporting pipeline; transport and
/// serialization live behind it.
pub trait TransactionSink {
    /// Accepts a finished transaction.
    fn submit(&mut self, transaction: Transaction);
}

/// Sink that buffers captured transactions in memory.
///
/// Clones share the same buffer, so a host or test can keep a handle while
/// the hub owns the sink. Single-threaded by design, like the rest of the
/// coordinator.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    captured: Rc<RefCell<Vec<Transaction>>>,
}

impl CollectingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the captured transactions.
    #[must_use]
    pub fn captured(&self) -> Vec<Transaction> {
        self.captured.borrow().clone()
    }

    /// Number of captured transactions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.captured.borrow().len()
    }

    /// Whether nothing has been captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.captured.borrow().is_empty()
    }
}

impl TransactionSink for CollectingSink {
    fn submit(&mut self, transaction: Transaction) {
        self.captured.borrow_mut().push(transaction);
    }
}

/// Transaction-creation capability with an ambient scope.
pub struct Hub {
    scope: Scope,
    sink: Box<dyn TransactionSink>,
}

impl std::fmt::Debug for Hub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hub").field("scope", &self.scope).finish_non_exhaustive()
    }
}

impl Hub {
    /// Creates a hub draining into the given sink.
    #[must_use]
    pub fn new(sink: Box<dyn TransactionSink>) -> Self {
        Self {
            scope: Scope::default(),
            sink,
        }
    }

    /// Returns the scope.
    #[must_use]
    pub const fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Returns the scope mutably.
    pub fn scope_mut(&mut self) -> &mut Scope {
        &mut self.scope
    }

    /// Creates an idle transaction and, when `on_scope`, binds it to the
    /// scope as the active transaction.
    pub fn start_idle_transaction(
        &mut self,
        context: &TransactionContext,
        idle_timeout_ms: u64,
        final_timeout_ms: u64,
        on_scope: bool,
        now_ms: u64,
    ) -> IdleTransaction {
        let idle = IdleTransaction::new(context, idle_timeout_ms, final_timeout_ms, now_ms);
        if on_scope {
            self.scope.set_active_transaction(ActiveTransaction {
                id: idle.id(),
                name: context.name.clone(),
            });
        }
        idle
    }

    /// Captures a finished transaction: unbinds it from the scope and hands
    /// it to the sink unless it is unsampled.
    pub fn capture_transaction(&mut self, transaction: Transaction) {
        self.scope.clear_active_transaction(transaction.id());
        if !transaction.sampled() {
            tracing::debug!(
                name = transaction.name(),
                op = transaction.op(),
                "dropping unsampled transaction"
            );
            return;
        }
        self.sink.submit(transaction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::NAVIGATION_OP;

    fn hub_with_sink() -> (Hub, CollectingSink) {
        let sink = CollectingSink::new();
        (Hub::new(Box::new(sink.clone())), sink)
    }

    #[test]
    fn on_scope_transaction_becomes_the_active_transaction() {
        let (mut hub, _sink) = hub_with_sink();
        let context = TransactionContext::new("Home", NAVIGATION_OP);
        let idle = hub.start_idle_transaction(&context, 1_000, 600_000, true, 0);
        let active = hub.scope().active_transaction().expect("bound to scope");
        assert_eq!(active.id, idle.id());
        assert_eq!(active.name, "Home");
    }

    #[test]
    fn off_scope_transaction_leaves_the_scope_untouched() {
        let (mut hub, _sink) = hub_with_sink();
        let context = TransactionContext::new("Home", NAVIGATION_OP);
        let _idle = hub.start_idle_transaction(&context, 1_000, 600_000, false, 0);
        assert!(hub.scope().active_transaction().is_none());
    }

    #[test]
    fn capture_clears_the_scope_and_feeds_the_sink() {
        let (mut hub, sink) = hub_with_sink();
        let context = TransactionContext::new("Home", NAVIGATION_OP);
        let idle = hub.start_idle_transaction(&context, 1_000, 600_000, true, 0);
        let mut tx = idle.seal(500);
        tx.set_sampled(true);
        hub.capture_transaction(tx);
        assert!(hub.scope().active_transaction().is_none());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn unsampled_transactions_are_dropped_at_capture() {
        let (mut hub, sink) = hub_with_sink();
        let context = TransactionContext::new("Home", NAVIGATION_OP);
        let idle = hub.start_idle_transaction(&context, 1_000, 600_000, true, 0);
        let mut tx = idle.seal(500);
        tx.set_sampled(false);
        hub.capture_transaction(tx);
        assert!(sink.is_empty());
        assert!(
            hub.scope().active_transaction().is_none(),
            "scope is unbound even for dropped transactions"
        );
    }

    #[test]
    fn clearing_a_foreign_id_keeps_the_active_transaction() {
        let (mut hub, _sink) = hub_with_sink();
        let context = TransactionContext::new("Home", NAVIGATION_OP);
        let _idle = hub.start_idle_transaction(&context, 1_000, 600_000, true, 0);
        hub.scope_mut().clear_active_transaction(Uuid::new_v4());
        assert!(hub.scope().active_transaction().is_some());
    }

    #[test]
    fn navigation_breadcrumbs_record_from_and_to() {
        let crumb = Breadcrumb::navigation(Some("Home".to_string()), "Details".to_string());
        assert_eq!(crumb.category, "navigation");
        assert_eq!(crumb.message, "Navigation to Details");
        assert_eq!(crumb.from.as_deref(), Some("Home"));
        assert_eq!(crumb.to.as_deref(), Some("Details"));
    }
}
