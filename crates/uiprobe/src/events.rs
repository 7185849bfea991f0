/*!
Listener fan-out with failure isolation.

A [`ListenerSet`] is the registry behind every callback family this crate
exposes (raw event, transition, state-changed, tree-changed). Delivery
iterates a snapshot of the subscriber list, so listeners may register or
remove - including removing themselves - during a callback, and each
callback runs isolated: a panicking listener is logged and skipped without
halting delivery to the rest.
*/

use parking_lot::RwLock;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identifier handed out at registration; used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub struct ListenerId(u64);

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Registry of callbacks for one event family.
pub(crate) struct ListenerSet<E> {
  next_id: AtomicU64,
  listeners: RwLock<Vec<(ListenerId, Callback<E>)>>,
}

impl<E> ListenerSet<E> {
  pub(crate) fn new() -> Self {
    Self {
      next_id: AtomicU64::new(1),
      listeners: RwLock::new(Vec::new()),
    }
  }

  /// Register a callback, returning the id to unregister with.
  pub(crate) fn add(&self, callback: impl Fn(&E) + Send + Sync + 'static) -> ListenerId {
    let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
    self.listeners.write().push((id, Arc::new(callback)));
    id
  }

  /// Remove a callback. Safe to call from inside the callback itself.
  /// Returns whether the id was registered.
  pub(crate) fn remove(&self, id: ListenerId) -> bool {
    let mut listeners = self.listeners.write();
    let before = listeners.len();
    listeners.retain(|(registered, _)| *registered != id);
    listeners.len() != before
  }

  /// Number of registered listeners.
  pub(crate) fn len(&self) -> usize {
    self.listeners.read().len()
  }

  /// Deliver `event` to every listener registered at call time.
  pub(crate) fn emit(&self, event: &E) {
    // Snapshot outside the callbacks: no lock is held while they run.
    let snapshot: Vec<Callback<E>> = self
      .listeners
      .read()
      .iter()
      .map(|(_, callback)| Arc::clone(callback))
      .collect();

    for callback in snapshot {
      if panic::catch_unwind(AssertUnwindSafe(|| callback(event))).is_err() {
        log::error!("listener panicked during delivery; remaining listeners still run");
      }
    }
  }
}

impl<E> Default for ListenerSet<E> {
  fn default() -> Self {
    Self::new()
  }
}

impl<E> std::fmt::Debug for ListenerSet<E> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ListenerSet")
      .field("listeners", &self.len())
      .finish_non_exhaustive()
  }
}
