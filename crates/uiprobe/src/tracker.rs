/*!
Transition history and liveness tracking.

Shared between the platform dispatch thread (writes) and arbitrary reader
threads, so state lives behind a reader-writer lock: mutation is a
write-lock region, queries are read-lock regions permitting concurrent
readers. Listener fan-out always happens after the lock is dropped.
*/

use crate::clock::now_ms;
use crate::events::{ListenerId, ListenerSet};
use crate::types::Transition;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::VecDeque;

/// Maximum number of transitions kept; the oldest is evicted beyond this.
pub const HISTORY_CAPACITY: usize = 100;

/// A caller that stops heartbeating for this long is reported as not
/// running, even if it never signaled shutdown.
pub const LIVENESS_TIMEOUT_MS: u64 = 30_000;

/// Point-in-time view of tracker state. A read, not a live view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackerStats {
  pub total_transitions: usize,
  pub running: bool,
  pub last_heartbeat_ms: u64,
  pub now_ms: u64,
}

struct TrackerState {
  history: VecDeque<Transition>,
  running: bool,
  last_heartbeat_ms: u64,
}

/// Bounded FIFO transition history plus a heartbeat-based liveness flag.
pub struct TransitionTracker {
  state: RwLock<TrackerState>,
  transition_listeners: ListenerSet<Transition>,
  state_listeners: ListenerSet<bool>,
}

impl TransitionTracker {
  /// Empty history, not running.
  pub fn new() -> Self {
    Self {
      state: RwLock::new(TrackerState {
        history: VecDeque::with_capacity(HISTORY_CAPACITY),
        running: false,
        last_heartbeat_ms: 0,
      }),
      transition_listeners: ListenerSet::new(),
      state_listeners: ListenerSet::new(),
    }
  }

  /// Append a transition, evicting the oldest beyond capacity, then fan out.
  pub fn record_transition(&self, transition: Transition) {
    {
      let mut state = self.state.write();
      state.history.push_back(transition.clone());
      while state.history.len() > HISTORY_CAPACITY {
        state.history.pop_front();
      }
    }
    self.transition_listeners.emit(&transition);
  }

  /// Set the running flag and refresh the heartbeat, then fan out.
  pub fn update_state(&self, running: bool) {
    self.update_state_at(running, now_ms());
  }

  pub(crate) fn update_state_at(&self, running: bool, heartbeat_ms: u64) {
    {
      let mut state = self.state.write();
      state.running = running;
      state.last_heartbeat_ms = heartbeat_ms;
    }
    self.state_listeners.emit(&running);
  }

  /// Whether the service is alive: running, with a heartbeat fresher than
  /// [`LIVENESS_TIMEOUT_MS`]. Self-expiring.
  pub fn is_service_running(&self) -> bool {
    self.is_running_at(now_ms())
  }

  pub(crate) fn is_running_at(&self, now: u64) -> bool {
    let state = self.state.read();
    state.running && now.saturating_sub(state.last_heartbeat_ms) < LIVENESS_TIMEOUT_MS
  }

  /// Up to `limit` most recent transitions, oldest first.
  pub fn recent_transitions(&self, limit: usize) -> Vec<Transition> {
    let state = self.state.read();
    let skip = state.history.len().saturating_sub(limit);
    state.history.iter().skip(skip).cloned().collect()
  }

  /// Every retained transition, oldest first.
  pub fn all_transitions(&self) -> Vec<Transition> {
    self.state.read().history.iter().cloned().collect()
  }

  /// Point-in-time statistics.
  pub fn statistics(&self) -> TrackerStats {
    let state = self.state.read();
    TrackerStats {
      total_transitions: state.history.len(),
      running: state.running,
      last_heartbeat_ms: state.last_heartbeat_ms,
      now_ms: now_ms(),
    }
  }

  /// Register a callback for recorded transitions.
  pub fn add_transition_listener(
    &self,
    callback: impl Fn(&Transition) + Send + Sync + 'static,
  ) -> ListenerId {
    self.transition_listeners.add(callback)
  }

  pub fn remove_transition_listener(&self, id: ListenerId) -> bool {
    self.transition_listeners.remove(id)
  }

  /// Register a callback for liveness state changes.
  pub fn add_state_listener(&self, callback: impl Fn(&bool) + Send + Sync + 'static) -> ListenerId {
    self.state_listeners.add(callback)
  }

  pub fn remove_state_listener(&self, id: ListenerId) -> bool {
    self.state_listeners.remove(id)
  }
}

impl Default for TransitionTracker {
  fn default() -> Self {
    Self::new()
  }
}

impl std::fmt::Debug for TransitionTracker {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("TransitionTracker").finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::EventKind;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;

  fn transition(n: u64) -> Transition {
    Transition {
      timestamp_ms: n,
      from_package: format!("com.app.{}", n.saturating_sub(1)),
      to_package: format!("com.app.{n}"),
      from_activity: String::new(),
      to_activity: format!("Activity{n}"),
      event_kind: EventKind::WindowStateChanged,
    }
  }

  #[test]
  fn history_never_exceeds_capacity() {
    let tracker = TransitionTracker::new();
    for n in 0..250 {
      tracker.record_transition(transition(n));
    }
    assert_eq!(tracker.all_transitions().len(), HISTORY_CAPACITY);
  }

  #[test]
  fn eviction_is_fifo() {
    let tracker = TransitionTracker::new();
    for n in 0..150 {
      tracker.record_transition(transition(n));
    }
    let all = tracker.all_transitions();
    // 0..=49 evicted; oldest retained is 50.
    assert_eq!(all.first().map(|t| t.timestamp_ms), Some(50));
    assert_eq!(all.last().map(|t| t.timestamp_ms), Some(149));
  }

  #[test]
  fn recent_after_101_inserts_returns_five_newest_in_order() {
    let tracker = TransitionTracker::new();
    for n in 0..101 {
      tracker.record_transition(transition(n));
    }
    let recent = tracker.recent_transitions(5);
    let stamps: Vec<u64> = recent.iter().map(|t| t.timestamp_ms).collect();
    assert_eq!(stamps, vec![96, 97, 98, 99, 100]);
  }

  #[test]
  fn recent_with_large_limit_returns_everything() {
    let tracker = TransitionTracker::new();
    for n in 0..3 {
      tracker.record_transition(transition(n));
    }
    assert_eq!(tracker.recent_transitions(10).len(), 3);
  }

  #[test]
  fn liveness_expires_without_heartbeat() {
    let tracker = TransitionTracker::new();
    tracker.update_state_at(true, 1_000);

    assert!(tracker.is_running_at(1_000 + LIVENESS_TIMEOUT_MS - 1));
    assert!(!tracker.is_running_at(1_000 + LIVENESS_TIMEOUT_MS));
    assert!(!tracker.is_running_at(1_000 + LIVENESS_TIMEOUT_MS + 5_000));
  }

  #[test]
  fn explicit_stop_reports_not_running() {
    let tracker = TransitionTracker::new();
    tracker.update_state_at(true, 1_000);
    tracker.update_state_at(false, 2_000);
    assert!(!tracker.is_running_at(2_001));
  }

  #[test]
  fn listeners_hear_transitions_and_state() {
    let tracker = TransitionTracker::new();
    let transitions = Arc::new(AtomicUsize::new(0));
    let states = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&transitions);
    tracker.add_transition_listener(move |_| {
      counter.fetch_add(1, Ordering::SeqCst);
    });
    let counter = Arc::clone(&states);
    tracker.add_state_listener(move |_| {
      counter.fetch_add(1, Ordering::SeqCst);
    });

    tracker.record_transition(transition(1));
    tracker.update_state(true);

    assert_eq!(transitions.load(Ordering::SeqCst), 1);
    assert_eq!(states.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn statistics_reflect_current_state() {
    let tracker = TransitionTracker::new();
    tracker.record_transition(transition(1));
    tracker.record_transition(transition(2));
    tracker.update_state_at(true, 5_000);

    let stats = tracker.statistics();
    assert_eq!(stats.total_transitions, 2);
    assert!(stats.running);
    assert_eq!(stats.last_heartbeat_ms, 5_000);
  }
}
