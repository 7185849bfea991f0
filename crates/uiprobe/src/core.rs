/*!
Core probe instance - owns foreground context, transition tracking,
listener registries and the event bus.

One `Probe` exists per host service and is passed explicitly to whatever
needs it; there is no global instance. The host feeds raw platform events
into [`Probe::on_platform_event`] from the platform's dispatch thread, and
issues commands through [`Probe::route`] from any thread.
*/

use crate::clock::now_ms;
use crate::events::{ListenerId, ListenerSet};
use crate::extract::{self, Extractor};
use crate::locate;
use crate::platform::{Capabilities, HandleGuard, Platform};
use crate::tracker::{TrackerStats, TransitionTracker};
use crate::types::{EventKind, NodeId, Snapshot, Transition, UiContext, UiEvent};
use async_broadcast::{InactiveReceiver, Receiver, Sender};
use parking_lot::RwLock;
use std::sync::Arc;

const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Events published on the probe's subscription bus.
#[derive(Debug, Clone)]
pub enum ProbeEvent {
  /// Raw platform event, forwarded verbatim.
  EventReceived(UiEvent),
  /// Foreground package/activity changed.
  TransitionRecorded(Transition),
  /// Liveness flag updated.
  StateChanged { running: bool },
  /// Window content changed and a fresh snapshot was taken.
  TreeChanged(Arc<Snapshot>),
}

/// Main probe instance.
pub struct Probe<P: Platform> {
  pub(crate) platform: P,
  pub(crate) caps: Capabilities,
  context: RwLock<UiContext>,
  tracker: TransitionTracker,
  event_listeners: ListenerSet<UiEvent>,
  tree_listeners: ListenerSet<Snapshot>,
  events_tx: Sender<ProbeEvent>,
  events_keepalive: InactiveReceiver<ProbeEvent>,
}

impl<P: Platform> Probe<P> {
  /// Wire a probe over a host-supplied platform.
  ///
  /// The platform's feature level is resolved into a capability set here,
  /// once; extraction branches on that set from then on.
  pub fn new(platform: P) -> Self {
    let caps = Capabilities::from_feature_level(platform.feature_level());
    let (mut tx, rx) = async_broadcast::broadcast(EVENT_CHANNEL_CAPACITY);
    tx.set_overflow(true); // Drop oldest messages when full

    Self {
      platform,
      caps,
      context: RwLock::new(UiContext::default()),
      tracker: TransitionTracker::new(),
      event_listeners: ListenerSet::new(),
      tree_listeners: ListenerSet::new(),
      events_tx: tx,
      events_keepalive: rx.deactivate(),
    }
  }

  /// Subscribe to the probe's event bus.
  pub fn subscribe(&self) -> Receiver<ProbeEvent> {
    self.events_keepalive.activate_cloned()
  }

  fn broadcast(&self, event: ProbeEvent) {
    if self.events_tx.try_broadcast(event).is_err() {
      log::debug!("event bus closed or full; dropping broadcast");
    }
  }

  // ==========================================================================
  // Queries
  // ==========================================================================

  /// Resolved capability set.
  pub const fn capabilities(&self) -> Capabilities {
    self.caps
  }

  /// Current foreground context.
  pub fn current_context(&self) -> UiContext {
    self.context.read().clone()
  }

  /// Take a fresh snapshot of the active window's tree.
  ///
  /// `None` when no foreground window exists - an expected steady state.
  pub fn current_snapshot(&self) -> Option<Snapshot> {
    let context = self.current_context();
    extract::take_snapshot(&self.platform, self.caps, &context)
  }

  /// Take a snapshot rooted at the node with the given id.
  ///
  /// `None` when there is no active window or no node with that id.
  pub fn snapshot_for_node(&self, id: &NodeId) -> Option<Snapshot> {
    let root = HandleGuard::new(self.platform.active_root()?);
    let found = locate::find_by_id(root, id)?;
    let context = self.current_context();
    Some(Snapshot {
      timestamp_ms: now_ms(),
      package_name: context.package_name,
      activity_name: context.activity_name,
      window_title: context.window_title,
      root: Extractor::new(self.caps).extract(&*found),
    })
  }

  /// Up to `limit` most recent transitions, oldest first.
  pub fn recent_transitions(&self, limit: usize) -> Vec<Transition> {
    self.tracker.recent_transitions(limit)
  }

  /// Every retained transition, oldest first.
  pub fn all_transitions(&self) -> Vec<Transition> {
    self.tracker.all_transitions()
  }

  /// Whether the tracked service is alive (heartbeat-fresh and running).
  pub fn is_service_running(&self) -> bool {
    self.tracker.is_service_running()
  }

  /// Point-in-time tracker statistics.
  pub fn statistics(&self) -> TrackerStats {
    self.tracker.statistics()
  }

  // ==========================================================================
  // Liveness
  // ==========================================================================

  /// Record a liveness heartbeat.
  pub fn update_liveness(&self, running: bool) {
    self.tracker.update_state(running);
    self.broadcast(ProbeEvent::StateChanged { running });
  }

  // ==========================================================================
  // Event intake (platform dispatch thread)
  // ==========================================================================

  /// Entry point for the host's raw platform event stream.
  ///
  /// Delivered synchronously, one event at a time, on the platform's
  /// dispatch thread; handlers stay quick and never block.
  pub fn on_platform_event(&self, event: &UiEvent) {
    match event.kind {
      EventKind::WindowStateChanged => self.handle_window_state_changed(event),
      EventKind::WindowContentChanged => self.handle_content_changed(),
      EventKind::ScreenStateChanged => self.handle_screen_state_changed(event),
      EventKind::Scrolled
      | EventKind::Clicked
      | EventKind::Focused
      | EventKind::NotificationChanged
      | EventKind::Other(_) => {}
    }

    self.event_listeners.emit(event);
    self.broadcast(ProbeEvent::EventReceived(event.clone()));
  }

  /// Compare old vs new foreground and record a transition only on change.
  fn handle_window_state_changed(&self, event: &UiEvent) {
    let activity = event.class_name.clone().unwrap_or_default();

    let transition = {
      let mut context = self.context.write();
      let changed = context.package_name != event.package_name || context.activity_name != activity;
      context.timestamp_ms = event.timestamp_ms;
      if let Some(title) = &event.window_title {
        context.window_title.clone_from(title);
      }
      if changed {
        let from_package = std::mem::replace(&mut context.package_name, event.package_name.clone());
        let from_activity = std::mem::replace(&mut context.activity_name, activity.clone());
        Some(Transition {
          timestamp_ms: event.timestamp_ms,
          from_package,
          to_package: event.package_name.clone(),
          from_activity,
          to_activity: activity,
          event_kind: event.kind,
        })
      } else {
        None
      }
    };

    if let Some(transition) = transition {
      self.tracker.record_transition(transition.clone());
      self.broadcast(ProbeEvent::TransitionRecorded(transition));
    }
  }

  fn handle_content_changed(&self) {
    let Some(snapshot) = self.current_snapshot() else {
      log::debug!("content changed but no active window; skipping snapshot");
      return;
    };
    self.tree_listeners.emit(&snapshot);
    self.broadcast(ProbeEvent::TreeChanged(Arc::new(snapshot)));
  }

  fn handle_screen_state_changed(&self, event: &UiEvent) {
    let Some(screen_on) = event.screen_on else {
      return;
    };
    let mut context = self.context.write();
    context.screen_on = screen_on;
    context.timestamp_ms = event.timestamp_ms;
  }

  // ==========================================================================
  // Listener registration
  // ==========================================================================

  /// Register a callback for every raw platform event.
  pub fn add_event_listener(
    &self,
    callback: impl Fn(&UiEvent) + Send + Sync + 'static,
  ) -> ListenerId {
    self.event_listeners.add(callback)
  }

  pub fn remove_event_listener(&self, id: ListenerId) -> bool {
    self.event_listeners.remove(id)
  }

  /// Register a callback for recorded transitions.
  pub fn add_transition_listener(
    &self,
    callback: impl Fn(&Transition) + Send + Sync + 'static,
  ) -> ListenerId {
    self.tracker.add_transition_listener(callback)
  }

  pub fn remove_transition_listener(&self, id: ListenerId) -> bool {
    self.tracker.remove_transition_listener(id)
  }

  /// Register a callback for liveness state changes.
  pub fn add_state_listener(&self, callback: impl Fn(&bool) + Send + Sync + 'static) -> ListenerId {
    self.tracker.add_state_listener(callback)
  }

  pub fn remove_state_listener(&self, id: ListenerId) -> bool {
    self.tracker.remove_state_listener(id)
  }

  /// Register a callback for content-changed snapshots.
  pub fn add_tree_listener(
    &self,
    callback: impl Fn(&Snapshot) + Send + Sync + 'static,
  ) -> ListenerId {
    self.tree_listeners.add(callback)
  }

  pub fn remove_tree_listener(&self, id: ListenerId) -> bool {
    self.tree_listeners.remove(id)
  }
}

impl<P: Platform> std::fmt::Debug for Probe<P> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Probe")
      .field("caps", &self.caps)
      .finish_non_exhaustive()
  }
}
