/*! Raw platform event types. */

use serde::{Deserialize, Serialize};

/// Kind tag of a raw platform accessibility event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
  WindowStateChanged,
  WindowContentChanged,
  Scrolled,
  Clicked,
  Focused,
  NotificationChanged,
  ScreenStateChanged,
  /// Platform event kind this core does not interpret; the raw tag is kept.
  Other(i32),
}

/// Raw platform event as delivered by the host's event stream.
///
/// The platform delivers these one at a time on its own dispatch thread;
/// handlers must stay quick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiEvent {
  pub kind: EventKind,
  /// Source package of the event. Empty when the platform reports none.
  #[serde(default)]
  pub package_name: String,
  /// Source class name, when the platform reports one.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub class_name: Option<String>,
  /// Window title, when the platform reports one.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub window_title: Option<String>,
  /// Screen power state, set on screen-state-changed events.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub screen_on: Option<bool>,
  pub timestamp_ms: u64,
}

impl UiEvent {
  /// Build an event with just a kind, source package and timestamp.
  pub fn new(kind: EventKind, package_name: impl Into<String>, timestamp_ms: u64) -> Self {
    Self {
      kind,
      package_name: package_name.into(),
      class_name: None,
      window_title: None,
      screen_on: None,
      timestamp_ms,
    }
  }
}
