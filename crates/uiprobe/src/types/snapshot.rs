/*! Snapshot, foreground context and transition types. */

use super::{EventKind, Node};
use serde::{Deserialize, Serialize};

/// Immutable, fully materialized copy of the node tree plus context metadata,
/// taken at one instant.
///
/// Created on demand or on content-changed events and handed to callers or
/// listeners; holds no platform resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
  pub timestamp_ms: u64,
  pub package_name: String,
  pub activity_name: String,
  pub window_title: String,
  pub root: Node,
}

/// Where the foreground UI is right now.
///
/// Mutated only by the window-state event handler; read by anyone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiContext {
  pub package_name: String,
  pub activity_name: String,
  pub window_title: String,
  pub screen_on: bool,
  pub timestamp_ms: u64,
}

impl Default for UiContext {
  fn default() -> Self {
    Self {
      package_name: String::new(),
      activity_name: String::new(),
      window_title: String::new(),
      screen_on: true,
      timestamp_ms: 0,
    }
  }
}

/// A recorded change of foreground package/activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
  pub timestamp_ms: u64,
  pub from_package: String,
  pub to_package: String,
  pub from_activity: String,
  pub to_activity: String,
  /// Kind tag of the platform event that produced this transition.
  pub event_kind: EventKind,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::NodeId;

  fn leaf(seq: u32, class: &str, text: &str) -> Node {
    Node {
      id: NodeId::derive(class, "", seq),
      class_name: class.to_owned(),
      resource_name: String::new(),
      text: text.to_owned(),
      content_description: String::new(),
      clickable: false,
      focusable: false,
      enabled: true,
      visible: true,
      bounds: None,
      attributes: std::collections::BTreeMap::new(),
      children: Vec::new(),
    }
  }

  #[test]
  fn snapshot_serde_round_trip() {
    let mut root = leaf(0, "android.widget.FrameLayout", "");
    root.children = vec![
      leaf(1, "android.widget.TextView", "Hello"),
      leaf(2, "android.widget.Button", "OK"),
    ];

    let snapshot = Snapshot {
      timestamp_ms: 1_700_000_000_000,
      package_name: "com.example.app".into(),
      activity_name: "com.example.app.MainActivity".into(),
      window_title: "Example".into(),
      root,
    };

    let json = serde_json::to_string(&snapshot).unwrap();
    let back: Snapshot = serde_json::from_str(&json).unwrap();

    assert_eq!(back.package_name, snapshot.package_name);
    assert_eq!(back.activity_name, snapshot.activity_name);
    assert_eq!(back.root.class_name, snapshot.root.class_name);
    assert_eq!(back.root.children.len(), 2);
    assert_eq!(back, snapshot);
  }

  #[test]
  fn default_context_is_empty_with_screen_on() {
    let ctx = UiContext::default();
    assert!(ctx.package_name.is_empty());
    assert!(ctx.activity_name.is_empty());
    assert!(ctx.screen_on);
  }
}
