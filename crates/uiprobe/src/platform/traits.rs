/*!
Platform abstraction traits.

These define the contract between core code and the host environment.
The host implements them over its native accessibility API; core code only
ever sees these traits.
*/

use crate::types::Bounds;
use serde_json::Value;
use std::collections::BTreeMap;

/// Arguments attached to a platform action (e.g. the set-text payload).
pub type ActionArgs = serde_json::Map<String, Value>;

/// Host-supplied platform surface.
pub trait Platform: Send + Sync {
  type Handle: NodeHandle;

  /// Acquire the root handle of the active window.
  ///
  /// `None` is the expected steady state when no foreground window exists -
  /// it is not an error. The returned handle must be released by the caller
  /// (wrap it in a [`super::HandleGuard`]).
  fn active_root(&self) -> Option<Self::Handle>;

  /// Advertised platform feature level.
  ///
  /// Queried once at probe construction and resolved into
  /// [`super::Capabilities`].
  fn feature_level(&self) -> u32;
}

/// Per-node operations on a borrowed platform handle.
///
/// Handles are owned by the platform. Every acquisition - root, child,
/// search match - must be balanced by exactly one [`NodeHandle::release`];
/// core code guarantees this by wrapping handles in
/// [`super::HandleGuard`] at the acquisition site.
pub trait NodeHandle {
  fn class_name(&self) -> String;
  fn resource_name(&self) -> String;
  fn text(&self) -> String;
  fn content_description(&self) -> String;

  fn is_clickable(&self) -> bool;
  fn is_focusable(&self) -> bool;
  fn is_enabled(&self) -> bool;
  fn is_visible(&self) -> bool;

  /// Number of children the platform reports.
  fn child_count(&self) -> usize;

  /// Acquire a child handle.
  ///
  /// `None` when the child detached or was destroyed concurrently; the walk
  /// skips it rather than failing.
  fn child(&self, index: usize) -> Option<Self>
  where
    Self: Sized;

  /// Best-effort bounds query. `None` when the platform cannot report them.
  fn bounds(&self) -> Option<Bounds>;

  /// Extended state attributes (checkable, checked, scrollable, editable).
  ///
  /// Queried only when [`super::Capabilities::extended_attributes`] is set.
  fn state_attributes(&self) -> BTreeMap<String, Value>;

  /// Structured extras reported by the newest platform tier.
  ///
  /// Queried only when [`super::Capabilities::extras`] is set.
  fn extras(&self) -> BTreeMap<String, Value>;

  /// Perform a platform action against this node.
  ///
  /// The boolean is the platform's verbatim result and is passed through to
  /// command results unchanged.
  fn perform_action(&self, code: i32, args: Option<&ActionArgs>) -> bool;

  /// Release the handle back to the platform.
  ///
  /// Called exactly once, by the owning [`super::HandleGuard`].
  fn release(&mut self);
}
