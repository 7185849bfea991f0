/*!
Node tree extraction.

Walks a live platform tree into an immutable [`Node`] value, in the
platform's reported child order, releasing every child handle as the walk
unwinds. Which attributes are read is decided by the capability set
resolved at probe construction, never by inline feature-level checks.
*/

use crate::clock::now_ms;
use crate::platform::{Capabilities, HandleGuard, NodeHandle, Platform};
use crate::types::{Node, NodeId, Snapshot, UiContext};
use std::collections::BTreeMap;

/// Materializes live platform trees into [`Node`] values.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Extractor {
  caps: Capabilities,
}

impl Extractor {
  pub(crate) const fn new(caps: Capabilities) -> Self {
    Self { caps }
  }

  /// Materialize the tree under `root`.
  ///
  /// Child handles are acquired and released during the walk. The root
  /// handle stays open; its release obligation remains with the caller.
  pub(crate) fn extract<H: NodeHandle>(&self, root: &H) -> Node {
    let mut seq = 0;
    self.extract_node(root, &mut seq)
  }

  fn extract_node<H: NodeHandle>(&self, handle: &H, seq: &mut u32) -> Node {
    let class_name = handle.class_name();
    let resource_name = handle.resource_name();
    let id = NodeId::derive(&class_name, &resource_name, *seq);
    *seq += 1;

    let mut attributes = BTreeMap::new();
    if self.caps.extended_attributes {
      attributes.extend(handle.state_attributes());
    }
    if self.caps.extras {
      attributes.extend(handle.extras());
    }

    let mut children = Vec::with_capacity(handle.child_count());
    for index in 0..handle.child_count() {
      // A child that detached mid-walk is skipped, not an error.
      let Some(child) = handle.child(index) else {
        continue;
      };
      let child = HandleGuard::new(child);
      children.push(self.extract_node(&*child, seq));
    }

    Node {
      id,
      class_name,
      resource_name,
      text: handle.text(),
      content_description: handle.content_description(),
      clickable: handle.is_clickable(),
      focusable: handle.is_focusable(),
      enabled: handle.is_enabled(),
      visible: handle.is_visible(),
      bounds: handle.bounds(),
      attributes,
      children,
    }
  }
}

/// Take a snapshot of the active window's tree.
///
/// `None` when no foreground window exists - an expected steady state, not
/// an error.
pub(crate) fn take_snapshot<P: Platform>(
  platform: &P,
  caps: Capabilities,
  context: &UiContext,
) -> Option<Snapshot> {
  let root = HandleGuard::new(platform.active_root()?);
  let tree = Extractor::new(caps).extract(&*root);
  Some(Snapshot {
    timestamp_ms: now_ms(),
    package_name: context.package_name.clone(),
    activity_name: context.activity_name.clone(),
    window_title: context.window_title.clone(),
    root: tree,
  })
}
