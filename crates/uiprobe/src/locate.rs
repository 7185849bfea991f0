/*!
Search over the live platform tree.

Both lookups walk the live tree depth-first and derive node ids exactly as
extraction does (preorder sequence), so an id taken from a prior snapshot
resolves against an unchanged live tree. Handles acquired during the walk
are released before returning, with one exception: the by-id match is
handed back as an open guard and the caller takes over its release.
*/

use crate::platform::{HandleGuard, NodeHandle};
use crate::types::{Node, NodeId};
use std::collections::BTreeMap;

/// Depth-first search for the node with the given computed id.
///
/// Returns the first match as an open handle guard; every other traversed
/// handle, including the root on a miss, is released before returning.
pub(crate) fn find_by_id<H: NodeHandle>(
  root: HandleGuard<H>,
  target: &NodeId,
) -> Option<HandleGuard<H>> {
  let mut seq = 0;
  find_by_id_at(root, target, &mut seq)
}

fn find_by_id_at<H: NodeHandle>(
  handle: HandleGuard<H>,
  target: &NodeId,
  seq: &mut u32,
) -> Option<HandleGuard<H>> {
  let id = NodeId::derive(&handle.class_name(), &handle.resource_name(), *seq);
  *seq += 1;
  if id == *target {
    return Some(handle);
  }

  for index in 0..handle.child_count() {
    let Some(child) = handle.child(index) else {
      continue;
    };
    if let Some(found) = find_by_id_at(HandleGuard::new(child), target, seq) {
      // Ancestor guards drop as the recursion returns; only the match
      // stays open.
      return Some(found);
    }
  }
  None
}

/// Collect every node whose text or description contains `query`,
/// case-insensitive.
///
/// Exhaustive by contract - there is no short-circuit on first match. The
/// returned nodes are value objects without children; bounds are queried
/// only when `include_bounds` is set, to keep the scan cheap.
pub(crate) fn find_by_text<H: NodeHandle>(
  root: &H,
  query: &str,
  include_bounds: bool,
) -> Vec<Node> {
  let needle = query.to_lowercase();
  let mut matches = Vec::new();
  let mut seq = 0;
  collect_matches(root, &needle, include_bounds, &mut seq, &mut matches);
  matches
}

fn collect_matches<H: NodeHandle>(
  handle: &H,
  needle: &str,
  include_bounds: bool,
  seq: &mut u32,
  out: &mut Vec<Node>,
) {
  let class_name = handle.class_name();
  let resource_name = handle.resource_name();
  let id = NodeId::derive(&class_name, &resource_name, *seq);
  *seq += 1;

  let text = handle.text();
  let content_description = handle.content_description();
  if text.to_lowercase().contains(needle) || content_description.to_lowercase().contains(needle) {
    out.push(Node {
      id,
      class_name,
      resource_name,
      text,
      content_description,
      clickable: handle.is_clickable(),
      focusable: handle.is_focusable(),
      enabled: handle.is_enabled(),
      visible: handle.is_visible(),
      bounds: if include_bounds { handle.bounds() } else { None },
      attributes: BTreeMap::new(),
      children: Vec::new(),
    });
  }

  for index in 0..handle.child_count() {
    let Some(child) = handle.child(index) else {
      continue;
    };
    let child = HandleGuard::new(child);
    collect_matches(&*child, needle, include_bounds, seq, out);
  }
}
