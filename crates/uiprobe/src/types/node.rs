/*! Node type representing one element of the externally exposed UI surface tree. */

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier for a node, derived from class name, resource name and a
/// per-pass discriminator.
///
/// The discriminator is the node's depth-first preorder position within one
/// extraction pass. Ids are unique within a pass only; an id from a prior
/// snapshot resolves against the live tree as long as the tree shape has not
/// changed underneath it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into)]
pub struct NodeId(pub String);

impl NodeId {
  /// Derive the id for the node at preorder position `seq`.
  ///
  /// Extraction and lookup both use this derivation, so ids computed by one
  /// are comparable against ids computed by the other.
  pub fn derive(class_name: &str, resource_name: &str, seq: u32) -> Self {
    Self(format!("{class_name}/{resource_name}#{seq}"))
  }

  /// The id as a string slice.
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

/// Screen rectangle of a node, in platform pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
  pub left: i32,
  pub top: i32,
  pub right: i32,
  pub bottom: i32,
}

impl Bounds {
  /// Width of the rectangle.
  pub const fn width(&self) -> i32 {
    self.right - self.left
  }

  /// Height of the rectangle.
  pub const fn height(&self) -> i32 {
    self.bottom - self.top
  }
}

/// One element of the UI surface tree.
///
/// Value object - holds no platform resources. Text fields missing on the
/// platform side are empty strings, never absent, and `attributes` is empty
/// on platforms below the capability tier that reports them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
  pub id: NodeId,
  pub class_name: String,
  pub resource_name: String,
  pub text: String,
  pub content_description: String,
  pub clickable: bool,
  pub focusable: bool,
  pub enabled: bool,
  pub visible: bool,
  /// Best-effort - `None` when the platform could not report bounds.
  pub bounds: Option<Bounds>,
  /// Capability-dependent extras (state flags, structured platform data).
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub attributes: BTreeMap<String, serde_json::Value>,
  /// Ordered children, exclusively owned by this node.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub children: Vec<Node>,
}

impl Node {
  /// Total number of nodes in this subtree, including self.
  pub fn subtree_size(&self) -> usize {
    1 + self.children.iter().map(Node::subtree_size).sum::<usize>()
  }
}
