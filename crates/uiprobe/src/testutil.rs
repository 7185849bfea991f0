/*!
Test fixtures: an in-memory platform tree with handle release accounting.

Every handle acquisition and release is counted on the shared tree, so tests
can assert the borrowed-handle contract (exactly one release per
acquisition, no double release) after exercising extraction, lookup and
routing.
*/

use crate::platform::{ActionArgs, NodeHandle, Platform};
use crate::types::Bounds;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// One node of the fixture tree.
pub(crate) struct MockNodeData {
  pub(crate) class: String,
  pub(crate) resource: String,
  pub(crate) text: String,
  pub(crate) description: String,
  pub(crate) clickable: bool,
  pub(crate) focusable: bool,
  pub(crate) enabled: bool,
  pub(crate) visible: bool,
  pub(crate) bounds: Option<Bounds>,
  pub(crate) state_attributes: BTreeMap<String, Value>,
  pub(crate) extras: BTreeMap<String, Value>,
  /// What `perform_action` reports for this node.
  pub(crate) action_ok: bool,
  pub(crate) children: Vec<Arc<MockNodeData>>,
}

/// Builder-style constructor for fixture nodes.
pub(crate) fn node(class: &str, resource: &str) -> MockNodeData {
  MockNodeData {
    class: class.to_owned(),
    resource: resource.to_owned(),
    text: String::new(),
    description: String::new(),
    clickable: false,
    focusable: false,
    enabled: true,
    visible: true,
    bounds: None,
    state_attributes: BTreeMap::new(),
    extras: BTreeMap::new(),
    action_ok: true,
    children: Vec::new(),
  }
}

impl MockNodeData {
  pub(crate) fn text(mut self, text: &str) -> Self {
    self.text = text.to_owned();
    self
  }

  pub(crate) fn description(mut self, description: &str) -> Self {
    self.description = description.to_owned();
    self
  }

  pub(crate) fn clickable(mut self) -> Self {
    self.clickable = true;
    self
  }

  pub(crate) fn bounds(mut self, left: i32, top: i32, right: i32, bottom: i32) -> Self {
    self.bounds = Some(Bounds {
      left,
      top,
      right,
      bottom,
    });
    self
  }

  pub(crate) fn state_attribute(mut self, key: &str, value: impl Into<Value>) -> Self {
    self.state_attributes.insert(key.to_owned(), value.into());
    self
  }

  pub(crate) fn extra(mut self, key: &str, value: impl Into<Value>) -> Self {
    self.extras.insert(key.to_owned(), value.into());
    self
  }

  pub(crate) fn action_fails(mut self) -> Self {
    self.action_ok = false;
    self
  }

  pub(crate) fn child(mut self, child: MockNodeData) -> Self {
    self.children.push(Arc::new(child));
    self
  }
}

/// An action observed by the fixture tree.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PerformedAction {
  /// Resource name of the target node.
  pub(crate) resource: String,
  pub(crate) code: i32,
  pub(crate) args: Option<ActionArgs>,
}

pub(crate) struct MockTreeInner {
  root: Mutex<Option<Arc<MockNodeData>>>,
  feature_level: u32,
  acquired: AtomicUsize,
  released: AtomicUsize,
  actions: Mutex<Vec<PerformedAction>>,
}

/// Fixture platform. Clone shares the same tree and counters.
#[derive(Clone)]
pub(crate) struct MockTree(Arc<MockTreeInner>);

impl MockTree {
  pub(crate) fn new(root: MockNodeData, feature_level: u32) -> Self {
    Self(Arc::new(MockTreeInner {
      root: Mutex::new(Some(Arc::new(root))),
      feature_level,
      acquired: AtomicUsize::new(0),
      released: AtomicUsize::new(0),
      actions: Mutex::new(Vec::new()),
    }))
  }

  /// A platform with no foreground window.
  pub(crate) fn without_window(feature_level: u32) -> Self {
    Self(Arc::new(MockTreeInner {
      root: Mutex::new(None),
      feature_level,
      acquired: AtomicUsize::new(0),
      released: AtomicUsize::new(0),
      actions: Mutex::new(Vec::new()),
    }))
  }

  pub(crate) fn acquired(&self) -> usize {
    self.0.acquired.load(Ordering::SeqCst)
  }

  pub(crate) fn released(&self) -> usize {
    self.0.released.load(Ordering::SeqCst)
  }

  /// Assert that every acquired handle has been released.
  pub(crate) fn assert_balanced(&self) {
    assert_eq!(
      self.acquired(),
      self.released(),
      "handle acquisitions and releases must balance"
    );
  }

  pub(crate) fn performed_actions(&self) -> Vec<PerformedAction> {
    self.0.actions.lock().clone()
  }

  fn acquire(&self, data: Arc<MockNodeData>) -> MockHandle {
    self.0.acquired.fetch_add(1, Ordering::SeqCst);
    MockHandle {
      data,
      tree: Arc::clone(&self.0),
      released: false,
    }
  }
}

impl Platform for MockTree {
  type Handle = MockHandle;

  fn active_root(&self) -> Option<MockHandle> {
    let root = self.0.root.lock().clone()?;
    Some(self.acquire(root))
  }

  fn feature_level(&self) -> u32 {
    self.0.feature_level
  }
}

/// Borrowed handle into the fixture tree.
pub(crate) struct MockHandle {
  data: Arc<MockNodeData>,
  tree: Arc<MockTreeInner>,
  released: bool,
}

impl NodeHandle for MockHandle {
  fn class_name(&self) -> String {
    self.data.class.clone()
  }

  fn resource_name(&self) -> String {
    self.data.resource.clone()
  }

  fn text(&self) -> String {
    self.data.text.clone()
  }

  fn content_description(&self) -> String {
    self.data.description.clone()
  }

  fn is_clickable(&self) -> bool {
    self.data.clickable
  }

  fn is_focusable(&self) -> bool {
    self.data.focusable
  }

  fn is_enabled(&self) -> bool {
    self.data.enabled
  }

  fn is_visible(&self) -> bool {
    self.data.visible
  }

  fn child_count(&self) -> usize {
    self.data.children.len()
  }

  fn child(&self, index: usize) -> Option<Self> {
    let child = self.data.children.get(index)?;
    self.tree.acquired.fetch_add(1, Ordering::SeqCst);
    Some(MockHandle {
      data: Arc::clone(child),
      tree: Arc::clone(&self.tree),
      released: false,
    })
  }

  fn bounds(&self) -> Option<Bounds> {
    self.data.bounds
  }

  fn state_attributes(&self) -> BTreeMap<String, Value> {
    self.data.state_attributes.clone()
  }

  fn extras(&self) -> BTreeMap<String, Value> {
    self.data.extras.clone()
  }

  fn perform_action(&self, code: i32, args: Option<&ActionArgs>) -> bool {
    self.tree.actions.lock().push(PerformedAction {
      resource: self.data.resource.clone(),
      code,
      args: args.cloned(),
    });
    self.data.action_ok
  }

  fn release(&mut self) {
    assert!(!self.released, "handle released twice");
    self.released = true;
    self.tree.released.fetch_add(1, Ordering::SeqCst);
  }
}
