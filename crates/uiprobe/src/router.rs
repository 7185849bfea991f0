/*!
Command routing.

Single dispatch point for typed UI commands. Each handler validates its
parameters, locates its target on the live tree and performs the platform
call; every failure - missing parameter, absent window, unknown node,
platform refusal, panic - is caught at this boundary and reported as a
failed `CommandResult`, never propagated. Commands run synchronously on the
caller's thread and may run concurrently with each other and with event
delivery.
*/

use crate::core::Probe;
use crate::extract::Extractor;
use crate::locate;
use crate::platform::{actions, ActionArgs, HandleGuard, NodeHandle, Platform};
use crate::types::{Command, CommandKind, CommandResult, NodeId, ProbeError, ProbeResult};
use serde_json::Value;
use std::panic::{self, AssertUnwindSafe};

const DEFAULT_TRANSITION_LIMIT: usize = 10;

impl<P: Platform> Probe<P> {
  /// Route a typed command against the live tree.
  ///
  /// Never panics out; `timeout_ms` on the command is advisory and not
  /// enforced at this layer.
  pub fn route(&self, command: &Command) -> CommandResult {
    match panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(command))) {
      Ok(Ok(data)) => CommandResult::ok(data),
      Ok(Err(err)) => CommandResult::fail(err.to_string()),
      Err(payload) => {
        let err = ProbeError::Unexpected(panic_message(payload.as_ref()));
        log::error!("command handler panicked: {err}");
        CommandResult::fail(err.to_string())
      }
    }
  }

  fn dispatch(&self, command: &Command) -> ProbeResult<Option<Value>> {
    match command.kind {
      CommandKind::GetTreeSnapshot => self.handle_tree_snapshot(),
      CommandKind::GetCurrentContext => Ok(Some(serde_json::to_value(self.current_context())?)),
      CommandKind::GetRecentTransitions => self.handle_recent_transitions(command),
      CommandKind::ExecuteGenericAction => self.handle_generic_action(command),
      CommandKind::FindByText => self.handle_find_by_text(command),
      CommandKind::FindById => self.handle_find_by_id(command),
      CommandKind::ScrollNode => self.handle_scroll(command),
      CommandKind::ClickNode => self.handle_click(command),
      CommandKind::SetText => self.handle_set_text(command),
    }
  }

  fn handle_tree_snapshot(&self) -> ProbeResult<Option<Value>> {
    let snapshot = self.current_snapshot().ok_or(ProbeError::NoActiveWindow)?;
    Ok(Some(serde_json::to_value(snapshot)?))
  }

  fn handle_recent_transitions(&self, command: &Command) -> ProbeResult<Option<Value>> {
    let limit = command
      .u64_param("limit")
      .and_then(|limit| usize::try_from(limit).ok())
      .unwrap_or(DEFAULT_TRANSITION_LIMIT);
    Ok(Some(serde_json::to_value(self.recent_transitions(limit))?))
  }

  fn handle_generic_action(&self, command: &Command) -> ProbeResult<Option<Value>> {
    let node_id = NodeId(command.require_str("nodeId")?.to_owned());
    let code = i32::try_from(command.require_i64("actionCode")?)
      .map_err(|_| ProbeError::MissingParameter("actionCode"))?;
    let args = command.map_param("arguments").cloned();
    self.perform(&node_id, code, args.as_ref())
  }

  fn handle_find_by_text(&self, command: &Command) -> ProbeResult<Option<Value>> {
    let query = command.str_param("text").unwrap_or_default();
    let include_bounds = command.bool_param("includeBounds").unwrap_or(false);

    let root = self.active_root_guard()?;
    let matches = locate::find_by_text(&*root, query, include_bounds);
    Ok(Some(serde_json::to_value(matches)?))
  }

  fn handle_find_by_id(&self, command: &Command) -> ProbeResult<Option<Value>> {
    let node_id = NodeId(command.require_str("nodeId")?.to_owned());

    let root = self.active_root_guard()?;
    let found =
      locate::find_by_id(root, &node_id).ok_or_else(|| ProbeError::NodeNotFound(node_id))?;
    let subtree = Extractor::new(self.caps).extract(&*found);
    Ok(Some(serde_json::to_value(subtree)?))
  }

  fn handle_scroll(&self, command: &Command) -> ProbeResult<Option<Value>> {
    let node_id = NodeId(command.require_str("nodeId")?.to_owned());
    let code = match command.str_param("direction") {
      Some("backward") => actions::SCROLL_BACKWARD,
      // Absent or anything else scrolls forward.
      Some(_) | None => actions::SCROLL_FORWARD,
    };
    self.perform(&node_id, code, None)
  }

  fn handle_click(&self, command: &Command) -> ProbeResult<Option<Value>> {
    let node_id = NodeId(command.require_str("nodeId")?.to_owned());
    self.perform(&node_id, actions::CLICK, None)
  }

  fn handle_set_text(&self, command: &Command) -> ProbeResult<Option<Value>> {
    let node_id = NodeId(command.require_str("nodeId")?.to_owned());
    let text = command.str_param("text").unwrap_or_default();

    let mut args = ActionArgs::new();
    args.insert(actions::SET_TEXT_ARGUMENT.to_owned(), Value::from(text));
    self.perform(&node_id, actions::SET_TEXT, Some(&args))
  }

  /// Locate a node and run a platform action against it.
  ///
  /// The platform's boolean result passes through verbatim: `true` becomes a
  /// bare success, `false` a failed result with no data. The located handle
  /// is released on every exit path - the guard returned by the locator is
  /// held for exactly the duration of the call.
  fn perform(&self, id: &NodeId, code: i32, args: Option<&ActionArgs>) -> ProbeResult<Option<Value>> {
    let root = self.active_root_guard()?;
    let found = locate::find_by_id(root, id).ok_or_else(|| ProbeError::NodeNotFound(id.clone()))?;
    if found.perform_action(code, args) {
      Ok(None)
    } else {
      Err(ProbeError::ActionFailed)
    }
  }

  fn active_root_guard(&self) -> ProbeResult<HandleGuard<P::Handle>> {
    self
      .platform
      .active_root()
      .map(HandleGuard::new)
      .ok_or(ProbeError::NoActiveWindow)
  }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
  payload
    .downcast_ref::<&str>()
    .map(|s| (*s).to_owned())
    .or_else(|| payload.downcast_ref::<String>().cloned())
    .unwrap_or_else(|| "command handler panicked".to_owned())
}
