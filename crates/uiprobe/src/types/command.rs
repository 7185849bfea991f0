/*! Typed commands and their uniform result shape. */

use super::{ProbeError, ProbeResult};
use crate::clock::now_ms;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Advisory command timeout applied when the caller supplies none.
pub const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 5_000;

const fn default_timeout_ms() -> u64 {
  DEFAULT_COMMAND_TIMEOUT_MS
}

/// Command kinds accepted by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandKind {
  GetTreeSnapshot,
  GetCurrentContext,
  GetRecentTransitions,
  ExecuteGenericAction,
  FindByText,
  FindById,
  ScrollNode,
  ClickNode,
  SetText,
}

/// A typed command against the live UI tree.
///
/// Parameters are kind-dependent; see the router's dispatch table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
  pub kind: CommandKind,
  #[serde(default)]
  pub params: serde_json::Map<String, Value>,
  /// Advisory only - no deadline is enforced at this layer.
  #[serde(default = "default_timeout_ms")]
  pub timeout_ms: u64,
}

impl Command {
  /// Build a command with no parameters.
  pub fn new(kind: CommandKind) -> Self {
    Self {
      kind,
      params: serde_json::Map::new(),
      timeout_ms: DEFAULT_COMMAND_TIMEOUT_MS,
    }
  }

  /// Attach a parameter.
  #[must_use]
  pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.params.insert(key.into(), value.into());
    self
  }

  /// Optional string parameter.
  pub(crate) fn str_param(&self, key: &str) -> Option<&str> {
    self.params.get(key).and_then(Value::as_str)
  }

  /// Optional unsigned integer parameter.
  pub(crate) fn u64_param(&self, key: &str) -> Option<u64> {
    self.params.get(key).and_then(Value::as_u64)
  }

  /// Optional boolean parameter.
  pub(crate) fn bool_param(&self, key: &str) -> Option<bool> {
    self.params.get(key).and_then(Value::as_bool)
  }

  /// Optional object parameter.
  pub(crate) fn map_param(&self, key: &str) -> Option<&serde_json::Map<String, Value>> {
    self.params.get(key).and_then(Value::as_object)
  }

  /// Required string parameter.
  pub(crate) fn require_str(&self, key: &'static str) -> ProbeResult<&str> {
    self.str_param(key).ok_or(ProbeError::MissingParameter(key))
  }

  /// Required integer parameter.
  pub(crate) fn require_i64(&self, key: &'static str) -> ProbeResult<i64> {
    self
      .params
      .get(key)
      .and_then(Value::as_i64)
      .ok_or(ProbeError::MissingParameter(key))
  }
}

/// Uniform result of routing a command.
///
/// `success == false` implies `error` is set; `data` is only meaningful on
/// success, except that a failed platform action reports `success=false`
/// with no data at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResult {
  pub success: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub data: Option<Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
  pub timestamp_ms: u64,
}

impl CommandResult {
  /// Successful result, optionally carrying a payload.
  pub(crate) fn ok(data: Option<Value>) -> Self {
    Self {
      success: true,
      data,
      error: None,
      timestamp_ms: now_ms(),
    }
  }

  /// Failed result with a reason.
  pub(crate) fn fail(error: impl Into<String>) -> Self {
    Self {
      success: false,
      data: None,
      error: Some(error.into()),
      timestamp_ms: now_ms(),
    }
  }
}
