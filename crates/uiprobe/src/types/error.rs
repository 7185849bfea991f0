/*! Error types for probe operations. */

use super::NodeId;

/// Errors raised while routing commands or touching the live tree.
///
/// None of these escape [`crate::Probe::route`] - the router converts every
/// variant into a failed `CommandResult` at its boundary.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
  /// No foreground window root is available.
  #[error("No active window")]
  NoActiveWindow,

  /// No node in the live tree has the given computed id.
  #[error("Node not found: {0}")]
  NodeNotFound(NodeId),

  /// A required command parameter was absent or of the wrong type.
  #[error("Missing {0} parameter")]
  MissingParameter(&'static str),

  /// The platform action ran and reported failure.
  #[error("Platform action returned false")]
  ActionFailed,

  /// Anything else caught at the router boundary.
  #[error("Unexpected error: {0}")]
  Unexpected(String),
}

impl From<serde_json::Error> for ProbeError {
  fn from(err: serde_json::Error) -> Self {
    Self::Unexpected(err.to_string())
  }
}

/// Result type for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;
