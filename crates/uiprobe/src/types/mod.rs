/*! Core types for the uiprobe system. */

mod command;
mod error;
mod event;
mod node;
mod snapshot;

pub use command::{Command, CommandKind, CommandResult, DEFAULT_COMMAND_TIMEOUT_MS};
pub use error::{ProbeError, ProbeResult};
pub use event::{EventKind, UiEvent};
pub use node::{Bounds, Node, NodeId};
pub use snapshot::{Snapshot, Transition, UiContext};
