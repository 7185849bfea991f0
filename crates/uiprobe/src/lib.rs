/*!
uiprobe - accessibility-tree observation and command routing.

Observes and manipulates the UI of other running applications, without
screenshots, by walking a platform-exposed tree of surface elements and
issuing typed commands against it. The host environment supplies the live
tree behind [`platform::Platform`]; this crate owns tree extraction, node
lookup, command routing, transition/liveness tracking and listener fan-out.

```ignore
use uiprobe::{Command, CommandKind, Probe};

let probe = Probe::new(platform);

// Raw platform events arrive on the platform's dispatch thread.
probe.on_platform_event(&event);

// Commands may be issued from any thread.
let result = probe.route(&Command::new(CommandKind::GetTreeSnapshot));

// Subscribe to the event bus.
let mut events = probe.subscribe();
while let Ok(event) = events.recv().await {
    // handle event
}
```

What command to issue is the caller's concern - this crate validates,
locates and executes, it does not plan. History is in-memory and
process-scoped.
*/

mod clock;
mod core;
mod events;
mod extract;
mod locate;
mod router;
mod tracker;

pub mod platform;

mod types;
pub use types::*;

pub use crate::core::{Probe, ProbeEvent};
pub use crate::events::ListenerId;
pub use crate::tracker::{TrackerStats, TransitionTracker, HISTORY_CAPACITY, LIVENESS_TIMEOUT_MS};

#[cfg(test)]
mod testutil;
