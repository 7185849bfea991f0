/*!
Platform abstraction.

The host environment supplies the live accessibility surface behind these
traits; core code never touches platform-specific types directly. Handles
obtained from the platform are borrowed, reference-counted resources and are
wrapped in [`HandleGuard`] immediately so they are released exactly once on
every exit path.
*/

mod handles;
mod traits;

pub mod actions;

pub use handles::HandleGuard;
pub use traits::{ActionArgs, NodeHandle, Platform};

/// Optional attribute tiers advertised by the platform.
///
/// Resolved once at probe construction from [`Platform::feature_level`];
/// extraction code branches on these flags, never on raw level numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
  /// Extended state attributes (checkable, checked, scrollable, editable).
  pub extended_attributes: bool,
  /// Structured extras map, reported only on the newest tier.
  pub extras: bool,
}

impl Capabilities {
  /// Feature level at which extended state attributes become available.
  pub const EXTENDED_LEVEL: u32 = 2;
  /// Feature level at which the structured extras map becomes available.
  pub const EXTRAS_LEVEL: u32 = 3;

  /// Resolve the capability set for an advertised feature level.
  pub const fn from_feature_level(level: u32) -> Self {
    Self {
      extended_attributes: level >= Self::EXTENDED_LEVEL,
      extras: level >= Self::EXTRAS_LEVEL,
    }
  }
}
