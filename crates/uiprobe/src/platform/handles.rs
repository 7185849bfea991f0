/*!
Scoped ownership of borrowed platform node handles.

The platform's resource contract is release-exactly-once per acquisition,
on every exit path. Core code never holds a bare handle: acquisition sites
wrap the handle in a [`HandleGuard`] immediately, and transfer of a
still-open handle to another function is expressed by moving the guard.
*/

use super::NodeHandle;
use std::ops::Deref;

/// RAII wrapper that releases a borrowed platform handle when dropped.
///
/// Moving the guard is the one sanctioned way to hand an open handle to
/// another function (e.g. a located node passed from the locator into an
/// action handler): the receiver now owns the release obligation.
pub struct HandleGuard<H: NodeHandle> {
  handle: H,
}

impl<H: NodeHandle> HandleGuard<H> {
  /// Take ownership of a freshly acquired handle.
  pub fn new(handle: H) -> Self {
    Self { handle }
  }
}

impl<H: NodeHandle> Deref for HandleGuard<H> {
  type Target = H;

  fn deref(&self) -> &H {
    &self.handle
  }
}

impl<H: NodeHandle> Drop for HandleGuard<H> {
  fn drop(&mut self) {
    self.handle.release();
  }
}

impl<H: NodeHandle> std::fmt::Debug for HandleGuard<H> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("HandleGuard").finish_non_exhaustive()
  }
}
