//! Project-specific utilities live here.

use tokio_util::sync::{CancellationToken, DropGuard};

/// Cancellation scope of one inbound request.
///
/// The token fires when the scope is dropped, so a handler future abandoned
/// by a timeout or a disconnected client cancels whatever persistence call it
/// was awaiting.
pub struct RequestScope {
    token: CancellationToken,
    _guard: DropGuard,
}

impl RequestScope {
    pub fn new() -> Self {
        let token = CancellationToken::new();
        let guard = token.clone().drop_guard();
        Self {
            token,
            _guard: guard,
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Default for RequestScope {
    fn default() -> Self {
        Self::new()
    }
}
