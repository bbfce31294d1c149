//! Screen-scoped request cancellation.

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::order_actor::OrderError;

/// Ties in-flight requests to the lifetime of the screen that issued them.
///
/// Once the scope is closed or dropped, every pending [`ScreenScope::run`]
/// resolves to [`OrderError::Cancelled`] and its result is discarded.
#[derive(Debug)]
pub struct ScreenScope {
    screen: &'static str,
    token: CancellationToken,
}

impl ScreenScope {
    pub fn new(screen: &'static str) -> Self {
        Self {
            screen,
            token: CancellationToken::new(),
        }
    }

    /// Handle the navigation layer can use to close this scope.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn close(&self) {
        debug!(screen = self.screen, "Screen scope closed");
        self.token.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Runs `request` unless the scope closes first.
    pub async fn run<T, F>(&self, request: F) -> Result<T, OrderError>
    where
        F: Future<Output = Result<T, OrderError>>,
    {
        if self.is_closed() {
            return Err(OrderError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => {
                debug!(screen = self.screen, "Request abandoned");
                Err(OrderError::Cancelled)
            }
            result = request => result,
        }
    }
}

impl Drop for ScreenScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
