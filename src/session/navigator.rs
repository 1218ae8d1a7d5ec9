//! Navigation side channel used when a session cannot be renewed.

use tokio::sync::mpsc;

/// Route the application should show once the session is gone.
pub const LOGIN_ROUTE: &str = "/login";

/// Receives redirect requests from the [`ApiClient`](super::ApiClient).
///
/// The client calls [`Navigator::redirect`] with [`LOGIN_ROUTE`] after a
/// failed token refresh. Implementations must not block.
pub trait Navigator: Send + Sync {
    fn redirect(&self, route: &str);
}

/// Navigator that only logs the redirect. Suitable for headless callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn redirect(&self, route: &str) {
        tracing::warn!(route, "Session expired; log in again");
    }
}

/// Navigator that forwards redirects over a channel to a UI shell.
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelNavigator {
    /// Create a navigator together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn redirect(&self, route: &str) {
        if self.tx.send(route.to_string()).is_err() {
            tracing::debug!(route, "Redirect dropped: no listener");
        }
    }
}
