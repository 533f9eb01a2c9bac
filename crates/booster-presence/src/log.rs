//! A presence port that only logs.

use crate::{AppId, PresenceError, PresencePort};

/// Records each declaration as a `tracing` event and reports success.
///
/// Used when no remote client is wired in, so the service loop can run
/// end to end (dry run).
#[derive(Debug, Clone)]
pub struct LogPresence {
    account: String,
}

impl LogPresence {
    /// Creates a port that labels its events with `account`.
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
        }
    }

    /// The account label attached to every event.
    pub fn account(&self) -> &str {
        &self.account
    }
}

impl PresencePort for LogPresence {
    async fn declare(&self, app_ids: &[AppId]) -> Result<(), PresenceError> {
        if app_ids.is_empty() {
            tracing::info!(account = %self.account, "declaring no active games");
        } else {
            tracing::info!(
                account = %self.account,
                count = app_ids.len(),
                app_ids = ?app_ids,
                "declaring active games"
            );
        }
        Ok(())
    }
}
