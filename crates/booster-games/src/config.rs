//! Service configuration and lifecycle state machine.

use std::fmt;

use booster_heartbeat::HeartbeatConfig;

// ---------------------------------------------------------------------------
// ServiceConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`GamesService`](crate::GamesService).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Most app ids that may be active at once. Extra ids are dropped
    /// from the end of each update.
    pub max_games: usize,

    /// Heartbeat cadence and failure backoff.
    pub heartbeat: HeartbeatConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_games: Self::DEFAULT_MAX_GAMES,
            heartbeat: HeartbeatConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Steam tracks at most this many games per account.
    pub const DEFAULT_MAX_GAMES: usize = 32;

    /// Validates the heartbeat settings.
    ///
    /// Called by [`GamesService::new`](crate::GamesService::new).
    /// `max_games` is used as given: 0 keeps every update empty, and a
    /// value above [`DEFAULT_MAX_GAMES`](Self::DEFAULT_MAX_GAMES) only
    /// logs a warning.
    pub fn validated(mut self) -> Self {
        if self.max_games == 0 {
            tracing::warn!("max_games is 0, no games will be declared");
        } else if self.max_games > Self::DEFAULT_MAX_GAMES {
            tracing::warn!(
                max_games = self.max_games,
                limit = Self::DEFAULT_MAX_GAMES,
                "max_games above the Steam limit, the remote side may ignore extra games"
            );
        }
        self.heartbeat = self.heartbeat.validated();
        self
    }
}

// ---------------------------------------------------------------------------
// ServiceState
// ---------------------------------------------------------------------------

/// The lifecycle state of a [`GamesService`](crate::GamesService).
///
/// ```text
/// Idle ──(start)──→ Running ──(stop)──→ Stopped
///   └─────────────────(stop)──────────────↑
/// ```
///
/// Updates are accepted while `Idle` or `Running`. Once `Stopped`, the
/// service never declares anything again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Idle,
    Running,
    Stopped,
}

impl ServiceState {
    /// Returns `true` if transitioning to `target` is valid.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Idle, Self::Running)
                | (Self::Idle, Self::Stopped)
                | (Self::Running, Self::Stopped)
        )
    }

    /// Returns `true` if updates are still accepted.
    pub fn accepts_updates(self) -> bool {
        !matches!(self, Self::Stopped)
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Running => write!(f, "Running"),
            Self::Stopped => write!(f, "Stopped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_state_transitions() {
        assert!(ServiceState::Idle.can_transition_to(ServiceState::Running));
        assert!(ServiceState::Idle.can_transition_to(ServiceState::Stopped));
        assert!(ServiceState::Running.can_transition_to(ServiceState::Stopped));

        assert!(!ServiceState::Running.can_transition_to(ServiceState::Running));
        assert!(!ServiceState::Running.can_transition_to(ServiceState::Idle));
        assert!(!ServiceState::Stopped.can_transition_to(ServiceState::Running));
        assert!(!ServiceState::Stopped.can_transition_to(ServiceState::Stopped));
    }

    #[test]
    fn test_state_accepts_updates() {
        assert!(ServiceState::Idle.accepts_updates());
        assert!(ServiceState::Running.accepts_updates());
        assert!(!ServiceState::Stopped.accepts_updates());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(ServiceState::Running.to_string(), "Running");
        assert_eq!(ServiceState::Stopped.to_string(), "Stopped");
    }

    #[test]
    fn test_config_default() {
        let config = ServiceConfig::default();
        assert_eq!(config.max_games, 32);
        assert_eq!(config.heartbeat.interval, Duration::from_secs(60));
    }

    #[test]
    fn test_validated_keeps_zero_max_games() {
        let config = ServiceConfig {
            max_games: 0,
            ..Default::default()
        }
        .validated();
        assert_eq!(config.max_games, 0);
    }

    #[test]
    fn test_validated_keeps_max_games_above_default() {
        let config = ServiceConfig {
            max_games: 40,
            ..Default::default()
        }
        .validated();
        assert_eq!(config.max_games, 40);
    }
}
