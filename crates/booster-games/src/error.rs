//! Error types for the games layer.

use booster_presence::PresenceError;

use crate::ServiceState;

/// Errors returned by [`GamesService`](crate::GamesService) operations.
///
/// Malformed or excess app ids are not errors: they are logged and
/// dropped during normalization.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The lifecycle state machine does not allow this operation,
    /// e.g. starting a service twice.
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition {
        from: ServiceState,
        to: ServiceState,
    },

    /// The service has been stopped and no longer accepts updates.
    #[error("games service is stopped")]
    Stopped,

    /// The presence port failed to declare the active set. The set is
    /// still stored and the heartbeat keeps re-asserting it.
    #[error("declare failed: {0}")]
    Declare(#[from] PresenceError),
}
