//! Error types for the presence layer.

use std::num::ParseIntError;

/// Errors a [`PresencePort`](crate::PresencePort) can report.
#[derive(Debug, thiserror::Error)]
pub enum PresenceError {
    /// The remote client has no live connection to declare on.
    #[error("remote client is not connected")]
    NotConnected,

    /// The remote side refused the declaration.
    #[error("declaration rejected: {0}")]
    Rejected(String),

    /// The declaration failed in the transport below the client.
    #[error("transport failure: {0}")]
    Transport(String),
}

/// A raw string could not be turned into an [`AppId`](crate::AppId).
#[derive(Debug, thiserror::Error)]
pub enum ParseAppIdError {
    /// Not a base-10 `u32`.
    #[error("invalid app id {input:?}: {source}")]
    Invalid {
        input: String,
        #[source]
        source: ParseIntError,
    },

    /// An explicit sign prefix.
    #[error("invalid app id {0:?}: sign prefix not allowed")]
    Signed(String),
}
