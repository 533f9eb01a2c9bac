//! Remote presence port for Booster.
//!
//! Provides the [`PresencePort`] trait, the single capability Booster
//! needs from a remote game-distribution client: "declare this exact set
//! of app ids as active". Connecting, logging in, and persisting the
//! client session all live behind whatever implements the trait.
//!
//! # How it fits in the stack
//!
//! ```text
//! Games Layer (above)     ← GamesService owns the active set and heartbeat
//!     ↕
//! Presence Layer (this crate)  ← declares the set to the remote side
//!     ↕
//! Remote client (external)     ← transport, auth, session persistence
//! ```

mod error;
mod log;

pub use error::{ParseAppIdError, PresenceError};
pub use log::LogPresence;

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

/// A remote application identifier (a Steam app id, for example).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AppId(pub u32);

impl AppId {
    /// Returns the underlying `u32` value.
    pub fn into_inner(self) -> u32 {
        self.0
    }
}

impl From<u32> for AppId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses a plain base-10 app id.
///
/// Only ASCII digits are accepted: no sign, no whitespace, no radix
/// prefix. Values that overflow `u32` are rejected.
impl FromStr for AppId {
    type Err = ParseAppIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // `u32::from_str` tolerates a leading '+', the wire format doesn't.
        if s.starts_with('+') {
            return Err(ParseAppIdError::Signed(s.to_string()));
        }
        s.parse::<u32>()
            .map(Self)
            .map_err(|source| ParseAppIdError::Invalid {
                input: s.to_string(),
                source,
            })
    }
}

/// Declares the set of active app ids to the remote side.
///
/// # Trait bounds
///
/// - `Send + Sync` → the port is shared between the caller's task and
///   the heartbeat task.
/// - `'static` → the port lives as long as the service that owns it.
///
/// The returned future is `Send` so it can be awaited inside
/// `tokio::spawn`ed heartbeat tasks.
///
/// # Example
///
/// ```rust
/// use booster_presence::{AppId, PresenceError, PresencePort};
///
/// /// Pretends every declaration reached the remote side.
/// struct AlwaysOk;
///
/// impl PresencePort for AlwaysOk {
///     async fn declare(&self, app_ids: &[AppId]) -> Result<(), PresenceError> {
///         let _ = app_ids;
///         Ok(())
///     }
/// }
/// ```
pub trait PresencePort: Send + Sync + 'static {
    /// Declares `app_ids` as the complete set of active apps.
    ///
    /// The slice is passed through exactly as given, order included. An
    /// empty slice means "nothing active".
    ///
    /// # Returns
    /// - `Ok(())`: the remote side accepted the declaration
    /// - `Err(PresenceError)`: the declaration did not reach the remote
    ///   side, or was refused
    fn declare(
        &self,
        app_ids: &[AppId],
    ) -> impl Future<Output = Result<(), PresenceError>> + Send;
}

impl<P: PresencePort> PresencePort for Arc<P> {
    fn declare(
        &self,
        app_ids: &[AppId],
    ) -> impl Future<Output = Result<(), PresenceError>> + Send {
        (**self).declare(app_ids)
    }
}
