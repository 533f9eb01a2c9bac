//! # Booster
//!
//! Keeps a chosen set of games marked as "played" on a remote game
//! service, re-declaring the set on a heartbeat so the remote side does
//! not drop it.
//!
//! The work is split across layers:
//!
//! - [`booster_presence`] — the port that declares active app ids
//! - [`booster_heartbeat`] — heartbeat timing and retry backoff
//! - [`booster_games`] — the service that owns the active set
//!
//! This crate ties them together with configuration loading and the
//! `booster` binary.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use booster::prelude::*;
//!
//! # async fn run() -> Result<(), BoosterError> {
//! let service = GamesService::new(LogPresence::new("me"), ServiceConfig::default());
//! let lifetime = CancellationToken::new();
//! let supervisor = service.start(lifetime.clone()).await?;
//! service.update(&["730", "440"]).await?;
//!
//! lifetime.cancel();
//! let _ = supervisor.await;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
mod error;

pub use error::{BoosterError, ConfigError};

pub mod prelude {
    pub use booster_games::{GamesService, ServiceConfig, ServiceError, ServiceState};
    pub use booster_heartbeat::HeartbeatConfig;
    pub use booster_presence::{AppId, LogPresence, PresenceError, PresencePort};
    pub use tokio_util::sync::CancellationToken;

    pub use crate::config::BoosterConfig;
    pub use crate::{BoosterError, ConfigError};
}
