//! Active game set management for Booster.
//!
//! [`GamesService`] owns the set of app ids currently declared active,
//! pushes every change through a [`PresencePort`](booster_presence::PresencePort),
//! and keeps re-declaring the set on a heartbeat so the remote side does
//! not forget it.
//!
//! # Key types
//!
//! - [`GamesService`] — the single mutation point for the active set
//! - [`ServiceConfig`] — game limit and heartbeat settings
//! - [`ServiceState`] — start/stop lifecycle state machine
//! - [`normalize_app_ids`] — parse, dedupe, and truncate raw input

mod config;
mod error;
mod normalize;
mod service;

pub use config::{ServiceConfig, ServiceState};
pub use error::ServiceError;
pub use normalize::{Normalized, normalize_app_ids};
pub use service::GamesService;
