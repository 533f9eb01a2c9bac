//! The games service: the single owner of the active app id set.
//!
//! Every mutation goes through [`GamesService::update`] or
//! [`GamesService::stop`], both of which hold the write half of one
//! `RwLock` while they store the new set *and* declare it. Heartbeat
//! beats hold the read half while re-declaring, so a beat sees either
//! the set before an update or the set after it, never anything in
//! between.
//!
//! # Heartbeat generations
//!
//! Each accepted update starts a new heartbeat generation: the previous
//! generation's task is cancelled and a fresh one is spawned whose first
//! beat is a full interval away. A beat re-checks its cancellation token
//! and generation number after taking the read lock, so a superseded
//! generation never declares.

use std::sync::{Arc, Weak};

use booster_heartbeat::HeartbeatConfig;
use booster_presence::{AppId, PresencePort};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::{ServiceConfig, ServiceError, ServiceState, normalize_app_ids};

/// Handle to a running heartbeat generation.
///
/// Dropping it cancels the generation.
struct HeartbeatWorker {
    generation: u64,
    handle: JoinHandle<()>,
    cancel: DropGuard,
}

/// Everything behind the lock.
struct Inner {
    state: ServiceState,
    app_ids: Vec<AppId>,
    /// Bumped on every accepted update.
    generation: u64,
    worker: Option<HeartbeatWorker>,
}

struct Shared<P> {
    port: P,
    config: ServiceConfig,
    inner: RwLock<Inner>,
}

/// Manages the set of active games and its heartbeat.
///
/// Cheap to clone: clones share the same state.
///
/// ## Lifecycle
///
/// ```text
/// new() ──→ [Idle] ──start()──→ [Running] ──stop()──→ [Stopped]
///              │                    │
///           update()             update()
/// ```
pub struct GamesService<P: PresencePort> {
    shared: Arc<Shared<P>>,
}

impl<P: PresencePort> Clone for GamesService<P> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<P: PresencePort> GamesService<P> {
    /// Creates an idle service with an empty active set.
    pub fn new(port: P, config: ServiceConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                port,
                config: config.validated(),
                inner: RwLock::new(Inner {
                    state: ServiceState::Idle,
                    app_ids: Vec::new(),
                    generation: 0,
                    worker: None,
                }),
            }),
        }
    }

    /// Starts the service and ties it to `lifetime`.
    ///
    /// Spawns a supervisor task that calls [`stop`](Self::stop) once
    /// `lifetime` is cancelled. Await the returned handle to know when
    /// the final empty declaration has been sent.
    ///
    /// # Errors
    /// Returns [`ServiceError::InvalidTransition`] unless the service is
    /// `Idle`.
    pub async fn start(
        &self,
        lifetime: CancellationToken,
    ) -> Result<JoinHandle<()>, ServiceError> {
        {
            let mut inner = self.shared.inner.write().await;
            if !inner.state.can_transition_to(ServiceState::Running) {
                return Err(ServiceError::InvalidTransition {
                    from: inner.state,
                    to: ServiceState::Running,
                });
            }
            inner.state = ServiceState::Running;
        }
        tracing::info!("games service started");

        // Weak, so dropping every handle still stops the heartbeat.
        let shared = Arc::downgrade(&self.shared);
        Ok(tokio::spawn(async move {
            lifetime.cancelled().await;
            let Some(shared) = shared.upgrade() else {
                tracing::debug!("games service dropped before shutdown");
                return;
            };
            if let Err(e) = (GamesService { shared }).stop().await {
                tracing::warn!(error = %e, "final declare failed during shutdown");
            }
        }))
    }

    /// Stops the heartbeat and declares an empty set.
    ///
    /// Calling `stop` on an already stopped service does nothing.
    ///
    /// # Errors
    /// Returns [`ServiceError::Declare`] if the final empty declaration
    /// fails. The stored set is cleared either way.
    pub async fn stop(&self) -> Result<(), ServiceError> {
        let worker = {
            let mut inner = self.shared.inner.write().await;
            if !inner.state.can_transition_to(ServiceState::Stopped) {
                tracing::debug!("games service already stopped");
                return Ok(());
            }
            tracing::info!("stopping games service");
            inner.state = ServiceState::Stopped;
            // Cancel before unlocking so no queued beat can declare.
            inner.worker.take().map(|worker| {
                let HeartbeatWorker {
                    generation,
                    handle,
                    cancel,
                } = worker;
                drop(cancel);
                (generation, handle)
            })
        };

        // The task may be waiting on the read lock, so join it unlocked.
        if let Some((generation, handle)) = worker {
            if let Err(e) = handle.await {
                tracing::error!(generation, error = %e, "heartbeat task failed");
            }
        }

        let mut inner = self.shared.inner.write().await;
        tracing::info!("clearing played games on shutdown");
        inner.app_ids.clear();
        let result = self.shared.port.declare(&inner.app_ids).await;
        tracing::info!("games service stopped");
        result.map_err(ServiceError::from)
    }

    /// Replaces the active set with the normalized form of `raw`.
    ///
    /// `raw` is parsed, deduplicated, and truncated (see
    /// [`normalize_app_ids`]); the result is stored and declared, and the
    /// heartbeat restarts a full interval from now. An empty `raw` clears
    /// the set.
    ///
    /// Returns the accepted set.
    ///
    /// # Errors
    /// - [`ServiceError::Stopped`]: the service was stopped; nothing changes
    /// - [`ServiceError::Declare`]: the port failed; the set is still
    ///   stored and the heartbeat keeps retrying it
    pub async fn update<S: AsRef<str>>(
        &self,
        raw: &[S],
    ) -> Result<Vec<AppId>, ServiceError> {
        let mut inner = self.shared.inner.write().await;
        if !inner.state.accepts_updates() {
            return Err(ServiceError::Stopped);
        }

        let normalized = normalize_app_ids(raw, self.shared.config.max_games);

        inner.app_ids = normalized.app_ids;
        tracing::info!(
            count = inner.app_ids.len(),
            app_ids = ?inner.app_ids,
            rejected = normalized.rejected.len(),
            "updated app ids"
        );

        let declared = self.shared.port.declare(&inner.app_ids).await;
        self.reset_heartbeat(&mut inner);

        match declared {
            Ok(()) => Ok(inner.app_ids.clone()),
            Err(e) => {
                tracing::warn!(error = %e, "declare failed, heartbeat will retry");
                Err(e.into())
            }
        }
    }

    /// Snapshot of the active set.
    pub async fn active_app_ids(&self) -> Vec<AppId> {
        self.shared.inner.read().await.app_ids.clone()
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> ServiceState {
        self.shared.inner.read().await.state
    }

    /// Current heartbeat generation (0 before the first update).
    pub async fn generation(&self) -> u64 {
        self.shared.inner.read().await.generation
    }

    /// The validated configuration in use.
    pub fn config(&self) -> &ServiceConfig {
        &self.shared.config
    }

    /// Cancels the current generation and spawns the next one.
    ///
    /// Must be called with the write lock held.
    fn reset_heartbeat(&self, inner: &mut Inner) {
        if let Some(prev) = inner.worker.take() {
            tracing::debug!(generation = prev.generation, "heartbeat superseded");
        }

        inner.generation += 1;
        let generation = inner.generation;
        let heartbeat = &self.shared.config.heartbeat;
        if heartbeat.is_disabled() {
            tracing::debug!(generation, "heartbeat disabled");
            return;
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_heartbeat(
            Arc::downgrade(&self.shared),
            heartbeat.clone(),
            generation,
            cancel.clone(),
        ));
        inner.worker = Some(HeartbeatWorker {
            generation,
            handle,
            cancel: cancel.drop_guard(),
        });
    }
}

/// Heartbeat loop for one generation.
///
/// Holds only a weak reference so a dropped service does not keep its
/// heartbeat alive.
async fn run_heartbeat<P: PresencePort>(
    shared: Weak<Shared<P>>,
    config: HeartbeatConfig,
    generation: u64,
    cancel: CancellationToken,
) {
    let mut scheduler = config.scheduler();
    let mut backoff = config.backoff();
    tracing::debug!(generation, "heartbeat started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            info = scheduler.wait_for_beat() => {
                let Some(shared) = shared.upgrade() else {
                    break;
                };
                let inner = shared.inner.read().await;
                if cancel.is_cancelled()
                    || inner.generation != generation
                    || inner.state == ServiceState::Stopped
                {
                    break;
                }
                if info.beats_skipped > 0 {
                    tracing::warn!(
                        generation,
                        beat = info.beat,
                        skipped = info.beats_skipped,
                        "heartbeat woke up late, skipped beats"
                    );
                }

                tracing::debug!(
                    generation,
                    beat = info.beat,
                    count = inner.app_ids.len(),
                    "sending heartbeat"
                );
                match shared.port.declare(&inner.app_ids).await {
                    Ok(()) => {
                        if backoff.attempts() > 0 {
                            tracing::info!(
                                generation,
                                failures = backoff.attempts(),
                                "heartbeat recovered"
                            );
                        }
                        backoff.reset();
                    }
                    Err(e) => {
                        let delay = backoff.next_delay();
                        tracing::warn!(
                            generation,
                            error = %e,
                            retry_in_ms = delay.as_millis() as u64,
                            "heartbeat declare failed"
                        );
                        scheduler.retry_after(delay);
                    }
                }
            }
        }
    }

    tracing::debug!(generation, "heartbeat stopped");
}
