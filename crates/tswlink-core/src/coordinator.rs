// ── Polling coordinator ──
//
// Owns the authoritative snapshot of panel state. Each refresh fetches the
// full tree, filters it, derives identity, and publishes a new snapshot with
// a single pointer swap. Readers never block and never see a partial update.

use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::Utc;
use tokio::sync::{Mutex, watch};
use tracing::{debug, warn};

use tswlink_api::DeviceClient;

use crate::error::CoreError;
use crate::snapshot::StateSnapshot;
use crate::stream::SnapshotStream;

/// Whether a fetch is currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    Fetching,
}

/// What a call to [`PollingCoordinator::refresh`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// A new snapshot was fetched and published.
    Published,
    /// Another fetch was already in flight; this request was dropped.
    Skipped,
}

/// Fetches, filters, and publishes panel state.
pub struct PollingCoordinator {
    client: DeviceClient,
    current: ArcSwap<StateSnapshot>,
    updates: watch::Sender<Arc<StateSnapshot>>,
    fetch_guard: Mutex<()>,
}

impl PollingCoordinator {
    /// Create a coordinator holding the empty snapshot. Nothing is fetched
    /// until [`refresh`](Self::refresh) is called.
    pub fn new(client: DeviceClient) -> Self {
        let initial = Arc::new(StateSnapshot::empty());
        let (updates, _) = watch::channel(Arc::clone(&initial));
        Self {
            client,
            current: ArcSwap::new(initial),
            updates,
            fetch_guard: Mutex::new(()),
        }
    }

    /// Fetch the panel state once.
    ///
    /// On failure the previous tree and identity stay published, flagged
    /// with `last_fetch_succeeded == false`, and the error is returned. A
    /// call made while another fetch is in flight returns
    /// [`Refresh::Skipped`] without touching the network.
    pub async fn refresh(&self) -> Result<Refresh, CoreError> {
        let Ok(_fetching) = self.fetch_guard.try_lock() else {
            debug!("refresh already in flight, dropping request");
            return Ok(Refresh::Skipped);
        };

        match self.client.fetch_state().await {
            Ok(raw) => {
                let snapshot = StateSnapshot::from_fetched(&raw, Utc::now());
                debug!(
                    model = %snapshot.identity().model,
                    serial = %snapshot.identity().serial_number,
                    "device state refreshed"
                );
                self.publish(snapshot);
                Ok(Refresh::Published)
            }
            Err(err) => {
                let err = CoreError::from(err);
                warn!(
                    url = %self.client.base_url(),
                    error = %err,
                    "failed to fetch device state, keeping previous snapshot"
                );
                let stale = self.current.load().marked_failed();
                self.publish(stale);
                Err(err)
            }
        }
    }

    fn publish(&self, snapshot: StateSnapshot) {
        let snapshot = Arc::new(snapshot);
        self.current.store(Arc::clone(&snapshot));
        // `send_replace` updates unconditionally, even with zero receivers.
        self.updates.send_replace(snapshot);
    }

    /// The latest published snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<StateSnapshot> {
        self.current.load_full()
    }

    /// Outcome of the most recent poll attempt.
    pub fn last_fetch_succeeded(&self) -> bool {
        self.current.load().last_fetch_succeeded()
    }

    pub fn state(&self) -> CoordinatorState {
        if self.fetch_guard.try_lock().is_ok() {
            CoordinatorState::Idle
        } else {
            CoordinatorState::Fetching
        }
    }

    /// Subscribe to snapshot publications.
    pub fn subscribe(&self) -> SnapshotStream {
        SnapshotStream::new(self.updates.subscribe())
    }

    pub fn client(&self) -> &DeviceClient {
        &self.client
    }
}

impl std::fmt::Debug for PollingCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollingCoordinator")
            .field("base_url", &self.client.base_url().as_str())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
