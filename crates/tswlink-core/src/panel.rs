// ── Panel handle ──
//
// Lifecycle owner for one configured panel: builds the HTTP client,
// coordinator, and gateway, performs the initial fetch, and runs the
// periodic refresh until disconnected. Everything an entity needs is
// reachable from here, so no process-wide registry is involved.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use tswlink_api::{DeviceClient, TransportConfig};

use crate::config::PanelConfig;
use crate::coordinator::{PollingCoordinator, Refresh};
use crate::entity::{self, Entity, SnapshotReader};
use crate::error::CoreError;
use crate::gateway::WriteGateway;
use crate::snapshot::{DeviceIdentity, StateSnapshot};
use crate::stream::SnapshotStream;

/// A configured TSW panel.
///
/// Cheaply cloneable; clones share the same coordinator and background
/// task.
#[derive(Clone)]
pub struct Panel {
    inner: Arc<PanelInner>,
}

struct PanelInner {
    config: PanelConfig,
    coordinator: Arc<PollingCoordinator>,
    gateway: WriteGateway,
    cancel: CancellationToken,
    /// Token for the current connection; replaced on every `connect`.
    cancel_child: Mutex<CancellationToken>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Panel {
    /// Build a panel from configuration. Does NOT connect; call
    /// [`connect()`](Self::connect) to fetch state and start polling.
    pub fn new(config: PanelConfig) -> Result<Self, CoreError> {
        let client = DeviceClient::new(config.base_url.clone(), &transport_for(&config))?;
        Ok(Self::with_client(config, client))
    }

    /// Build a panel around an existing client.
    pub fn with_client(config: PanelConfig, client: DeviceClient) -> Self {
        let coordinator = Arc::new(PollingCoordinator::new(client.clone()));
        let gateway = WriteGateway::new(client);
        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();

        Self {
            inner: Arc::new(PanelInner {
                config,
                coordinator,
                gateway,
                cancel,
                cancel_child: Mutex::new(cancel_child),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &PanelConfig {
        &self.inner.config
    }

    pub fn coordinator(&self) -> &Arc<PollingCoordinator> {
        &self.inner.coordinator
    }

    pub fn gateway(&self) -> &WriteGateway {
        &self.inner.gateway
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Fetch the initial state and start periodic polling.
    ///
    /// The first fetch must succeed; its error is returned and nothing is
    /// spawned. A zero `poll_interval` skips the background task.
    pub async fn connect(&self) -> Result<(), CoreError> {
        let config = &self.inner.config;

        self.inner.coordinator.refresh().await?;

        let identity = self.inner.coordinator.snapshot().identity().clone();
        info!(
            name = %config.name,
            model = %identity.model,
            serial = %identity.serial_number,
            "connected to panel"
        );

        // At most one refresh task per panel: retire the previous one first.
        let child = self.inner.cancel.child_token();
        let previous = std::mem::replace(&mut *self.inner.cancel_child.lock().await, child.clone());
        previous.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }

        if config.poll_interval.is_zero() {
            debug!("periodic refresh disabled");
            return Ok(());
        }

        let coordinator = Arc::clone(&self.inner.coordinator);
        let period = config.poll_interval;
        handles.push(tokio::spawn(refresh_task(coordinator, period, child)));

        Ok(())
    }

    /// Stop periodic polling and wait for the task to exit. In-flight
    /// writes are not affected.
    pub async fn disconnect(&self) {
        self.inner.cancel_child.lock().await.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!(name = %self.inner.config.name, "disconnected");
    }

    /// One-shot connectivity check: a single GET that must succeed and
    /// parse. Returns the identity the panel reports.
    pub async fn probe(config: &PanelConfig) -> Result<DeviceIdentity, CoreError> {
        let client = DeviceClient::new(config.base_url.clone(), &transport_for(config))?;
        let raw = client.fetch_state().await?;
        Ok(DeviceIdentity::from_tree(&raw))
    }

    // ── State access ─────────────────────────────────────────────

    /// Fetch now instead of waiting for the next tick.
    pub async fn refresh(&self) -> Result<Refresh, CoreError> {
        self.inner.coordinator.refresh().await
    }

    pub fn snapshot(&self) -> Arc<StateSnapshot> {
        self.inner.coordinator.snapshot()
    }

    pub fn subscribe(&self) -> SnapshotStream {
        self.inner.coordinator.subscribe()
    }

    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader::new(Arc::clone(&self.inner.coordinator), self.inner.config.name.as_str())
    }

    /// One adapter per entry of the entity table.
    pub fn entities(&self) -> Result<Vec<Entity>, CoreError> {
        entity::build_entities(&self.reader(), &self.inner.gateway, &self.inner.config.entry_id)
    }
}

impl Drop for PanelInner {
    fn drop(&mut self) {
        // Last clone gone without `disconnect`: stop the refresh task anyway.
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Panel")
            .field("name", &self.inner.config.name)
            .field("base_url", &self.inner.config.base_url.as_str())
            .finish_non_exhaustive()
    }
}

fn transport_for(config: &PanelConfig) -> TransportConfig {
    TransportConfig::default().with_timeout(config.timeout)
}

/// Refresh on a fixed period until cancelled. Failures are logged by the
/// coordinator and do not stop the loop.
async fn refresh_task(coordinator: Arc<PollingCoordinator>, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval.tick().await; // the initial fetch already ran

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                match coordinator.refresh().await {
                    Ok(Refresh::Published) => debug!("periodic refresh complete"),
                    Ok(Refresh::Skipped) => debug!("periodic refresh skipped, fetch in flight"),
                    Err(e) => debug!(error = %e, "periodic refresh failed"),
                }
            }
        }
    }
    debug!("refresh task stopped");
}
