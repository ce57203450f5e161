use std::sync::Arc;

use serde_json::Value;

use crate::coordinator::PollingCoordinator;
use crate::path::ValuePath;
use crate::snapshot::{DeviceIdentity, DeviceInfo, StateSnapshot};

/// Read-only view of the coordinator handed to every entity.
///
/// Entities never own the snapshot; each read goes through the latest
/// published one.
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    coordinator: Arc<PollingCoordinator>,
    device_name: Arc<str>,
}

impl SnapshotReader {
    pub fn new(coordinator: Arc<PollingCoordinator>, device_name: impl Into<Arc<str>>) -> Self {
        Self {
            coordinator,
            device_name: device_name.into(),
        }
    }

    pub fn snapshot(&self) -> Arc<StateSnapshot> {
        self.coordinator.snapshot()
    }

    /// Value at `path` in the latest snapshot.
    pub fn value(&self, path: &ValuePath) -> Option<Value> {
        self.coordinator.snapshot().get(path).cloned()
    }

    /// Entities are available while the latest poll succeeded.
    pub fn available(&self) -> bool {
        self.coordinator.last_fetch_succeeded()
    }

    pub fn identity(&self) -> DeviceIdentity {
        self.coordinator.snapshot().identity().clone()
    }

    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo::new(self.coordinator.snapshot().identity(), &self.device_name)
    }
}
