use std::sync::{Mutex, PoisonError};

use serde_json::Value;
use tracing::{error, info};

use super::reader::SnapshotReader;
use crate::error::CoreError;
use crate::gateway::WriteOutcome;
use crate::path::ValuePath;
use crate::snapshot::DeviceInfo;

/// What every entity shares: a name, the path it mirrors, and the reader it
/// mirrors it from.
#[derive(Debug, Clone)]
pub struct Binding {
    name: String,
    path: ValuePath,
    unique_id: String,
    reader: SnapshotReader,
}

impl Binding {
    pub fn new(reader: SnapshotReader, name: impl Into<String>, path: ValuePath, entry_id: &str) -> Self {
        let unique_id = format!("{entry_id}_{}", path.segments().join("_"));
        Self {
            name: name.into(),
            path,
            unique_id,
            reader,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &ValuePath {
        &self.path
    }

    /// `{entry_id}_{segments joined by _}`
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// Current value at the bound path, `None` when the path is absent.
    pub fn read(&self) -> Option<Value> {
        self.reader.value(&self.path)
    }

    pub fn available(&self) -> bool {
        self.reader.available()
    }

    pub fn device_info(&self) -> DeviceInfo {
        self.reader.device_info()
    }

    /// Report a finished write under this entity's name.
    pub(crate) fn report(&self, result: &Result<WriteOutcome, CoreError>) {
        match result {
            Ok(WriteOutcome::Accepted(r)) => {
                info!(entity = %self.name, info = ?r.status_info, "property updated");
            }
            Ok(WriteOutcome::Rejected(r)) => error!(
                entity = %self.name,
                property = %r.property,
                status = ?r.status_id,
                info = ?r.status_info,
                "failed to set property"
            ),
            Ok(WriteOutcome::Unmatched { detail }) => {
                error!(entity = %self.name, %detail, "failed to set property");
            }
            Err(e) => error!(entity = %self.name, error = %e, "failed to set property"),
        }
    }
}

/// Locally held value, set ahead of the write that should make it true.
#[derive(Debug, Default)]
pub(crate) struct Optimistic<T>(Mutex<T>);

impl<T: Clone> Optimistic<T> {
    pub(crate) fn new(value: T) -> Self {
        Self(Mutex::new(value))
    }

    pub(crate) fn get(&self) -> T {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub(crate) fn set(&self, value: T) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = value;
    }
}
