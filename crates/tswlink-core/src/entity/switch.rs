use serde_json::Value;

use super::binding::{Binding, Optimistic};
use crate::error::CoreError;
use crate::gateway::{WriteGateway, WriteOutcome, WriteTarget};

/// A boolean property exposed as on/off.
///
/// The state shown is the locally held one: commands set it before the
/// write goes out and it is not reverted if the panel refuses. The next
/// [`sync_from_snapshot`](Self::sync_from_snapshot) reconciles it.
#[derive(Debug)]
pub struct SwitchEntity {
    binding: Binding,
    gateway: WriteGateway,
    state: Optimistic<Option<bool>>,
}

impl SwitchEntity {
    pub fn new(binding: Binding, gateway: WriteGateway) -> Self {
        let state = Optimistic::new(binding.read().as_ref().and_then(Value::as_bool));
        Self {
            binding,
            gateway,
            state,
        }
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// `None` until the panel has reported a boolean at the path.
    pub fn is_on(&self) -> Option<bool> {
        self.state.get()
    }

    pub async fn turn_on(&self) -> Result<WriteOutcome, CoreError> {
        self.set(true).await
    }

    pub async fn turn_off(&self) -> Result<WriteOutcome, CoreError> {
        self.set(false).await
    }

    async fn set(&self, on: bool) -> Result<WriteOutcome, CoreError> {
        self.state.set(Some(on));
        let result = self
            .gateway
            .write(WriteTarget::Device, self.binding.path(), Value::Bool(on))
            .await;
        self.binding.report(&result);
        result
    }

    /// Replace the held state with whatever the latest snapshot says.
    pub fn sync_from_snapshot(&self) {
        self.state
            .set(self.binding.read().as_ref().and_then(Value::as_bool));
    }
}
