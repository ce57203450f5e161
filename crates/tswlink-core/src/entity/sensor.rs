use serde_json::Value;

use super::binding::Binding;

/// Read-only mirror of one property. Always reads the latest snapshot.
#[derive(Debug)]
pub struct SensorEntity {
    binding: Binding,
}

impl SensorEntity {
    pub fn new(binding: Binding) -> Self {
        Self { binding }
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    pub fn native_value(&self) -> Option<Value> {
        self.binding.read()
    }
}
