use serde_json::Value;

use super::binding::Binding;
use crate::error::CoreError;
use crate::gateway::{WriteGateway, WriteOutcome, WriteTarget};

/// A bounded numeric property such as brightness or volume.
#[derive(Debug)]
pub struct NumberEntity {
    binding: Binding,
    gateway: WriteGateway,
    min: f64,
    max: f64,
}

impl NumberEntity {
    pub fn new(binding: Binding, gateway: WriteGateway, min: f64, max: f64) -> Self {
        Self {
            binding,
            gateway,
            min,
            max,
        }
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Current value from the latest snapshot. Numeric strings are accepted
    /// and booleans read as `1.0`/`0.0`; anything else reads as `None`.
    pub fn native_value(&self) -> Option<f64> {
        numeric(&self.binding.read()?)
    }

    /// Write `value` to the panel. Values outside `[min, max]` are refused
    /// before any request is made.
    pub async fn set_native_value(&self, value: f64) -> Result<WriteOutcome, CoreError> {
        if !(self.min..=self.max).contains(&value) {
            return Err(CoreError::OutOfRange {
                entity: self.binding.name().to_owned(),
                value,
                min: self.min,
                max: self.max,
            });
        }

        let result = self
            .gateway
            .write(WriteTarget::Device, self.binding.path(), json_number(value))
            .await;
        self.binding.report(&result);
        result
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

// The panel stores these as integers; only send a float when there is a
// fractional part.
#[allow(
    clippy::cast_possible_truncation,
    clippy::as_conversions,
    clippy::float_cmp
)]
fn json_number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}
