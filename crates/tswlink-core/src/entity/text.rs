use regex::Regex;
use serde_json::Value;

use super::binding::{Binding, Optimistic};
use crate::error::CoreError;
use crate::gateway::{WriteGateway, WriteOutcome, WriteTarget};

/// Accepted server URL shape. Matched from the start of the input only, so
/// trailing paths and ports are allowed.
pub const URL_PATTERN: &str = r"(https://www\.|http://www\.|https://|http://)?[a-zA-Z0-9]{2,}(\.[a-zA-Z0-9]{2,})(\.[a-zA-Z0-9]{2,})?";

pub const MAX_LENGTH: usize = 255;

/// A free-text property validated against [`URL_PATTERN`].
#[derive(Debug)]
pub struct TextEntity {
    binding: Binding,
    gateway: WriteGateway,
    target: WriteTarget,
    pattern: Regex,
    value: Optimistic<String>,
}

impl TextEntity {
    pub fn new(binding: Binding, gateway: WriteGateway, target: WriteTarget) -> Result<Self, CoreError> {
        let pattern = url_regex().map_err(|e| CoreError::Config {
            message: format!("invalid text pattern: {e}"),
        })?;
        let value = Optimistic::new(read_text(&binding));
        Ok(Self {
            binding,
            gateway,
            target,
            pattern,
            value,
        })
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// Locally held value; empty when the panel has not reported one.
    pub fn value(&self) -> String {
        self.value.get()
    }

    /// Check `value` against the length limit and the URL pattern.
    pub fn validate(&self, value: &str) -> Result<(), CoreError> {
        let length = value.chars().count();
        if length > MAX_LENGTH {
            return Err(self.invalid(format!("{length} characters exceeds the limit of {MAX_LENGTH}")));
        }
        if !self.pattern.is_match(value) {
            return Err(self.invalid(format!("'{value}' is not a valid server URL")));
        }
        Ok(())
    }

    pub async fn set_value(&self, value: &str) -> Result<WriteOutcome, CoreError> {
        self.validate(value)?;
        self.value.set(value.to_owned());
        let result = self
            .gateway
            .write(self.target, self.binding.path(), Value::from(value))
            .await;
        self.binding.report(&result);
        result
    }

    pub fn sync_from_snapshot(&self) {
        self.value.set(read_text(&self.binding));
    }

    fn invalid(&self, reason: String) -> CoreError {
        CoreError::InvalidValue {
            entity: self.binding.name().to_owned(),
            reason,
        }
    }
}

fn url_regex() -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{URL_PATTERN})"))
}

fn read_text(binding: &Binding) -> String {
    match binding.read() {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn url_pattern_accepts_hosts_with_optional_scheme() {
        let re = url_regex().unwrap();
        for ok in [
            "https://ems.example.com",
            "http://www.example.org",
            "example.com",
            "http://192.168.10.50",
            "https://ems.example.com:8443/api",
        ] {
            assert!(re.is_match(ok), "{ok}");
        }
    }

    #[test]
    fn url_pattern_rejects_bare_words_and_leading_junk() {
        let re = url_regex().unwrap();
        for bad in ["", "localhost", "x.y", " https://example.com", "ftp://example.com"] {
            assert!(!re.is_match(bad), "{bad}");
        }
    }
}
