// ── Runtime connection configuration ──
//
// These types describe *how* to reach a panel and how often to poll it.
// They never touch disk: tswlink-config (or any other host) constructs a
// `PanelConfig` and hands it in.

use std::time::Duration;

use url::Url;

use crate::error::CoreError;

/// Default period between state polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for one panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    /// Panel root URL (e.g., `http://192.168.1.40`).
    pub base_url: Url,
    /// Display name used for the device registry entry.
    pub name: String,
    /// Stable identifier of this integration instance; prefixes entity ids.
    pub entry_id: String,
    /// How often to refresh the state tree. Zero disables background polling.
    pub poll_interval: Duration,
    /// Request timeout.
    pub timeout: Duration,
}

impl PanelConfig {
    /// Build a config for a bare host name or address (`panel.local`,
    /// `10.0.0.5:8080`) or a full URL. Bare hosts are reached over `http`.
    pub fn for_host(host: &str, name: impl Into<String>) -> Result<Self, CoreError> {
        let host = host.trim();
        if host.is_empty() {
            return Err(CoreError::Config {
                message: "panel host is empty".into(),
            });
        }

        let raw = if host.contains("://") {
            host.to_owned()
        } else {
            format!("http://{host}")
        };
        let base_url = Url::parse(&raw).map_err(|e| CoreError::Config {
            message: format!("invalid panel host '{host}': {e}"),
        })?;
        if base_url.host_str().is_none() {
            return Err(CoreError::Config {
                message: format!("panel host '{host}' has no host component"),
            });
        }

        Ok(Self::new(base_url, name))
    }

    /// Build a config from a URL with default polling and timeout.
    pub fn new(base_url: Url, name: impl Into<String>) -> Self {
        let entry_id = entry_id_for(&base_url);
        Self {
            base_url,
            name: name.into(),
            entry_id,
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Derive a stable entry id from the panel address: `10.0.0.5:8080` becomes
/// `10_0_0_5_8080`.
fn entry_id_for(url: &Url) -> String {
    let mut raw = url.host_str().unwrap_or("panel").to_owned();
    if let Some(port) = url.port() {
        raw.push(':');
        raw.push_str(&port.to_string());
    }
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}
