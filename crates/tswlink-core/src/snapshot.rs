// ── Published device state ──
//
// A `StateSnapshot` is the unit the coordinator publishes: the filtered tree,
// identity fields derived from it, and the outcome of the latest poll.
// Snapshots are immutable; every publication is a new value.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::filter::{self, EXCLUDED_KEYS};
use crate::path::{self, ValuePath};

pub const DEFAULT_MODEL: &str = "Default Model";
pub const DEFAULT_SERIAL_NUMBER: &str = "Default Serial Number";
pub const DEFAULT_MAC_ADDRESS: &str = "Default MAC Address";

/// Integration domain used in device-registry identifiers.
pub const DOMAIN: &str = "crestron_tsw";
pub const MANUFACTURER: &str = "Crestron";

const MODEL_PATH: [&str; 3] = ["Device", "DeviceInfo", "Model"];
const SERIAL_NUMBER_PATH: [&str; 3] = ["Device", "DeviceInfo", "SerialNumber"];
const MAC_ADDRESS_PATH: [&str; 3] = ["Device", "DeviceInfo", "MacAddress"];

// ── DeviceIdentity ───────────────────────────────────────────────────

/// Identity fields read from `Device.DeviceInfo`, with named defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceIdentity {
    pub model: String,
    pub serial_number: String,
    pub mac_address: String,
}

impl DeviceIdentity {
    /// Resolve each field from `tree`, substituting its default when any
    /// segment of the path is absent.
    pub fn from_tree(tree: &Value) -> Self {
        Self {
            model: text_or(tree, &MODEL_PATH, DEFAULT_MODEL),
            serial_number: text_or(tree, &SERIAL_NUMBER_PATH, DEFAULT_SERIAL_NUMBER),
            mac_address: text_or(tree, &MAC_ADDRESS_PATH, DEFAULT_MAC_ADDRESS),
        }
    }
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            serial_number: DEFAULT_SERIAL_NUMBER.into(),
            mac_address: DEFAULT_MAC_ADDRESS.into(),
        }
    }
}

fn text_or(tree: &Value, path: &[&str], default: &str) -> String {
    match path::get_or(tree, path, Value::from(default)) {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

// ── DeviceInfo ───────────────────────────────────────────────────────

/// Device-registry description of the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub identifiers: Vec<(String, String)>,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    pub connections: Vec<(String, String)>,
}

impl DeviceInfo {
    pub fn new(identity: &DeviceIdentity, name: &str) -> Self {
        Self {
            identifiers: vec![(DOMAIN.into(), identity.serial_number.clone())],
            name: name.into(),
            manufacturer: MANUFACTURER.into(),
            model: identity.model.clone(),
            serial_number: identity.serial_number.clone(),
            connections: vec![("mac".into(), identity.mac_address.clone())],
        }
    }
}

// ── StateSnapshot ────────────────────────────────────────────────────

/// The cached, filtered state of one panel.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSnapshot {
    tree: Arc<Value>,
    identity: DeviceIdentity,
    last_fetch_succeeded: bool,
    fetched_at: Option<DateTime<Utc>>,
}

impl StateSnapshot {
    /// The snapshot a coordinator starts with: empty tree, default identity,
    /// no successful fetch yet.
    pub fn empty() -> Self {
        Self {
            tree: Arc::new(Value::Object(Map::new())),
            identity: DeviceIdentity::default(),
            last_fetch_succeeded: false,
            fetched_at: None,
        }
    }

    /// Build a snapshot from a freshly fetched tree: filter it, then derive
    /// identity from the filtered result.
    pub fn from_fetched(raw: &Value, fetched_at: DateTime<Utc>) -> Self {
        let tree = filter::filter(raw, EXCLUDED_KEYS);
        let identity = DeviceIdentity::from_tree(&tree);
        Self {
            tree: Arc::new(tree),
            identity,
            last_fetch_succeeded: true,
            fetched_at: Some(fetched_at),
        }
    }

    /// Same tree and identity, flagged as coming from a failed poll.
    pub(crate) fn marked_failed(&self) -> Self {
        Self {
            tree: Arc::clone(&self.tree),
            identity: self.identity.clone(),
            last_fetch_succeeded: false,
            fetched_at: self.fetched_at,
        }
    }

    pub fn tree(&self) -> &Value {
        &self.tree
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Outcome of the most recent poll attempt only.
    pub fn last_fetch_succeeded(&self) -> bool {
        self.last_fetch_succeeded
    }

    /// When the tree was fetched; `None` until the first successful poll.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// How long ago the tree was fetched.
    pub fn age(&self) -> Option<chrono::Duration> {
        self.fetched_at.map(|t| Utc::now() - t)
    }

    pub fn get(&self, path: &ValuePath) -> Option<&Value> {
        path.get(&self.tree)
    }
}

impl Default for StateSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn age_is_measured_from_the_fetch() {
        assert!(StateSnapshot::empty().age().is_none());

        let fetched_at = Utc::now() - chrono::Duration::seconds(90);
        let snap = StateSnapshot::from_fetched(&json!({ "Device": {} }), fetched_at);
        let Some(age) = snap.age() else {
            panic!("fetched snapshot has no age");
        };
        assert!(age >= chrono::Duration::seconds(90));

        // A failed poll keeps the original fetch time.
        assert_eq!(snap.marked_failed().fetched_at(), Some(fetched_at));
    }

    #[test]
    fn identity_reads_device_info() {
        let tree = json!({
            "Device": { "DeviceInfo": {
                "Model": "TSW-760", "SerialNumber": "SN1", "MacAddress": "AA:BB"
            }}
        });
        let identity = DeviceIdentity::from_tree(&tree);
        assert_eq!(identity.model, "TSW-760");
        assert_eq!(identity.serial_number, "SN1");
        assert_eq!(identity.mac_address, "AA:BB");
    }

    #[test]
    fn identity_falls_back_per_field() {
        let tree = json!({ "Device": { "DeviceInfo": { "SerialNumber": 1234 } } });
        let identity = DeviceIdentity::from_tree(&tree);
        assert_eq!(identity.model, DEFAULT_MODEL);
        assert_eq!(identity.serial_number, "1234");
        assert_eq!(identity.mac_address, DEFAULT_MAC_ADDRESS);

        assert_eq!(DeviceIdentity::from_tree(&json!([])), DeviceIdentity::default());
    }

    #[test]
    fn fetched_snapshot_is_filtered_and_kept_apart_from_identity() {
        let raw = json!({
            "Device": {
                "DeviceInfo": { "Model": "TSW-1070" },
                "Display": { "CurrentState": "Awake" }
            },
            "CertificateStore": { "secret": 1 }
        });
        let snapshot = StateSnapshot::from_fetched(&raw, Utc::now());

        assert!(snapshot.last_fetch_succeeded());
        assert!(snapshot.tree().get("CertificateStore").is_none());
        assert!(snapshot.tree().get("model").is_none());
        assert_eq!(snapshot.identity().model, "TSW-1070");

        let path: ValuePath = "Device.Display.CurrentState".parse().unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(snapshot.get(&path), Some(&json!("Awake")));
    }

    #[test]
    fn marked_failed_keeps_tree_and_identity() {
        let raw = json!({ "Device": { "DeviceInfo": { "Model": "TSW-760" } } });
        let good = StateSnapshot::from_fetched(&raw, Utc::now());
        let stale = good.marked_failed();

        assert!(!stale.last_fetch_succeeded());
        assert_eq!(stale.tree(), good.tree());
        assert_eq!(stale.identity(), good.identity());
        assert_eq!(stale.fetched_at(), good.fetched_at());
    }

    #[test]
    fn device_info_uses_identity_and_name() {
        let identity = DeviceIdentity {
            model: "TSW-760".into(),
            serial_number: "SN1".into(),
            mac_address: "AA:BB".into(),
        };
        let info = DeviceInfo::new(&identity, "Lobby Panel");
        assert_eq!(info.identifiers, vec![(DOMAIN.to_owned(), "SN1".to_owned())]);
        assert_eq!(info.connections, vec![("mac".to_owned(), "AA:BB".to_owned())]);
        assert_eq!(info.manufacturer, "Crestron");
        assert_eq!(info.name, "Lobby Panel");
    }
}
