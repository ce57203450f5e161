// ── Entity adapters ──
//
// Each adapter binds one path of the panel tree to a typed control. All of
// them read through a shared `SnapshotReader`; writable ones also hold a
// `WriteGateway`. The fixed set the panel exposes lives in `ENTITIES`.

mod binding;
mod number;
mod reader;
mod sensor;
mod switch;
mod text;

pub use binding::Binding;
pub use number::NumberEntity;
pub use reader::SnapshotReader;
pub use sensor::SensorEntity;
pub use switch::SwitchEntity;
pub use text::{MAX_LENGTH as TEXT_MAX_LENGTH, TextEntity, URL_PATTERN};

use serde_json::Value;
use strum::{Display, EnumString};

use crate::error::CoreError;
use crate::gateway::{WriteGateway, WriteTarget};
use crate::path::ValuePath;
use crate::snapshot::DeviceInfo;

/// Control type an entity is presented as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum EntityKind {
    Switch,
    Number,
    Sensor,
    Text,
}

/// One row of the entity table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityDescription {
    pub kind: EntityKind,
    pub name: &'static str,
    pub path: &'static [&'static str],
    /// Inclusive bounds, numbers only.
    pub range: Option<(f64, f64)>,
    pub target: WriteTarget,
    pub icon: Option<&'static str>,
}

impl EntityDescription {
    const fn switch(name: &'static str, path: &'static [&'static str]) -> Self {
        Self {
            kind: EntityKind::Switch,
            name,
            path,
            range: None,
            target: WriteTarget::Device,
            icon: None,
        }
    }

    const fn number(name: &'static str, path: &'static [&'static str], min: f64, max: f64) -> Self {
        Self {
            kind: EntityKind::Number,
            name,
            path,
            range: Some((min, max)),
            target: WriteTarget::Device,
            icon: None,
        }
    }
}

/// Everything a TSW panel exposes.
pub static ENTITIES: &[EntityDescription] = &[
    EntityDescription::switch("Camera IsEnabled", &["Device", "Camera", "IsEnabled"]),
    EntityDescription::switch(
        "Auto-Brightness",
        &["Device", "Display", "Lcd", "AutoBrightness", "IsEnabled"],
    ),
    EntityDescription::switch("Enter Standby", &["Device", "DeviceOperations", "EnterStandby"]),
    EntityDescription::switch("Exit Standby", &["Device", "DeviceOperations", "ExitStandby"]),
    EntityDescription::number("Brightness", &["Device", "Display", "Lcd", "Brightness"], 0.0, 100.0),
    EntityDescription::number("Volume", &["Device", "Display", "Audio", "Volume"], 0.0, 100.0),
    EntityDescription {
        kind: EntityKind::Sensor,
        name: "Display Status",
        path: &["Device", "Display", "CurrentState"],
        range: None,
        target: WriteTarget::Device,
        icon: None,
    },
    EntityDescription {
        kind: EntityKind::Text,
        name: "EMS URL",
        path: &["Device", "ThirdPartyApplications", "Ems", "ServerUrl"],
        range: None,
        target: WriteTarget::ThirdPartyApplications,
        icon: Some("mdi:link-variant"),
    },
];

/// A constructed adapter of any kind.
#[derive(Debug)]
pub enum Entity {
    Switch(SwitchEntity),
    Number(NumberEntity),
    Sensor(SensorEntity),
    Text(TextEntity),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Switch(_) => EntityKind::Switch,
            Self::Number(_) => EntityKind::Number,
            Self::Sensor(_) => EntityKind::Sensor,
            Self::Text(_) => EntityKind::Text,
        }
    }

    pub fn binding(&self) -> &Binding {
        match self {
            Self::Switch(e) => e.binding(),
            Self::Number(e) => e.binding(),
            Self::Sensor(e) => e.binding(),
            Self::Text(e) => e.binding(),
        }
    }

    pub fn name(&self) -> &str {
        self.binding().name()
    }

    pub fn unique_id(&self) -> &str {
        self.binding().unique_id()
    }

    pub fn available(&self) -> bool {
        self.binding().available()
    }

    pub fn device_info(&self) -> DeviceInfo {
        self.binding().device_info()
    }

    /// The state as presented: held value for switches and text, live
    /// value for numbers and sensors.
    pub fn state(&self) -> Option<Value> {
        match self {
            Self::Switch(e) => e.is_on().map(Value::Bool),
            Self::Number(e) => e.native_value().map(Value::from),
            Self::Sensor(e) => e.native_value(),
            Self::Text(e) => Some(Value::String(e.value())),
        }
    }

    /// Re-read held values after a snapshot publication.
    pub fn sync_from_snapshot(&self) {
        match self {
            Self::Switch(e) => e.sync_from_snapshot(),
            Self::Text(e) => e.sync_from_snapshot(),
            Self::Number(_) | Self::Sensor(_) => {}
        }
    }

    pub fn as_switch(&self) -> Option<&SwitchEntity> {
        match self {
            Self::Switch(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&NumberEntity> {
        match self {
            Self::Number(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_sensor(&self) -> Option<&SensorEntity> {
        match self {
            Self::Sensor(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextEntity> {
        match self {
            Self::Text(e) => Some(e),
            _ => None,
        }
    }
}

/// Build one adapter per row of [`ENTITIES`].
pub fn build_entities(
    reader: &SnapshotReader,
    gateway: &WriteGateway,
    entry_id: &str,
) -> Result<Vec<Entity>, CoreError> {
    ENTITIES
        .iter()
        .map(|desc| build_entity(desc, reader, gateway, entry_id))
        .collect()
}

pub fn build_entity(
    desc: &EntityDescription,
    reader: &SnapshotReader,
    gateway: &WriteGateway,
    entry_id: &str,
) -> Result<Entity, CoreError> {
    let path = ValuePath::new(desc.path.iter().copied())?;
    let binding = Binding::new(reader.clone(), desc.name, path, entry_id);
    let gateway = gateway.clone();

    Ok(match desc.kind {
        EntityKind::Switch => Entity::Switch(SwitchEntity::new(binding, gateway)),
        EntityKind::Number => {
            let (min, max) = desc.range.unwrap_or((0.0, 100.0));
            Entity::Number(NumberEntity::new(binding, gateway, min, max))
        }
        EntityKind::Sensor => Entity::Sensor(SensorEntity::new(binding)),
        EntityKind::Text => Entity::Text(TextEntity::new(binding, gateway, desc.target)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_paths_are_unique_and_rooted_at_device() {
        let mut seen = std::collections::HashSet::new();
        for desc in ENTITIES {
            assert_eq!(desc.path.first(), Some(&"Device"), "{}", desc.name);
            assert!(seen.insert(desc.path), "duplicate path for {}", desc.name);
        }
        assert_eq!(ENTITIES.len(), 8);
    }

    #[test]
    fn only_numbers_carry_a_range() {
        for desc in ENTITIES {
            assert_eq!(desc.range.is_some(), desc.kind == EntityKind::Number, "{}", desc.name);
        }
    }

    #[test]
    fn ems_url_writes_to_third_party_applications() {
        let ems = ENTITIES.iter().find(|d| d.kind == EntityKind::Text);
        assert!(matches!(
            ems,
            Some(EntityDescription {
                target: WriteTarget::ThirdPartyApplications,
                ..
            })
        ));
    }

    #[test]
    fn kind_names_are_lowercase() {
        assert_eq!(EntityKind::Switch.to_string(), "switch");
        assert_eq!("text".parse::<EntityKind>().ok(), Some(EntityKind::Text));
    }
}
