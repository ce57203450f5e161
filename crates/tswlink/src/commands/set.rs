use std::time::Duration;

use tswlink_core::{CoreError, Entity, EntityKind, Panel, PanelConfig, WriteOutcome};

use crate::cli::SetArgs;
use crate::error::CliError;

pub async fn handle(mut config: PanelConfig, args: SetArgs) -> Result<(), CliError> {
    config.poll_interval = Duration::ZERO;
    let panel = Panel::new(config)?;
    panel.connect().await?;

    let entities = panel.entities()?;
    let entity = find_entity(&entities, &args.entity)?;
    let result = apply(entity, &args.value).await;
    panel.disconnect().await;

    match result? {
        WriteOutcome::Accepted(r) => {
            println!(
                "{}: updated{}",
                entity.name(),
                r.status_info.map(|s| format!(" ({s})")).unwrap_or_default()
            );
            Ok(())
        }
        outcome => Err(CliError::Rejected {
            entity: entity.name().to_owned(),
            detail: outcome.detail().unwrap_or("no status reported").to_owned(),
        }),
    }
}

/// Match by name (case-insensitive) or exact unique id.
fn find_entity<'a>(entities: &'a [Entity], wanted: &str) -> Result<&'a Entity, CliError> {
    entities
        .iter()
        .find(|e| e.name().eq_ignore_ascii_case(wanted) || e.unique_id() == wanted)
        .ok_or_else(|| CliError::UnknownEntity {
            name: wanted.to_owned(),
            available: entities
                .iter()
                .filter(|e| e.kind() != EntityKind::Sensor)
                .map(Entity::name)
                .collect::<Vec<_>>()
                .join(", "),
        })
}

async fn apply(entity: &Entity, raw: &str) -> Result<WriteOutcome, CoreError> {
    let invalid = |reason: &str| CoreError::InvalidValue {
        entity: entity.name().to_owned(),
        reason: reason.to_owned(),
    };

    match entity {
        Entity::Switch(switch) => match parse_switch(raw) {
            Some(true) => switch.turn_on().await,
            Some(false) => switch.turn_off().await,
            None => Err(invalid("expected on or off")),
        },
        Entity::Number(number) => {
            let value: f64 = raw.trim().parse().map_err(|_| invalid("expected a number"))?;
            number.set_native_value(value).await
        }
        Entity::Text(text) => text.set_value(raw).await,
        Entity::Sensor(_) => Err(invalid("sensors are read-only")),
    }
}

fn parse_switch(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Some(true),
        "off" | "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
