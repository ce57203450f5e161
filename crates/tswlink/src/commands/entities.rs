use serde_json::Value;

use tswlink_core::{Entity, Panel, PanelConfig};

use crate::error::CliError;

pub async fn handle(mut config: PanelConfig) -> Result<(), CliError> {
    config.poll_interval = std::time::Duration::ZERO;
    let panel = Panel::new(config)?;
    panel.connect().await?;

    let entities = panel.entities()?;
    let width = entities.iter().map(|e| e.name().len()).max().unwrap_or(0);
    for entity in &entities {
        println!(
            "{:<7} {:<width$}  {:<24}  {}",
            entity.kind().to_string(),
            entity.name(),
            format_state(entity),
            entity.unique_id(),
        );
    }

    panel.disconnect().await;
    Ok(())
}

/// Render an entity's state for display; `unknown` when absent.
pub(crate) fn format_state(entity: &Entity) -> String {
    match entity.state() {
        None | Some(Value::Null) => "unknown".into(),
        Some(Value::Bool(true)) => "on".into(),
        Some(Value::Bool(false)) => "off".into(),
        Some(Value::String(s)) if s.is_empty() => "(empty)".into(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    }
}
