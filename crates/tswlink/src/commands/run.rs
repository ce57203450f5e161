use std::collections::HashMap;

use tracing::{info, warn};

use tswlink_core::{Panel, PanelConfig};

use super::entities::format_state;
use crate::error::CliError;

/// Connect, then mirror every snapshot into the entities and log what
/// changed until Ctrl-C.
pub async fn handle(config: PanelConfig) -> Result<(), CliError> {
    let panel = Panel::new(config)?;
    panel.connect().await?;

    let entities = panel.entities()?;
    let mut updates = panel.subscribe();
    let mut last: HashMap<String, String> = HashMap::new();
    let mut was_available = true;

    for entity in &entities {
        let state = format_state(entity);
        info!(entity = entity.name(), %state, "initial state");
        last.insert(entity.unique_id().to_owned(), state);
    }

    loop {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                res?;
                info!("interrupt received, shutting down");
                break;
            }
            snap = updates.changed() => {
                let Some(snap) = snap else { break };
                for entity in &entities {
                    entity.sync_from_snapshot();
                }

                if !snap.last_fetch_succeeded() {
                    if was_available {
                        let stale_secs = snap.age().map(|age| age.num_seconds());
                        warn!(?stale_secs, "panel unreachable, entities unavailable");
                    }
                    was_available = false;
                    continue;
                }
                if !was_available {
                    info!("panel reachable again");
                    was_available = true;
                }

                for entity in &entities {
                    let state = format_state(entity);
                    if last.get(entity.unique_id()) != Some(&state) {
                        info!(entity = entity.name(), %state, "state changed");
                        last.insert(entity.unique_id().to_owned(), state);
                    }
                }
            }
        }
    }

    panel.disconnect().await;
    Ok(())
}
