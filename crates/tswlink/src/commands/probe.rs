use tswlink_core::{Panel, PanelConfig};

use crate::error::CliError;

pub async fn handle(config: &PanelConfig) -> Result<(), CliError> {
    let identity = Panel::probe(config).await?;
    println!("panel:   {}", config.base_url);
    println!("model:   {}", identity.model);
    println!("serial:  {}", identity.serial_number);
    println!("mac:     {}", identity.mac_address);
    Ok(())
}
