//! Command dispatch: bridges CLI args -> panel operations -> stdout.

pub mod config_cmd;
pub mod entities;
pub mod probe;
pub mod run;
pub mod set;

use tswlink_core::PanelConfig;

use crate::cli::Command;
use crate::error::CliError;

/// Dispatch a panel-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, config: PanelConfig) -> Result<(), CliError> {
    match cmd {
        Command::Run => run::handle(config).await,
        Command::Probe => probe::handle(&config).await,
        Command::Entities => entities::handle(config).await,
        Command::Set(args) => set::handle(config, args).await,
        // Config is handled before dispatch
        Command::Config(_) => unreachable!(),
    }
}
