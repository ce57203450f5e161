mod cli;
mod commands;
mod error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tswlink_config::{Config, ConfigError, config_path, load_config_from, profile_to_panel_config};
use tswlink_core::PanelConfig;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose, cli.global.json_logs);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(&cli.global)?;

    match cli.command.unwrap_or(Command::Run) {
        // Config commands don't need a panel
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global, config),

        cmd => {
            let panel_config = build_panel_config(&cli.global, &config)?;
            tracing::debug!(command = ?cmd, url = %panel_config.base_url, "dispatching command");
            commands::dispatch(cmd, panel_config).await
        }
    }
}

fn load_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let config = match global.config {
        Some(ref path) => load_config_from(path)?,
        None => tswlink_config::load_config()?,
    };
    Ok(config)
}

/// Resolve the panel from `--host`, else from the selected profile.
fn build_panel_config(global: &GlobalOpts, cfg: &Config) -> Result<PanelConfig, CliError> {
    if let Some(ref host) = global.host {
        let profile = tswlink_config::Profile {
            host: host.clone(),
            name: None,
            entry_id: None,
            poll_interval_secs: None,
            timeout_secs: None,
        };
        let name = global.profile.as_deref().unwrap_or(host.as_str());
        return Ok(profile_to_panel_config(&profile, name, &cfg.defaults)?);
    }

    match cfg.profile(global.profile.as_deref()) {
        Ok((name, profile)) => Ok(profile_to_panel_config(profile, name, &cfg.defaults)?),
        // Nothing configured at all: point at the file rather than a profile name.
        Err(ConfigError::UnknownProfile { .. } | ConfigError::NoProfile) if cfg.profiles.is_empty() => {
            Err(CliError::NoConfig {
                path: global
                    .config
                    .clone()
                    .unwrap_or_else(config_path)
                    .display()
                    .to_string(),
            })
        }
        Err(e) => Err(e.into()),
    }
}
