//! Config subcommand handlers.

use tswlink_config::{Config, Profile, config_path, render_config, save_config, save_config_to};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;

pub fn handle(args: ConfigArgs, global: &GlobalOpts, mut config: Config) -> Result<(), CliError> {
    let path = global.config.clone().unwrap_or_else(config_path);

    match args.command {
        ConfigCommand::Path => {
            println!("{}", path.display());
            Ok(())
        }

        ConfigCommand::Show => {
            print!("{}", render_config(&config)?);
            Ok(())
        }

        ConfigCommand::Init {
            host,
            name,
            display_name,
            force,
        } => {
            if config.profiles.contains_key(&name) && !force {
                return Err(CliError::Validation {
                    field: "name".into(),
                    reason: format!("profile '{name}' already exists (use --force to replace it)"),
                });
            }

            let profile = Profile {
                host,
                name: display_name,
                entry_id: None,
                poll_interval_secs: None,
                timeout_secs: None,
            };
            // Surface a bad host now rather than on first use.
            tswlink_config::profile_to_panel_config(&profile, &name, &config.defaults)?;

            if config.profiles.is_empty() {
                config.default_profile = Some(name.clone());
            }
            config.profiles.insert(name.clone(), profile);
            match global.config {
                Some(ref custom) => save_config_to(&config, custom)?,
                None => save_config(&config)?,
            }

            eprintln!("saved profile '{name}' to {}", path.display());
            Ok(())
        }
    }
}
