//! Clap derive structures for the `tswlink` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// tswlink -- keep a Crestron TSW panel in sync
#[derive(Debug, Parser)]
#[command(
    name = "tswlink",
    version,
    about = "Poll a Crestron TSW touch panel and control its settings",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    /// Defaults to `run`
    #[command(subcommand)]
    pub command: Option<Command>,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "TSWLINK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Panel profile to use
    #[arg(long, short = 'p', env = "TSWLINK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Panel host or URL (bypasses profiles)
    #[arg(long, short = 'H', env = "TSWLINK_HOST", global = true)]
    pub host: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Connect, poll, and log entity changes until interrupted
    Run,

    /// Check that the panel answers and print its identity
    Probe,

    /// Fetch once and print every entity with its state
    Entities,

    /// Change one entity (switch: on/off, number: value, text: string)
    Set(SetArgs),

    /// Inspect or create the config file
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Entity name (e.g. "Brightness") or unique id
    pub entity: String,

    pub value: String,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Print the effective configuration
    Show,

    /// Add a panel profile and save the file
    Init {
        /// Panel host or URL
        host: String,

        /// Profile name
        #[arg(long, default_value = "default")]
        name: String,

        /// Display name for the panel
        #[arg(long)]
        display_name: Option<String>,

        /// Replace an existing profile of the same name
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_is_the_default() {
        let cli = Cli::try_parse_from(["tswlink", "-vv", "--host", "10.0.0.5"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.global.verbose, 2);
        assert_eq!(cli.global.host.as_deref(), Some("10.0.0.5"));
    }

    #[test]
    fn set_takes_entity_and_value() {
        let cli = Cli::try_parse_from(["tswlink", "set", "Brightness", "40", "-p", "lobby"]).unwrap();
        let Some(Command::Set(args)) = cli.command else {
            panic!("expected set");
        };
        assert_eq!(args.entity, "Brightness");
        assert_eq!(args.value, "40");
        assert_eq!(cli.global.profile.as_deref(), Some("lobby"));
    }
}
