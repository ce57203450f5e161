#![allow(clippy::unwrap_used)]
// Loading profiles from TOML and the environment.

use std::path::Path;
use std::time::Duration;

use figment::Jail;
use pretty_assertions::assert_eq;

use tswlink_config::{
    Config, ConfigError, Profile, config_path, load_config, load_config_from, profile_to_panel_config,
    save_config, save_config_to,
};

const SAMPLE: &str = r#"
default_profile = "lobby"

[defaults]
poll_interval_secs = 15

[profiles.lobby]
host = "10.0.0.5"
name = "Lobby Panel"

[profiles.boardroom]
host = "http://panel-br.local:8080"
poll_interval_secs = 0
timeout_secs = 4
"#;

#[test]
fn test_loads_profiles_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", SAMPLE)?;
        let cfg = load_config_from(Path::new("config.toml")).unwrap();

        assert_eq!(cfg.default_profile.as_deref(), Some("lobby"));
        assert_eq!(cfg.defaults.poll_interval_secs, 15);
        assert_eq!(cfg.defaults.timeout_secs, 10);
        assert_eq!(cfg.profiles.len(), 2);

        let (name, lobby) = cfg.profile(None).unwrap();
        let panel = profile_to_panel_config(lobby, name, &cfg.defaults).unwrap();
        assert_eq!(panel.name, "Lobby Panel");
        assert_eq!(panel.poll_interval, Duration::from_secs(15));

        let (name, br) = cfg.profile(Some("boardroom")).unwrap();
        let panel = profile_to_panel_config(br, name, &cfg.defaults).unwrap();
        assert_eq!(panel.name, "boardroom");
        assert!(panel.poll_interval.is_zero());
        assert_eq!(panel.timeout, Duration::from_secs(4));
        assert_eq!(panel.base_url.port(), Some(8080));
        Ok(())
    });
}

#[test]
fn test_missing_file_yields_defaults() {
    Jail::expect_with(|_jail| {
        let cfg = load_config_from(Path::new("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        Ok(())
    });
}

#[test]
fn test_environment_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", SAMPLE)?;
        jail.set_env("TSWLINK_DEFAULTS__TIMEOUT_SECS", "3");
        jail.set_env("TSWLINK_PROFILES__LOBBY__HOST", "10.0.0.9");
        jail.set_env("TSWLINK_DEFAULT_PROFILE", "boardroom");

        let cfg = load_config_from(Path::new("config.toml")).unwrap();
        assert_eq!(cfg.defaults.timeout_secs, 3);
        assert_eq!(cfg.profiles["lobby"].host, "10.0.0.9");
        assert_eq!(cfg.profiles["lobby"].name.as_deref(), Some("Lobby Panel"));
        assert_eq!(cfg.default_profile.as_deref(), Some("boardroom"));
        Ok(())
    });
}

#[test]
fn test_invalid_toml_is_an_error() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[profiles.lobby\nhost = 1")?;
        let err = load_config_from(Path::new("config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Figment(_)));
        Ok(())
    });
}

#[test]
fn test_save_then_load() {
    Jail::expect_with(|_jail| {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                host: "192.168.1.40".into(),
                name: Some("Kitchen".into()),
                entry_id: None,
                poll_interval_secs: Some(60),
                timeout_secs: None,
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("192.168.1.40"));

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles, cfg.profiles);
        Ok(())
    });
}

#[test]
fn test_canonical_path_round_trip() {
    Jail::expect_with(|jail| {
        let root = jail.directory().to_path_buf();
        jail.set_env("HOME", root.display());
        jail.set_env("XDG_CONFIG_HOME", root.join(".config").display());

        let path = config_path();
        assert!(path.starts_with(&root), "{} outside the jail", path.display());

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                host: "192.168.1.41".into(),
                name: None,
                entry_id: Some("den".into()),
                poll_interval_secs: None,
                timeout_secs: Some(5),
            },
        );
        save_config(&cfg).unwrap();
        assert!(path.exists());

        let loaded = load_config().unwrap();
        assert_eq!(loaded.profiles, cfg.profiles);
        assert_eq!(loaded.default_profile.as_deref(), Some("default"));
        Ok(())
    });
}
