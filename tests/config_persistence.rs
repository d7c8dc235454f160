//! Config persistence, isolated from the real user config directory.

use serial_test::serial;
use tempfile::TempDir;

use retromon::config::{MonitorConfig, DEFAULT_ADDRESS};

/// Points `HOME`/`XDG_CONFIG_HOME` at a scratch directory for the duration
/// of the closure, restoring the previous values afterward. Serialized
/// (`#[serial]`) because it mutates process-wide environment state.
fn with_isolated_config_dir<T>(f: impl FnOnce() -> T) -> T {
    let dir = TempDir::new().expect("tempdir");
    let prev_home = std::env::var("HOME").ok();
    let prev_xdg = std::env::var("XDG_CONFIG_HOME").ok();

    std::env::set_var("HOME", dir.path());
    std::env::set_var("XDG_CONFIG_HOME", dir.path().join(".config"));

    let result = f();

    match prev_home {
        Some(v) => std::env::set_var("HOME", v),
        None => std::env::remove_var("HOME"),
    }
    match prev_xdg {
        Some(v) => std::env::set_var("XDG_CONFIG_HOME", v),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }

    result
}

#[test]
#[serial]
fn missing_config_file_falls_back_to_defaults() {
    with_isolated_config_dir(|| {
        let config = MonitorConfig::load();
        assert!(!config.enabled);
        assert_eq!(config.address, DEFAULT_ADDRESS);
    });
}

#[test]
#[serial]
fn save_then_load_round_trips() {
    with_isolated_config_dir(|| {
        let config = MonitorConfig {
            enabled: true,
            address: "ip4://0.0.0.0:6502".to_string(),
        };
        config.save().expect("saves");

        let loaded = MonitorConfig::load();
        assert_eq!(loaded, config);
    });
}

#[test]
#[serial]
fn malformed_config_file_falls_back_to_defaults() {
    with_isolated_config_dir(|| {
        let config = MonitorConfig {
            enabled: true,
            address: "ip4://0.0.0.0:6502".to_string(),
        };
        config.save().expect("saves");

        // Corrupt it directly.
        let dirs = directories::BaseDirs::new().unwrap();
        let path = dirs.config_dir().join("retromon").join("monitor.json");
        std::fs::write(&path, b"not json").unwrap();

        let loaded = MonitorConfig::load();
        assert!(!loaded.enabled);
        assert_eq!(loaded.address, DEFAULT_ADDRESS);
    });
}
