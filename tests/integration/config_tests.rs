use clap::Parser;
use dupsweep::cli::Cli;
use dupsweep::config::{Config, ConfigError};
use std::fs;
use std::sync::Mutex;
use tempfile::tempdir;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Clear all DUPSWEEP_* environment variables to avoid interference.
fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("DUPSWEEP_") {
            std::env::remove_var(key);
        }
    }
}

#[test]
fn test_config_missing_file_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();

    let config = Config::load_from_path(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_load_from_toml() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
prefix_bytes = 4096
chunk_size = 65536
skip_hidden = true
trash = true
"#,
    )
    .unwrap();

    let config = Config::load(Some(&path)).unwrap();

    assert_eq!(config.prefix_bytes, 4096);
    assert_eq!(config.chunk_size, 65536);
    assert!(config.skip_hidden);
    assert!(!config.skip_empty);
    assert!(config.trash);
}

#[test]
fn test_config_env_overrides_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "prefix_bytes = 4096\n").unwrap();

    std::env::set_var("DUPSWEEP_PREFIX_BYTES", "1024");
    std::env::set_var("DUPSWEEP_SKIP_EMPTY", "true");
    let config = Config::load_from_path(&path);
    clear_env();

    let config = config.unwrap();
    assert_eq!(config.prefix_bytes, 1024);
    assert!(config.skip_empty);
}

#[test]
fn test_cli_overrides_env() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();

    std::env::set_var("DUPSWEEP_PREFIX_BYTES", "1024");
    let config = Config::load_from_path(&dir.path().join("absent.toml"));
    clear_env();

    let mut config = config.unwrap();
    let cli = Cli::try_parse_from(["dupsweep", "--prefix-bytes", "64", "/data"]).unwrap();
    config.apply_cli(&cli);
    assert_eq!(config.prefix_bytes, 64);
}

#[test]
fn test_config_rejects_zero_values() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "chunk_size = 0\n").unwrap();

    let result = Config::load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::Zero("chunk_size"))));
}

#[test]
fn test_config_rejects_wrong_type() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "prefix_bytes = \"lots\"\n").unwrap();

    let result = Config::load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}
