//! CLI command implementations
//!
//! Each storage command loads the config, opens the file-backed store,
//! runs one operation and returns the response payload. `run_command`
//! writes the payload to stdout.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use crate::backend::FileBackend;
use crate::codec;
use crate::config::StoreConfig;
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::tree::{StorageInterface, TreeStorage};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command. Failures are
/// reported as an error response on stdout and returned to the caller.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    let result = run_command(cli.command);
    if let Err(ref e) = result {
        write_error(e.code_str(), e.message())?;
    }
    result
}

/// Run the appropriate command and print its response
pub fn run_command(cmd: Command) -> CliResult<()> {
    let data = match cmd {
        Command::Init { config, name } => init(&config, &name)?,
        Command::Save {
            config,
            tags,
            value,
        } => save(&config, &tags, &value)?,
        Command::Load { config, tags } => load(&config, &tags)?,
        Command::List { config, tags } => list(&config, &tags)?,
        Command::Latest { config, tags } => latest(&config, &tags)?,
        Command::Exists { config, tags } => exists(&config, &tags)?,
    };
    write_response(data)
}

/// Write a default configuration file
///
/// Refuses to overwrite an existing file.
pub fn init(config_path: &Path, name: &str) -> CliResult<Value> {
    if config_path.exists() {
        return Err(CliError::already_initialized(config_path));
    }

    let config = StoreConfig::new(name);
    config.validate()?;

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CliError::io_error(format!("Failed to create directory {:?}: {}", parent, e))
        })?;
    }
    fs::write(config_path, serde_json::to_string_pretty(&config)?)?;

    Ok(json!({
        "config": config_path.display().to_string(),
        "name": config.name,
    }))
}

/// Save a JSON value at `tags`
pub fn save(config_path: &Path, tags: &[String], value: &str) -> CliResult<Value> {
    let raw: Value = serde_json::from_str(value)
        .map_err(|e| CliError::invalid_value(format!("--value is not valid JSON: {}", e)))?;
    let data = codec::decode(raw).map_err(|e| CliError::invalid_value(e.to_string()))?;

    let store = open_store(config_path)?;
    store.save(&data, tags)?;

    Ok(json!({ "saved": tags }))
}

/// Load the value at `tags`; arrays come back in encoded form
pub fn load(config_path: &Path, tags: &[String]) -> CliResult<Value> {
    let store = open_store(config_path)?;
    let value = store.load(tags)?;
    Ok(codec::encode(&value))
}

pub fn list(config_path: &Path, tags: &[String]) -> CliResult<Value> {
    let store = open_store(config_path)?;
    Ok(json!(store.list_children(tags)?))
}

pub fn latest(config_path: &Path, tags: &[String]) -> CliResult<Value> {
    let store = open_store(config_path)?;
    Ok(json!(store.latest_child(tags)?))
}

pub fn exists(config_path: &Path, tags: &[String]) -> CliResult<Value> {
    let store = open_store(config_path)?;
    Ok(json!(store.tag_exists(tags)?))
}

/// Load config, apply its log level and open the store
fn open_store(config_path: &Path) -> CliResult<TreeStorage<FileBackend>> {
    let config = StoreConfig::load(config_path)?;
    Logger::set_min_severity(config.log_severity());
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("database", config.database_name()),
            ("path", &config_path.display().to_string()),
        ],
    );

    Ok(TreeStorage::open(&config)?)
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use tempfile::TempDir;

    fn create_config(temp_dir: &TempDir) -> std::path::PathBuf {
        let config_path = temp_dir.path().join("pathstore.json");
        let data_dir = temp_dir.path().join("data");

        let config = json!({
            "name": "cli",
            "data_dir": data_dir.to_string_lossy(),
            "sync_writes": false
        });

        fs::write(&config_path, config.to_string()).unwrap();
        config_path
    }

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_init_writes_loadable_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("conf").join("pathstore.json");

        init(&config_path, "lab").unwrap();

        let config = StoreConfig::load(&config_path).unwrap();
        assert_eq!(config.name, "lab");
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);

        let result = init(&config_path, "lab");
        assert_eq!(
            result.unwrap_err().code(),
            &CliErrorCode::AlreadyInitialized
        );
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);

        save(&config_path, &tags(&["cal", "offset"]), "42").unwrap();
        save(&config_path, &tags(&["cal", "gain"]), r#"{"a": [1, 2]}"#).unwrap();

        assert_eq!(load(&config_path, &tags(&["cal", "offset"])).unwrap(), json!(42));
        assert_eq!(
            load(&config_path, &tags(&["cal", "gain"])).unwrap(),
            json!({"a": [1, 2]})
        );

        let mut children: Vec<String> =
            serde_json::from_value(list(&config_path, &tags(&["cal"])).unwrap()).unwrap();
        children.sort();
        assert_eq!(children, vec!["gain", "offset"]);
        assert_eq!(
            latest(&config_path, &tags(&["cal"])).unwrap(),
            json!(["cal", "offset"])
        );
        assert_eq!(exists(&config_path, &tags(&["cal"])).unwrap(), json!(true));
    }

    #[test]
    fn test_save_rejects_bad_json() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);

        let err = save(&config_path, &tags(&["x"]), "{not json").unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::InvalidValue);
    }

    #[test]
    fn test_load_missing_reports_storage_code() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);

        let err = load(&config_path, &tags(&["nothing"])).unwrap_err();
        assert_eq!(err.code_str(), "PATHSTORE_NO_DATA_AT_KEY");
    }

    #[test]
    fn test_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        let err = list(&temp_dir.path().join("absent.json"), &[]).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }
}
