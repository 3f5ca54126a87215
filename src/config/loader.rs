//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::RedirectorConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Environment variable {name}={value:?} is not a boolean")]
    Env { name: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load the effective configuration: the file when given (defaults
/// otherwise), then process environment overrides, then validation.
pub fn load(path: Option<&Path>) -> Result<RedirectorConfig, ConfigError> {
    load_with_env(path, |name| std::env::var(name).ok())
}

fn load_with_env<F>(path: Option<&Path>, lookup: F) -> Result<RedirectorConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => RedirectorConfig::default(),
    };

    let config = apply_env_overrides(config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply `FORCE_SSL`, `DEBUG`, `APPEND_FROM`, `DONATION_HOST`, `KV_HOST`, `KV_TABLE_PATH`,
/// `BIND_ADDRESS` and `SERVER_HEADER` on top of `config`.
pub fn apply_env_overrides<F>(
    mut config: RedirectorConfig,
    lookup: F,
) -> Result<RedirectorConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("FORCE_SSL") {
        config.force_ssl = parse_bool("FORCE_SSL", value)?;
    }
    if let Some(value) = lookup("DEBUG") {
        config.debug = parse_bool("DEBUG", value)?;
    }
    if let Some(value) = lookup("APPEND_FROM") {
        config.append_from = parse_bool("APPEND_FROM", value)?;
    }
    if let Some(value) = lookup("DONATION_HOST") {
        config.donation_host = Some(value);
    }
    if let Some(value) = lookup("KV_HOST") {
        config.kv_host = Some(value);
    }
    if let Some(value) = lookup("KV_TABLE_PATH") {
        config.kv_table_path = Some(PathBuf::from(value));
    }
    if let Some(value) = lookup("BIND_ADDRESS") {
        config.listener.bind_address = value;
    }
    if let Some(value) = lookup("SERVER_HEADER") {
        config.server_header = value;
    }
    Ok(config)
}

fn parse_bool(name: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim() {
        "True" | "true" | "TRUE" | "1" | "yes" => Ok(true),
        "False" | "false" | "FALSE" | "0" | "no" | "" => Ok(false),
        _ => Err(ConfigError::Env { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let config = apply_env_overrides(
            RedirectorConfig::default(),
            env(&[
                ("FORCE_SSL", "True"),
                ("DEBUG", "false"),
                ("APPEND_FROM", "True"),
                ("DONATION_HOST", "donate.mozilla.org"),
                ("KV_TABLE_PATH", "/etc/redirects.json"),
                ("BIND_ADDRESS", "127.0.0.1:5000"),
            ]),
        )
        .unwrap();

        assert!(config.force_ssl);
        assert!(!config.debug);
        assert!(config.append_from);
        assert_eq!(config.donation_host.as_deref(), Some("donate.mozilla.org"));
        assert_eq!(config.kv_host, None);
        assert_eq!(config.kv_table_path, Some(PathBuf::from("/etc/redirects.json")));
        assert_eq!(config.listener.bind_address, "127.0.0.1:5000");
    }

    #[test]
    fn test_bad_boolean() {
        let err = apply_env_overrides(RedirectorConfig::default(), env(&[("FORCE_SSL", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { name: "FORCE_SSL", .. }));
    }

    #[test]
    fn test_example_config_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("redirector.example.toml");
        let config = load_with_env(Some(path.as_path()), env(&[])).unwrap();
        assert!(config.force_ssl);
        assert_eq!(config.rules.len(), 3);
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("redirector-config-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();

        let good = dir.join("good.toml");
        fs::write(
            &good,
            r#"
            [rules."example.com"]
            target = "https://another-example.com"
            status = "permanent"
            "#,
        )
        .unwrap();
        let config = load_with_env(Some(good.as_path()), env(&[])).unwrap();
        assert_eq!(config.rules.len(), 1);
        assert!(!config.append_from);

        let config = load_with_env(Some(good.as_path()), env(&[("APPEND_FROM", "1")])).unwrap();
        assert!(config.append_from);

        let bad = dir.join("bad.toml");
        fs::write(
            &bad,
            r#"
            [rules."example.com"]
            target = "https://another-example.com/"
            status = "permanent"
            "#,
        )
        .unwrap();
        assert!(matches!(load_with_env(Some(bad.as_path()), env(&[])), Err(ConfigError::Validation(_))));

        let broken = dir.join("broken.toml");
        fs::write(&broken, "rules = [").unwrap();
        assert!(matches!(load_with_env(Some(broken.as_path()), env(&[])), Err(ConfigError::Parse(_))));

        assert!(matches!(
            load_with_env(Some(dir.join("missing.toml").as_path()), env(&[])),
            Err(ConfigError::Io(_))
        ));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_defaults_without_file() {
        let config = load_with_env(None, env(&[("BIND_ADDRESS", "not-an-address")]));
        assert!(matches!(config, Err(ConfigError::Validation(_))));

        let config = load_with_env(None, env(&[])).unwrap();
        assert!(config.rules.is_empty());
    }
}
