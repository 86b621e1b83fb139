use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::api::ApiConfig;
use super::logging::LoggingConfig;
use super::routes::RoutesConfig;
use super::store::TokenStoreConfig;

pub const CONFIG_PATH_VAR: &str = "CLIENTOPS_CONFIG";
pub const ENV_PREFIX: &str = "CLIENTOPS_";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0: backend location, token persistence, routes and logging.
#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct ConfigV1 {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub token_store: TokenStoreConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The YAML file to read: `$CLIENTOPS_CONFIG` if set, else `./config.yaml`.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./config.yaml"))
}

/// Layers the built-in version tag, the YAML file and `CLIENTOPS_*` variables.
/// A missing YAML file is not an error; every section has defaults.
pub fn figment(path: PathBuf) -> Figment {
    Figment::new()
        .merge(Serialized::default("version", "1.0.0"))
        .merge(Yaml::file(path))
        .merge(
            Env::prefixed(ENV_PREFIX)
                .ignore(&["config", "password"])
                .split("__"),
        )
}

/// Extracts a `ConfigV1` from any figment, migrating older versions when they appear.
pub fn extract_config(figment: &Figment) -> Result<ConfigV1, figment::Error> {
    match figment.extract::<Config>()? {
        Config::ConfigV1(c) => Ok(c),
    }
}

/// Load config from the configured YAML file and the environment, exiting on error.
pub fn load_config() -> ConfigV1 {
    match extract_config(&figment(config_path())) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() {
    let schema = schema_for!(Config);
    match serde_json::to_string_pretty(&schema) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error rendering configuration schema: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TOKEN_KEY;

    const TEST_CONFIG: &str = r#"
version: "1.0.0"
api:
  base_url: http://backend.test:9000
token_store:
  type: memory
routes:
  default: /clients
  table:
    - path: /login
      public: true
    - path: /audit-logs
      admin: true
logging:
  level: debug
  format: json
"#;

    fn from_yaml(yaml: &str) -> Result<ConfigV1, figment::Error> {
        let figment = Figment::new()
            .merge(Serialized::default("version", "1.0.0"))
            .merge(Yaml::string(yaml));
        extract_config(&figment)
    }

    #[test]
    fn test_yaml_overrides_defaults() {
        let config = from_yaml(TEST_CONFIG).expect("config should parse");
        assert_eq!(config.api.base_url, "http://backend.test:9000");
        assert_eq!(config.api.timeout_in_ms, 10_000);
        assert_eq!(config.token_store, TokenStoreConfig::Memory);
        assert_eq!(config.routes.login, "/login");
        assert_eq!(config.routes.default, "/clients");
        assert_eq!(config.routes.table.len(), 2);
        assert!(config.routes.table[1].admin);
        assert_eq!(config.logging.format, "json");
    }

    /// An empty document still yields the console's default layout.
    #[test]
    fn test_empty_document_uses_defaults() {
        let config = from_yaml("{}").expect("empty config should parse");
        assert_eq!(config.api.base_url, "http://localhost:8000");
        match config.token_store {
            TokenStoreConfig::File(file) => assert_eq!(file.key, DEFAULT_TOKEN_KEY),
            other => panic!("unexpected store config: {:?}", other),
        }
        let admin_paths: Vec<_> = config
            .routes
            .table
            .iter()
            .filter(|r| r.admin)
            .map(|r| r.path.as_str())
            .collect();
        assert_eq!(admin_paths, vec!["/audit-logs"]);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        assert!(from_yaml("version: \"2.0.0\"\n").is_err());
    }
}
