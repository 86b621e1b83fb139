use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TOKEN_KEY: &str = "clientops_auth_token";

/// The token store backends. We differentiate them via a "type" tag in the YAML.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(tag = "type")]
pub enum TokenStoreConfig {
    /// Persist the bearer token in a small JSON document on disk.
    #[serde(rename = "file")]
    File(FileStoreConfig),
    /// Keep the token for the lifetime of the process only.
    #[serde(rename = "memory")]
    Memory,
    /// Persistence disabled; every load comes back empty.
    #[serde(rename = "none")]
    Disabled,
}

impl Default for TokenStoreConfig {
    fn default() -> Self {
        TokenStoreConfig::File(FileStoreConfig::default())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct FileStoreConfig {
    pub path: String,
    /// The single key under which the token is kept.
    #[serde(default = "default_key")]
    pub key: String,
}

fn default_key() -> String {
    DEFAULT_TOKEN_KEY.to_string()
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            path: "./.clientops/session.json".to_string(),
            key: default_key(),
        }
    }
}
