use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The static routing configuration consulted on every navigation.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct RoutesConfig {
    /// Path of the login screen.
    #[serde(default = "default_login")]
    pub login: String,
    /// Landing route used after login and for under-privileged users.
    #[serde(default = "default_landing")]
    pub default: String,
    /// Upper bound on redirects followed for a single navigation.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    #[serde(default = "default_table")]
    pub table: Vec<RouteConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct RouteConfig {
    pub path: String,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub admin: bool,
    /// Static redirect applied before any guard runs.
    #[serde(default)]
    pub redirect: Option<String>,
}

impl RouteConfig {
    fn page(path: &str) -> Self {
        Self {
            path: path.to_string(),
            public: false,
            admin: false,
            redirect: None,
        }
    }
}

fn default_login() -> String {
    "/login".to_string()
}

fn default_landing() -> String {
    "/dashboard".to_string()
}

fn default_max_redirects() -> usize {
    8
}

fn default_table() -> Vec<RouteConfig> {
    vec![
        RouteConfig {
            redirect: Some("/dashboard".to_string()),
            ..RouteConfig::page("/")
        },
        RouteConfig {
            public: true,
            ..RouteConfig::page("/login")
        },
        RouteConfig::page("/dashboard"),
        RouteConfig::page("/clients"),
        RouteConfig::page("/leads"),
        RouteConfig::page("/invoices"),
        RouteConfig {
            admin: true,
            ..RouteConfig::page("/audit-logs")
        },
    ]
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            login: default_login(),
            default: default_landing(),
            max_redirects: default_max_redirects(),
            table: default_table(),
        }
    }
}
