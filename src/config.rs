use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Runtime settings, read from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub budget: BudgetConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    File,
    Postgrest,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,
    #[serde(default = "default_items_path")]
    pub items_path: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetConfig {
    #[serde(default = "default_currency")]
    pub default_currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub items_path: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/gift-recommender/config.toml")
    }

    /// Reads the TOML file at `path`, or the default location. A file that does
    /// not exist yet leaves every section at its defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map_or_else(Self::default_path, Path::to_path_buf);
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("cannot read config file {}", path.display()))
            }
        };
        toml::from_str(&data)
            .with_context(|| format!("config file {} is not valid TOML", path.display()))
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(items_path) = overrides.items_path {
            // An explicit items file always means reading from disk.
            self.source.kind = SourceKind::File;
            self.source.items_path = items_path;
        }
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        let dir = path.parent().filter(|dir| !dir.as_os_str().is_empty());
        if let Some(dir) = dir {
            fs::create_dir_all(dir)
                .with_context(|| format!("cannot create config directory {}", dir.display()))?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("cannot write config template {}", path.display()))
    }

    pub fn resolved_items_path(&self) -> PathBuf {
        expand_tilde(&self.source.items_path)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn default_template() -> String {
        let template = r#"[server]
host = "127.0.0.1"
port = 3001

[source]
# "file" reads a JSON array of registry items, "postgrest" queries a hosted database.
kind = "file"
items_path = "~/.local/share/gift-recommender/items.json"
base_url = ""
api_key_env = "GIFT_RECOMMENDER_API_KEY"
timeout_secs = 12

[budget]
default_currency = "USD"

[logging]
filter = "info"
"#;
        template.to_string()
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(relative), Some(home)) => home.join(relative),
        _ => PathBuf::from(path),
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::File,
            items_path: default_items_path(),
            base_url: String::new(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            default_currency: default_currency(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_items_path() -> String {
    "~/.local/share/gift-recommender/items.json".to_string()
}

fn default_api_key_env() -> String {
    "GIFT_RECOMMENDER_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    12
}

fn default_currency() -> String {
    crate::budget::DEFAULT_CURRENCY.to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}
