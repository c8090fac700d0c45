//! Configuration types and loading
//!
//! Precedence: CLI args > env vars > config file > defaults. The config
//! file is optional; a missing `recruit.toml` in the working directory
//! means defaults, but a path named explicitly must exist.

use std::path::{Path, PathBuf};
use std::time::Duration;

use recruit_auth::constants::{DEFAULT_API_URL, DEFAULT_TIMEOUT};
use recruit_client::{ClientConfig, HeaderInjection};
use recruit_session::{MismatchPolicy, RoleGate};
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "recruit.toml";

/// Root configuration
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Backend connection settings
#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Headers sent with every request
    #[serde(default)]
    pub headers: Vec<HeaderInjection>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            headers: Vec::new(),
        }
    }
}

/// Session persistence and page gating
#[derive(Debug, Deserialize)]
pub struct SessionConfig {
    /// Where tokens are kept between runs. Defaults to
    /// `$HOME/.recruit/tokens.json`.
    #[serde(default)]
    pub token_file: Option<PathBuf>,
    /// Restore the identity from stored tokens at startup
    #[serde(default = "default_true")]
    pub rehydrate: bool,
    #[serde(default)]
    pub on_role_mismatch: MismatchPolicy,
    #[serde(default = "default_true")]
    pub carry_return_path: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_file: None,
            rehydrate: true,
            on_role_mismatch: MismatchPolicy::default(),
            carry_return_path: true,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_true() -> bool {
    true
}

/// Where the config came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub path: PathBuf,
    /// Named by `--config` or `CONFIG_PATH` rather than the default
    pub explicit: bool,
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.finish()
    }

    /// Load from `source`, falling back to defaults when the default file
    /// does not exist.
    pub fn load_from(source: &ConfigSource) -> common::Result<Self> {
        if !source.explicit && !source.path.exists() {
            return Config::default().finish();
        }
        Config::load(&source.path)
    }

    fn finish(mut self) -> common::Result<Self> {
        if let Ok(url) = std::env::var("RECRUIT_API_URL")
            && !url.trim().is_empty()
        {
            self.api.base_url = url.trim().to_string();
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> common::Result<()> {
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(common::Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Resolve config file path from CLI arg or CONFIG_PATH env var.
    pub fn resolve_path(cli_path: Option<&Path>) -> ConfigSource {
        if let Some(p) = cli_path {
            return ConfigSource {
                path: p.to_path_buf(),
                explicit: true,
            };
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return ConfigSource {
                path: PathBuf::from(p),
                explicit: true,
            };
        }
        ConfigSource {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            explicit: false,
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api.base_url.clone(),
            timeout: Duration::from_secs(self.api.timeout_secs),
            default_headers: self.api.headers.clone(),
        }
    }

    pub fn gate(&self) -> RoleGate {
        RoleGate::new(self.session.on_role_mismatch, self.session.carry_return_path)
    }

    /// Token file location with `~/` expanded. `None` when no home
    /// directory is known and none was configured.
    pub fn token_path(&self) -> Option<PathBuf> {
        let home = std::env::var_os("HOME").map(PathBuf::from);
        match &self.session.token_file {
            Some(path) => match (path.strip_prefix("~"), &home) {
                (Ok(rest), Some(home)) => Some(home.join(rest)),
                _ => Some(path.clone()),
            },
            None => home.map(|h| h.join(".recruit").join("tokens.json")),
        }
    }
}
