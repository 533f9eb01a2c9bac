//! Layered configuration: defaults, YAML file, `STEAM_*` environment
//! variables, then command-line flags, each overriding the one before.
//!
//! ```yaml
//! username: alice
//! app_ids: [730, 440, 570]
//! max_concurrent: 32
//! heartbeat_secs: 60
//! backoff_min_secs: 5
//! backoff_max_secs: 300
//! log_level: info
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use booster_games::ServiceConfig;
use booster_heartbeat::HeartbeatConfig;
use serde::{Deserialize, Deserializer};

use crate::ConfigError;
use crate::cli::Cli;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "./config.yaml";

/// Everything the binary needs to run.
///
/// The account fields (`username`, `password`, `data_dir`, `socks5`,
/// `remember_session`, `forget_session`) are handed to the remote client
/// untouched; Booster itself only uses the game and heartbeat settings.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BoosterConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Raw app ids. Validation happens in the games service.
    #[serde(deserialize_with = "deserialize_app_ids")]
    pub app_ids: Vec<String>,
    pub max_concurrent: usize,
    pub data_dir: PathBuf,
    pub socks5: Option<String>,
    /// 0 disables the heartbeat.
    pub heartbeat_secs: u64,
    pub backoff_min_secs: u64,
    pub backoff_max_secs: u64,
    pub log_level: Option<String>,
    pub remember_session: bool,
    pub forget_session: bool,
}

impl Default for BoosterConfig {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            app_ids: Vec::new(),
            max_concurrent: ServiceConfig::DEFAULT_MAX_GAMES,
            data_dir: PathBuf::from("./data"),
            socks5: None,
            heartbeat_secs: 60,
            backoff_min_secs: 5,
            backoff_max_secs: 300,
            log_level: None,
            remember_session: true,
            forget_session: false,
        }
    }
}

// Hand-written so the password never ends up in a log line.
impl fmt::Debug for BoosterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoosterConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("app_ids", &self.app_ids)
            .field("max_concurrent", &self.max_concurrent)
            .field("data_dir", &self.data_dir)
            .field("socks5", &self.socks5)
            .field("heartbeat_secs", &self.heartbeat_secs)
            .field("backoff_min_secs", &self.backoff_min_secs)
            .field("backoff_max_secs", &self.backoff_max_secs)
            .field("log_level", &self.log_level)
            .field("remember_session", &self.remember_session)
            .field("forget_session", &self.forget_session)
            .finish()
    }
}

impl BoosterConfig {
    /// Builds the full config for `cli`, reading the process environment.
    pub fn from_sources(cli: &Cli) -> Result<Self, ConfigError> {
        Self::from_sources_with(cli, |key| std::env::var(key).ok())
    }

    /// Like [`from_sources`](Self::from_sources) with a custom
    /// environment lookup.
    pub fn from_sources_with(
        cli: &Cli,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let optional = cli.config == Path::new(DEFAULT_CONFIG_PATH);
        let mut config = Self::load(&cli.config, optional)?;
        config.apply_env(env)?;
        config.apply_cli(cli);
        Ok(config)
    }

    /// Reads a YAML config file. With `optional`, a missing file yields
    /// the defaults.
    pub fn load(path: &Path, optional: bool) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if optional && e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::from_yaml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses a YAML document. An empty document yields the defaults.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yml::from_str(text)
    }

    /// Applies `STEAM_*` overrides. Unset or empty variables are ignored.
    pub fn apply_env(
        &mut self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let get = |key: &str| env(key).filter(|v| !v.is_empty());

        if let Some(v) = get("STEAM_USERNAME") {
            self.username = Some(v);
        }
        if let Some(v) = get("STEAM_PASSWORD") {
            self.password = Some(v);
        }
        if let Some(v) = get("STEAM_APPIDS") {
            self.app_ids = split_app_ids(&v);
        }
        if let Some(v) = get("STEAM_MAX_CONCURRENT") {
            self.max_concurrent = parse_env("STEAM_MAX_CONCURRENT", v)?;
        }
        if let Some(v) = get("STEAM_DATA_DIR") {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = get("STEAM_SOCKS5") {
            self.socks5 = Some(v);
        }
        if let Some(v) = get("STEAM_HEARTBEAT_SEC") {
            self.heartbeat_secs = parse_env("STEAM_HEARTBEAT_SEC", v)?;
        }
        if let Some(v) = get("STEAM_BACKOFF_MIN_SEC") {
            self.backoff_min_secs = parse_env("STEAM_BACKOFF_MIN_SEC", v)?;
        }
        if let Some(v) = get("STEAM_BACKOFF_MAX_SEC") {
            self.backoff_max_secs = parse_env("STEAM_BACKOFF_MAX_SEC", v)?;
        }
        if let Some(v) = get("STEAM_LOG_LEVEL") {
            self.log_level = Some(v);
        }
        Ok(())
    }

    /// Applies command-line overrides.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(v) = &cli.username {
            self.username = Some(v.clone());
        }
        if let Some(v) = &cli.password {
            self.password = Some(v.clone());
        }
        if let Some(v) = &cli.appids {
            self.app_ids = split_app_ids(v);
        }
        if cli.max_concurrent > 0 {
            self.max_concurrent = cli.max_concurrent;
        }
        if let Some(v) = &cli.data_dir {
            self.data_dir = v.clone();
        }
        if let Some(v) = &cli.socks5 {
            self.socks5 = Some(v.clone());
        }
        if cli.heartbeat > 0 {
            self.heartbeat_secs = cli.heartbeat;
        }
        if cli.backoff_min > 0 {
            self.backoff_min_secs = cli.backoff_min;
        }
        if cli.backoff_max > 0 {
            self.backoff_max_secs = cli.backoff_max;
        }
        if let Some(v) = &cli.log_level {
            self.log_level = Some(v.clone());
        }
        if cli.no_remember {
            self.remember_session = false;
        }
        if cli.forget_session {
            self.forget_session = true;
        }
    }

    /// The games service settings.
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            max_games: self.max_concurrent,
            heartbeat: HeartbeatConfig {
                interval: Duration::from_secs(self.heartbeat_secs),
                backoff_min: Duration::from_secs(self.backoff_min_secs),
                backoff_max: Duration::from_secs(self.backoff_max_secs),
                backoff_jitter: true,
            },
        }
    }

    /// Filter directive for the log subscriber.
    pub fn log_filter(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    /// Label used for the account in log lines.
    pub fn account_label(&self) -> &str {
        self.username.as_deref().unwrap_or("anonymous")
    }
}

/// Splits a comma-separated id list, trimming blanks.
pub fn split_app_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_env<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    let parsed = value.trim().parse();
    parsed.map_err(|_| ConfigError::InvalidEnv { key, value })
}

/// Accepts app ids written as YAML numbers, strings, or anything else.
///
/// Every entry is kept as text so a bad one is rejected on its own by
/// the games service instead of failing the whole file.
fn deserialize_app_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_yml::Value;

    let raw = Vec::<Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|id| match id {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => format!("{other:?}"),
        })
        .collect())
}
