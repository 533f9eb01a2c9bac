use std::path::PathBuf;

use clap::Parser;

use crate::config::DEFAULT_CONFIG_PATH;

/// Command-line flags. Each one overrides the matching `STEAM_*`
/// environment variable and config file entry.
///
/// Numeric flags left at 0 do not override anything.
#[derive(Parser, Debug)]
#[command(name = "booster", author, version, about, long_about = None)]
pub struct Cli {
    /// Steam account username (overrides STEAM_USERNAME)
    #[arg(long)]
    pub username: Option<String>,

    /// Steam account password (overrides STEAM_PASSWORD)
    #[arg(long)]
    pub password: Option<String>,

    /// Comma-separated Steam app IDs to idle (overrides STEAM_APPIDS)
    #[arg(long)]
    pub appids: Option<String>,

    /// Maximum number of games to idle simultaneously (overrides STEAM_MAX_CONCURRENT)
    #[arg(long, default_value_t = 0)]
    pub max_concurrent: usize,

    /// Directory used to store session/sentry data (overrides STEAM_DATA_DIR)
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// SOCKS5 proxy URL (overrides STEAM_SOCKS5)
    #[arg(long, value_name = "URL")]
    pub socks5: Option<String>,

    /// Heartbeat interval in seconds (overrides STEAM_HEARTBEAT_SEC)
    #[arg(long, value_name = "SECS", default_value_t = 0)]
    pub heartbeat: u64,

    /// Minimum retry backoff in seconds (overrides STEAM_BACKOFF_MIN_SEC)
    #[arg(long, value_name = "SECS", default_value_t = 0)]
    pub backoff_min: u64,

    /// Maximum retry backoff in seconds (overrides STEAM_BACKOFF_MAX_SEC)
    #[arg(long, value_name = "SECS", default_value_t = 0)]
    pub backoff_max: u64,

    /// Log level to use (overrides STEAM_LOG_LEVEL)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Path to configuration file
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Do not persist session data between runs
    #[arg(long)]
    pub no_remember: bool,

    /// Forget any stored session before logging in
    #[arg(long)]
    pub forget_session: bool,
}
