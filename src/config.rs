use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Application-level constants
pub const APP_NAME: &str = "Symptrack";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const ENV_DATABASE_PATH: &str = "SYMPTRACK_DATABASE_PATH";
pub const ENV_BIND_ADDR: &str = "SYMPTRACK_BIND_ADDR";
pub const ENV_WINDOW_DAYS: &str = "SYMPTRACK_WINDOW_DAYS";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";
pub const DEFAULT_WINDOW_DAYS: u32 = 30;
pub const MAX_WINDOW_DAYS: u32 = 365;

/// Get the application data directory
/// ~/Symptrack/ on all platforms; falls back to the working directory when
/// no home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

pub fn default_database_path() -> PathBuf {
    app_data_dir().join("tracker.db")
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "symptrack=info,tower_http=info"
}

/// Process configuration, resolved once at start-up.
///
/// Each setting has exactly one environment key. Resolution order:
/// environment variable, then built-in default. A value that does not parse
/// falls back to the default with a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub default_window_days: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            bind_addr: default_bind_addr(),
            default_window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8787))
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup` (environment in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_path = value(ENV_DATABASE_PATH)
            .map(PathBuf::from)
            .unwrap_or(defaults.database_path);

        let bind_addr = match value(ENV_BIND_ADDR) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(key = ENV_BIND_ADDR, value = %raw, "Invalid bind address, using default");
                defaults.bind_addr
            }),
            None => defaults.bind_addr,
        };

        let default_window_days = match value(ENV_WINDOW_DAYS) {
            Some(raw) => match raw.parse::<u32>() {
                Ok(days) if (1..=MAX_WINDOW_DAYS).contains(&days) => days,
                _ => {
                    tracing::warn!(key = ENV_WINDOW_DAYS, value = %raw, "Invalid window, using default");
                    defaults.default_window_days
                }
            },
            None => defaults.default_window_days,
        };

        Self {
            database_path,
            bind_addr,
            default_window_days,
        }
    }
}

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// The process-wide configuration. Resolved from the environment on first access.
pub fn get() -> &'static AppConfig {
    CONFIG.get_or_init(AppConfig::from_env)
}
