//! Runtime configuration resolved from `HEARTGUARD_*` environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_DB_PATH: &str = "heartguard.db";
pub const DEFAULT_LOG_FILE: &str = "heartguard.log";
pub const DEFAULT_ANALYSIS_DELAY: Duration = Duration::from_millis(3000);

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    File,
    Stdout,
    /// File when stdout is a terminal, stdout otherwise
    Auto,
}

impl LogMode {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Resolve to "log to a file?" given whether stdout is interactive.
    #[must_use]
    pub fn use_file(&self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the prediction service
    pub api_url: String,
    pub db_path: PathBuf,
    /// Directory receiving exported reports
    pub report_dir: PathBuf,
    /// `None` waits for the service indefinitely
    pub http_timeout: Option<Duration>,
    /// Simulated processing time for document analysis
    pub analysis_delay: Duration,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
    /// Problems found while reading the environment, logged once logging is up
    pub warnings: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            report_dir: PathBuf::from("."),
            http_timeout: None,
            analysis_delay: DEFAULT_ANALYSIS_DELAY,
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            warnings: Vec::new(),
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let mut warnings = Vec::new();

        let http_timeout = parse_number(&get, "HEARTGUARD_HTTP_TIMEOUT_SECS", &mut warnings)
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs);

        let analysis_delay = parse_number(&get, "HEARTGUARD_ANALYSIS_DELAY_MS", &mut warnings)
            .map_or(defaults.analysis_delay, Duration::from_millis);

        Self {
            api_url: get("HEARTGUARD_API_URL").unwrap_or(defaults.api_url),
            db_path: get("HEARTGUARD_DB_PATH").map_or(defaults.db_path, PathBuf::from),
            report_dir: get("HEARTGUARD_REPORT_DIR").map_or(defaults.report_dir, PathBuf::from),
            http_timeout,
            analysis_delay,
            log_mode: get("HEARTGUARD_LOG_MODE").map_or(defaults.log_mode, |v| LogMode::parse(&v)),
            log_file: get("HEARTGUARD_LOG_FILE").map_or(defaults.log_file, PathBuf::from),
            warnings,
        }
    }
}

/// Parse an optional numeric variable. Malformed values count as unset and
/// are reported in `warnings`.
fn parse_number<G>(get: &G, key: &str, warnings: &mut Vec<String>) -> Option<u64>
where
    G: Fn(&str) -> Option<String>,
{
    let raw = get(key)?;
    match raw.trim().parse::<u64>() {
        Ok(value) => Some(value),
        Err(_) => {
            warnings.push(format!("Ignoring invalid {key}={raw:?}"));
            None
        }
    }
}
