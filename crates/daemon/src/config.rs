//! Daemon configuration from environment variables
//!
//! | Variable | Default |
//! |---|---|
//! | `COMPLETION_DB_PATH` | `~/.completion/completion.db` |
//! | `COMPLETION_CRON_INTERVAL_SECS` | `300` |
//! | `COMPLETION_WWWROOT` | `http://localhost` |
//! | `COMPLETION_LOG_FORMAT` | `pretty` (or `json`) |
//! | `COMPLETION_LOG_DIR` | unset (log to stdout) |
//! | `COMPLETION_RUN_ONCE` | unset (`1`/`true` runs one sweep and exits) |

use completion_core::application::constants::{DEFAULT_CRON_INTERVAL, DEFAULT_WWWROOT};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_DB_PATH: &str = "~/.completion/completion.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    pub db_path: String,
    pub cron_interval: Duration,
    pub wwwroot: String,
    pub log_format: LogFormat,
    pub log_dir: Option<PathBuf>,
    pub run_once: bool,
}

impl DaemonConfig {
    /// Read configuration from the process environment.
    ///
    /// Invalid values fall back to defaults; the returned messages should be
    /// logged once logging is up.
    pub fn from_env() -> (Self, Vec<String>) {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();

        let db_path = lookup("COMPLETION_DB_PATH")
            .unwrap_or_else(|| shellexpand::tilde(DEFAULT_DB_PATH).into_owned());

        let cron_interval = match lookup("COMPLETION_CRON_INTERVAL_SECS") {
            None => DEFAULT_CRON_INTERVAL,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warnings.push(format!(
                        "Invalid COMPLETION_CRON_INTERVAL_SECS '{}', using {}s",
                        raw,
                        DEFAULT_CRON_INTERVAL.as_secs()
                    ));
                    DEFAULT_CRON_INTERVAL
                }
            },
        };

        let wwwroot = lookup("COMPLETION_WWWROOT").unwrap_or_else(|| DEFAULT_WWWROOT.to_string());

        let log_format = match lookup("COMPLETION_LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                warnings.push(format!(
                    "Unknown COMPLETION_LOG_FORMAT '{}', using pretty",
                    other
                ));
                LogFormat::Pretty
            }
        };

        let log_dir = lookup("COMPLETION_LOG_DIR")
            .filter(|dir| !dir.is_empty())
            .map(|dir| PathBuf::from(shellexpand::tilde(&dir).into_owned()));

        let run_once = matches!(
            lookup("COMPLETION_RUN_ONCE").as_deref(),
            Some("1") | Some("true")
        );

        (
            Self {
                db_path,
                cron_interval,
                wwwroot,
                log_format,
                log_dir,
                run_once,
            },
            warnings,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> (DaemonConfig, Vec<String>) {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DaemonConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let (config, warnings) = config_from(&[]);
        assert!(warnings.is_empty());
        assert!(config.db_path.ends_with(".completion/completion.db"));
        assert_eq!(config.cron_interval, DEFAULT_CRON_INTERVAL);
        assert_eq!(config.wwwroot, DEFAULT_WWWROOT);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.log_dir.is_none());
        assert!(!config.run_once);
    }

    #[test]
    fn test_explicit_values() {
        let (config, warnings) = config_from(&[
            ("COMPLETION_DB_PATH", "/var/lib/completion.db"),
            ("COMPLETION_CRON_INTERVAL_SECS", "60"),
            ("COMPLETION_WWWROOT", "https://lms.example.edu"),
            ("COMPLETION_LOG_FORMAT", "json"),
            ("COMPLETION_LOG_DIR", "/var/log/completion"),
            ("COMPLETION_RUN_ONCE", "true"),
        ]);
        assert!(warnings.is_empty());
        assert_eq!(config.db_path, "/var/lib/completion.db");
        assert_eq!(config.cron_interval, Duration::from_secs(60));
        assert_eq!(config.wwwroot, "https://lms.example.edu");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/completion")));
        assert!(config.run_once);
    }

    #[test]
    fn test_invalid_values_fall_back_with_warning() {
        let (config, warnings) = config_from(&[
            ("COMPLETION_CRON_INTERVAL_SECS", "0"),
            ("COMPLETION_LOG_FORMAT", "xml"),
        ]);
        assert_eq!(config.cron_interval, DEFAULT_CRON_INTERVAL);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(warnings.len(), 2);
    }
}
