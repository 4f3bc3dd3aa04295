//! Runtime configuration for embedders of the core crate.
//!
//! Each setting resolves in order: explicit override, environment variable,
//! built-in default.
//!
//! | Setting | Environment | Default |
//! |---|---|---|
//! | database path | `STUDYPLAN_DB` | `<data dir>/studyplan/studyplan.sqlite3` |
//! | log level | `STUDYPLAN_LOG_LEVEL` | `default_log_level()` |
//! | log directory | `STUDYPLAN_LOG_DIR` | `<data dir>/studyplan/logs` |

use crate::logging::{default_log_level, normalize_level};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "STUDYPLAN_DB";
pub const ENV_LOG_LEVEL: &str = "STUDYPLAN_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "STUDYPLAN_LOG_DIR";

const APP_DIR_NAME: &str = "studyplan";
const DB_FILE_NAME: &str = "studyplan.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Caller-supplied values that win over environment and defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub db_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// Always absolute.
    pub log_dir: PathBuf,
}

impl CoreConfig {
    /// Resolves configuration against the process environment.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self, String> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolves configuration using `lookup` for environment variables.
    ///
    /// # Errors
    /// - The log level is not recognized.
    /// - A relative log directory cannot be made absolute.
    pub fn resolve_with(
        overrides: ConfigOverrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, String> {
        let env_value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let db_path = overrides
            .db_path
            .or_else(|| env_value(ENV_DB_PATH).map(PathBuf::from))
            .unwrap_or_else(|| app_dir().join(DB_FILE_NAME));

        let log_level = match overrides.log_level.or_else(|| env_value(ENV_LOG_LEVEL)) {
            Some(level) => normalize_level(&level)?,
            None => default_log_level(),
        };

        let log_dir = overrides
            .log_dir
            .or_else(|| env_value(ENV_LOG_DIR).map(PathBuf::from))
            .unwrap_or_else(|| app_dir().join(LOG_DIR_NAME));
        let log_dir = absolutize(log_dir)?;

        Ok(Self {
            db_path,
            log_level,
            log_dir,
        })
    }
}

/// Per-user application directory, or the working directory when the
/// platform reports none.
fn app_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn absolutize(path: PathBuf) -> Result<PathBuf, String> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir()
        .map_err(|err| format!("cannot resolve working directory: {err}"))?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::{ConfigOverrides, CoreConfig, ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn overrides_win_over_environment() {
        let vars = env(&[(ENV_DB_PATH, "/env/db.sqlite3"), (ENV_LOG_LEVEL, "error")]);
        let config = CoreConfig::resolve_with(
            ConfigOverrides {
                db_path: Some(PathBuf::from("/flag/db.sqlite3")),
                log_level: Some("Warn".to_string()),
                log_dir: Some(PathBuf::from("/flag/logs")),
            },
            |key| vars.get(key).cloned(),
        )
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/flag/db.sqlite3"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, PathBuf::from("/flag/logs"));
    }

    #[test]
    fn environment_fills_missing_overrides() {
        let vars = env(&[
            (ENV_DB_PATH, "/env/db.sqlite3"),
            (ENV_LOG_LEVEL, "trace"),
            (ENV_LOG_DIR, "/env/logs"),
        ]);
        let config =
            CoreConfig::resolve_with(ConfigOverrides::default(), |key| vars.get(key).cloned())
                .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/env/db.sqlite3"));
        assert_eq!(config.log_level, "trace");
        assert_eq!(config.log_dir, PathBuf::from("/env/logs"));
    }

    #[test]
    fn defaults_apply_and_blank_values_are_ignored() {
        let vars = env(&[(ENV_LOG_LEVEL, "   ")]);
        let config =
            CoreConfig::resolve_with(ConfigOverrides::default(), |key| vars.get(key).cloned())
                .unwrap();

        assert!(config.db_path.ends_with("studyplan.sqlite3"));
        assert!(config.log_dir.is_absolute());
        assert_eq!(config.log_level, crate::default_log_level());
    }

    #[test]
    fn unknown_level_is_rejected() {
        let err = CoreConfig::resolve_with(
            ConfigOverrides {
                log_level: Some("loud".to_string()),
                ..ConfigOverrides::default()
            },
            |_| None,
        )
        .unwrap_err();
        assert!(err.contains("unsupported log level"));
    }
}
