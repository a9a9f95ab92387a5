use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use spicewatch_core::StatusFilter;
use spicewatch_engine::{CatalogSettings, EngineSettings, HttpSettings, QuerySettings};

use crate::logging::LogDestination;

pub const DEFAULT_CONFIG_FILE: &str = "spicewatch.ron";
pub const CATALOG_TOKEN_ENV: &str = "SPICEWATCH_CATALOG_TOKEN";

/// User-editable settings. Every key is optional; missing keys take defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service_url: String,
    pub poll_interval_ms: u64,
    pub resolution_timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub catalog_base_url: String,
    pub catalog_token: Option<String>,
    pub query_base_url: Option<String>,
    pub filter: StatusFilter,
    pub log_destination: LogDestination,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let engine = EngineSettings::default();
        Self {
            service_url: engine.service_url,
            poll_interval_ms: millis(engine.poll_interval),
            resolution_timeout_ms: millis(engine.resolution_timeout),
            connect_timeout_ms: millis(engine.http.connect_timeout),
            request_timeout_ms: millis(engine.http.request_timeout),
            catalog_base_url: engine.catalog.base_url,
            catalog_token: None,
            query_base_url: None,
            filter: StatusFilter::All,
            log_destination: LogDestination::File,
            log_level: "info".to_string(),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl AppConfig {
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            service_url: self.service_url.clone(),
            // A zero period would make tokio's interval panic.
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
            resolution_timeout: Duration::from_millis(self.resolution_timeout_ms.max(1)),
            http: HttpSettings {
                connect_timeout: Duration::from_millis(self.connect_timeout_ms),
                request_timeout: Duration::from_millis(self.request_timeout_ms),
            },
            catalog: CatalogSettings {
                base_url: self.catalog_base_url.clone(),
                access_token: self.catalog_token.clone(),
            },
            query: QuerySettings {
                base_url: self.query_base_url.clone(),
            },
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    /// Applies the catalog token from the environment, if set.
    pub fn with_env_token(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|token| !token.trim().is_empty()) {
            self.catalog_token = Some(token);
        }
        self
    }
}

/// Loads the config file. A missing file is created with defaults; an
/// unreadable or malformed file falls back to defaults with a warning.
///
/// Runs before the logger exists, so problems are reported on stderr.
pub fn load_config(path: &Path) -> AppConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            let config = AppConfig::default();
            write_default(path, &config);
            return config;
        }
        Err(err) => {
            eprintln!("Warning: Could not read config from {:?}: {}", path, err);
            return AppConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Warning: Could not parse config from {:?}: {}", path, err);
            AppConfig::default()
        }
    }
}

fn write_default(path: &Path, config: &AppConfig) {
    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(config, pretty) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("Warning: Could not serialize default config: {}", err);
            return;
        }
    };
    if let Err(err) = fs::write(path, content) {
        eprintln!("Warning: Could not write default config to {:?}: {}", path, err);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;

    use spicewatch_core::StatusFilter;
    use tempfile::TempDir;

    use super::{load_config, AppConfig};
    use crate::logging::LogDestination;

    #[test]
    fn missing_file_creates_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("spicewatch.ron");

        let config = load_config(&path);
        assert_eq!(config, AppConfig::default());
        assert!(path.exists());
        assert_eq!(load_config(&path), AppConfig::default());
    }

    #[test]
    fn partial_file_merges_over_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("spicewatch.ron");
        fs::write(
            &path,
            r#"(service_url: "http://localhost:7000", poll_interval_ms: 500, filter: active, log_destination: Both)"#,
        )
        .unwrap();

        let config = load_config(&path);
        assert_eq!(config.service_url, "http://localhost:7000");
        assert_eq!(config.filter, StatusFilter::Active);
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(config.resolution_timeout_ms, AppConfig::default().resolution_timeout_ms);

        let settings = config.engine_settings();
        assert_eq!(settings.poll_interval, Duration::from_millis(500));
        assert_eq!(settings.query.base_url, None);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("spicewatch.ron");
        fs::write(&path, "(service_url: ").unwrap();

        assert_eq!(load_config(&path), AppConfig::default());
    }

    #[test]
    fn env_token_overrides_file_and_ignores_blank() {
        let config = AppConfig {
            catalog_token: Some("file".to_string()),
            ..AppConfig::default()
        };
        let blank = config.clone().with_env_token(Some("  ".to_string()));
        assert_eq!(blank.catalog_token.as_deref(), Some("file"));

        let env = config.with_env_token(Some("env".to_string()));
        assert_eq!(env.engine_settings().catalog.access_token.as_deref(), Some("env"));
    }

    #[test]
    fn zero_poll_interval_is_clamped() {
        let config = AppConfig {
            poll_interval_ms: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.engine_settings().poll_interval, Duration::from_millis(1));
    }
}
