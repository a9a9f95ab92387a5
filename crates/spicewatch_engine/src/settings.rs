use std::time::Duration;

use spicewatch_core::StatusFilter;

/// Everything the engine needs to talk to the download service and the
/// metadata providers.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub service_url: String,
    pub poll_interval: Duration,
    pub resolution_timeout: Duration,
    pub http: HttpSettings,
    pub catalog: CatalogSettings,
    pub query: QuerySettings,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            service_url: "http://127.0.0.1:5985".to_string(),
            poll_interval: Duration::from_millis(3000),
            resolution_timeout: Duration::from_secs(15),
            http: HttpSettings::default(),
            catalog: CatalogSettings::default(),
            query: QuerySettings::default(),
        }
    }
}

impl EngineSettings {
    pub fn view_settings(&self, filter: StatusFilter) -> ViewSettings {
        ViewSettings {
            poll_interval: self.poll_interval,
            resolution_timeout: self.resolution_timeout,
            filter,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Primary provider: direct-by-ID catalog API. Disabled without a token.
#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub base_url: String,
    pub access_token: Option<String>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.spotify.com/v1".to_string(),
            access_token: None,
        }
    }
}

/// Secondary provider: structured query-by-URI API. Disabled without a base URL.
#[derive(Debug, Clone, Default)]
pub struct QuerySettings {
    pub base_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ViewSettings {
    pub poll_interval: Duration,
    pub resolution_timeout: Duration,
    pub filter: StatusFilter,
}

impl Default for ViewSettings {
    fn default() -> Self {
        EngineSettings::default().view_settings(StatusFilter::All)
    }
}
