use serde::Deserialize;
use serde_json::json;
use spicewatch_core::Job;
use url::Url;

use crate::http::{build_client, map_reqwest_error, read_json, read_record_json};
use crate::settings::HttpSettings;
use crate::{ServiceError, ServiceErrorKind};

/// Boundary to the external download service.
#[async_trait::async_trait]
pub trait StatusClient: Send + Sync {
    /// `GET /health`; any non-success is an error.
    async fn health(&self) -> Result<(), ServiceError>;
    /// `GET /status` without an id: every known job, in service order.
    async fn list_jobs(&self) -> Result<Vec<Job>, ServiceError>;
    /// `GET /status?id=`. For refreshing a single job outside the poll cycle;
    /// the view itself only ever replaces the whole list.
    async fn job(&self, job_id: &str) -> Result<Job, ServiceError>;
    /// `POST /cancel {id}`.
    async fn cancel(&self, job_id: &str) -> Result<(), ServiceError>;
}

#[derive(Debug, Deserialize)]
struct StatusList {
    downloads: Vec<Job>,
    #[serde(default)]
    total: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ReqwestStatusClient {
    base_url: String,
    client: reqwest::Client,
}

impl ReqwestStatusClient {
    pub fn new(service_url: &str, settings: &HttpSettings) -> Result<Self, ServiceError> {
        Url::parse(service_url)
            .map_err(|err| ServiceError::new(ServiceErrorKind::InvalidUrl, err.to_string()))?;
        let client = build_client(settings).map_err(map_reqwest_error)?;
        Ok(Self {
            base_url: service_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        Url::parse(&format!("{}/{}", self.base_url, path))
            .map_err(|err| ServiceError::new(ServiceErrorKind::InvalidUrl, err.to_string()))
    }
}

#[async_trait::async_trait]
impl StatusClient for ReqwestStatusClient {
    async fn health(&self) -> Result<(), ServiceError> {
        let response = self
            .client
            .get(self.endpoint("health")?)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ServiceError::new(
                ServiceErrorKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ))
        }
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, ServiceError> {
        let response = self
            .client
            .get(self.endpoint("status")?)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let value = read_json(response).await?;
        let list: StatusList = serde_json::from_value(value)
            .map_err(|err| ServiceError::new(ServiceErrorKind::Decode, err.to_string()))?;
        if let Some(total) = list.total.filter(|total| *total != list.downloads.len()) {
            spicewatch_logging::watch_debug!(
                "Status total {} differs from {} listed downloads",
                total,
                list.downloads.len()
            );
        }
        Ok(list.downloads)
    }

    async fn job(&self, job_id: &str) -> Result<Job, ServiceError> {
        let mut url = self.endpoint("status")?;
        url.query_pairs_mut().append_pair("id", job_id);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let value = read_record_json(response).await?;
        serde_json::from_value(value)
            .map_err(|err| ServiceError::new(ServiceErrorKind::Decode, err.to_string()))
    }

    async fn cancel(&self, job_id: &str) -> Result<(), ServiceError> {
        let response = self
            .client
            .post(self.endpoint("cancel")?)
            .json(&json!({ "id": job_id }))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await?;
        Ok(())
    }
}
