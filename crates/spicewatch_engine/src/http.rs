use serde_json::Value;

use crate::settings::HttpSettings;
use crate::{ProviderError, ServiceError, ServiceErrorKind};

pub(crate) fn build_client(settings: &HttpSettings) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .build()
}

/// Why a JSON body could not be used.
#[derive(Debug)]
pub(crate) enum BodyError {
    Transport(reqwest::Error),
    Status { status: u16, message: String },
    Json(String),
    Embedded(String),
}

/// How a 2xx body with a top-level `error`/`code` is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Envelope {
    /// Any non-null indicator is a failure.
    Strict,
    /// Objects carrying an `id` are records (a failed job has its own
    /// `error`), not error envelopes.
    Record,
}

/// Reads a JSON body, rejecting non-success statuses and success bodies that
/// carry an `error`/`code` indicator.
pub(crate) async fn read_json(response: reqwest::Response) -> Result<Value, BodyError> {
    read_body(response, Envelope::Strict).await
}

/// Like [`read_json`], but a body that is itself a record with an `id` is
/// accepted even when it has an `error` field of its own.
pub(crate) async fn read_record_json(response: reqwest::Response) -> Result<Value, BodyError> {
    read_body(response, Envelope::Record).await
}

async fn read_body(response: reqwest::Response, envelope: Envelope) -> Result<Value, BodyError> {
    let status = response.status();
    let body = response.text().await.map_err(BodyError::Transport)?;
    let parsed = serde_json::from_str::<Value>(&body);

    if !status.is_success() {
        let message = parsed
            .ok()
            .and_then(|value| embedded_error(&value))
            .unwrap_or(body);
        return Err(BodyError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let value = parsed.map_err(|err| BodyError::Json(err.to_string()))?;
    if envelope == Envelope::Record && is_record(&value) {
        return Ok(value);
    }
    if let Some(message) = embedded_error(&value) {
        return Err(BodyError::Embedded(message));
    }
    Ok(value)
}

fn is_record(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|object| object.get("id").is_some_and(|id| !id.is_null()))
}

/// Message of a top-level `error` or `code` field, if the object has one.
pub(crate) fn embedded_error(value: &Value) -> Option<String> {
    let object = value.as_object()?;
    let indicator = ["error", "code"]
        .iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null() && value != &&Value::Bool(false))?;

    let message = match indicator {
        Value::String(text) => text.clone(),
        Value::Object(inner) => inner
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| indicator.to_string()),
        other => other.to_string(),
    };
    Some(message)
}

impl From<BodyError> for ServiceError {
    fn from(err: BodyError) -> Self {
        match err {
            BodyError::Transport(err) => map_reqwest_error(err),
            BodyError::Status { status, message } => {
                ServiceError::new(ServiceErrorKind::HttpStatus(status), message)
            }
            BodyError::Json(message) => ServiceError::new(ServiceErrorKind::Decode, message),
            BodyError::Embedded(message) => ServiceError::new(ServiceErrorKind::Rejected, message),
        }
    }
}

impl From<BodyError> for ProviderError {
    fn from(err: BodyError) -> Self {
        match err {
            BodyError::Transport(err) => provider_transport_error(err),
            BodyError::Status { status, message } => ProviderError::HttpStatus { status, message },
            BodyError::Json(message) => ProviderError::Decode(message),
            BodyError::Embedded(message) => ProviderError::ErrorPayload(message),
        }
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::new(ServiceErrorKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ServiceError::new(ServiceErrorKind::Decode, err.to_string());
    }
    ServiceError::new(ServiceErrorKind::Network, err.to_string())
}

pub(crate) fn provider_transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Network(err.to_string())
    }
}
