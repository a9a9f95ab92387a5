//! Spicewatch engine: status service client, metadata providers and the async
//! runtime that drives a mounted status view.
mod chain;
mod http;
mod lifecycle;
pub mod providers;
mod settings;
mod status_client;
mod types;
mod view;

pub use chain::{MetadataResolver, ProviderChain};
pub use lifecycle::LifecycleGuard;
pub use settings::{CatalogSettings, EngineSettings, HttpSettings, QuerySettings, ViewSettings};
pub use status_client::{ReqwestStatusClient, StatusClient};
pub use types::{ProviderError, ServiceError, ServiceErrorKind};
pub use view::StatusViewHandle;
