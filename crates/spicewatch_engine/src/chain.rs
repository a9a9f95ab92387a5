use std::sync::Arc;

use spicewatch_core::{MetadataEntry, NotResolvable, SubjectRef};
use spicewatch_logging::{watch_debug, watch_trace};

use crate::http::build_client;
use crate::providers::{CatalogProvider, MetadataProvider, PartialMetadata, QueryProvider};
use crate::settings::EngineSettings;

/// Turns a subject URL into display metadata.
#[async_trait::async_trait]
pub trait MetadataResolver: Send + Sync {
    async fn resolve(&self, subject_url: &str) -> Result<MetadataEntry, NotResolvable>;
}

/// Providers tried in priority order. The first usable result wins, then
/// its missing fields are filled one at a time by narrower lookups. Provider
/// errors never leave the chain.
///
/// The crude trailing-segment label is not produced here: a subject that no
/// provider can describe is reported as [`NotResolvable`] so it stays eligible
/// for retry, and the projector shows `fallback_label` for it instead.
pub struct ProviderChain {
    providers: Vec<Arc<dyn MetadataProvider>>,
}

impl ProviderChain {
    pub fn new(providers: Vec<Arc<dyn MetadataProvider>>) -> Self {
        Self { providers }
    }

    /// Catalog first, structured query second, sharing one HTTP client.
    pub fn from_settings(settings: &EngineSettings) -> Result<Self, reqwest::Error> {
        let client = build_client(&settings.http)?;
        Ok(Self::new(vec![
            Arc::new(CatalogProvider::new(client.clone(), &settings.catalog)),
            Arc::new(QueryProvider::new(client, &settings.query)),
        ]))
    }

    async fn first_usable(&self, subject: &SubjectRef) -> Option<PartialMetadata> {
        for provider in &self.providers {
            match provider.lookup(subject).await {
                Ok(partial) if partial.is_usable() => {
                    watch_trace!("{} resolved {}", provider.name(), subject.uri());
                    return Some(partial);
                }
                Ok(_) => {
                    watch_debug!("{} returned no usable fields for {}", provider.name(), subject.uri());
                }
                Err(err) => {
                    watch_debug!("{} failed for {}: {}", provider.name(), subject.uri(), err);
                }
            }
        }
        None
    }

    async fn fill_missing(&self, subject: &SubjectRef, partial: &mut PartialMetadata) {
        for field in partial.missing_fields(subject.kind) {
            for provider in &self.providers {
                match provider.lookup_field(subject, field).await {
                    Ok(Some(value)) => {
                        partial.set(field, value);
                        if partial.get(field).is_some() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(err) => {
                        watch_debug!(
                            "{} could not fill {:?} for {}: {}",
                            provider.name(),
                            field,
                            subject.uri(),
                            err
                        );
                    }
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl MetadataResolver for ProviderChain {
    async fn resolve(&self, subject_url: &str) -> Result<MetadataEntry, NotResolvable> {
        let subject = SubjectRef::parse(subject_url).ok_or(NotResolvable::UnsupportedSubject)?;
        let mut partial = self
            .first_usable(&subject)
            .await
            .ok_or(NotResolvable::ProvidersExhausted)?;
        self.fill_missing(&subject, &mut partial).await;
        partial
            .into_entry(subject.kind)
            .ok_or(NotResolvable::ProvidersExhausted)
    }
}
