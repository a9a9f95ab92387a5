use serde::Deserialize;
use serde_json::Value;
use spicewatch_core::SubjectRef;
use url::Url;

use super::{join_names, non_empty, MetadataField, MetadataProvider, PartialMetadata};
use crate::http::{provider_transport_error, read_json};
use crate::settings::QuerySettings;
use crate::ProviderError;

const PROVIDER_NAME: &str = "query";

#[derive(Debug, Deserialize)]
struct QueryImage {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryCover {
    #[serde(default)]
    sources: Vec<QueryImage>,
}

#[derive(Debug, Deserialize)]
struct QueryNamed {
    #[serde(alias = "title")]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryAlbum {
    #[serde(alias = "title")]
    name: Option<String>,
    #[serde(rename = "coverArt", alias = "cover")]
    cover_art: Option<QueryCover>,
}

#[derive(Debug, Deserialize)]
struct QueryEntity {
    #[serde(alias = "title")]
    name: Option<String>,
    #[serde(default)]
    artists: Vec<QueryNamed>,
    album: Option<QueryAlbum>,
    #[serde(rename = "coverArt", alias = "cover")]
    cover_art: Option<QueryCover>,
}

impl QueryEntity {
    /// The query API wraps the entity in `data`; older deployments return it bare.
    fn from_value(mut value: Value) -> Result<Self, ProviderError> {
        let entity = match value.get_mut("data").map(Value::take) {
            Some(data) => data,
            None => value,
        };
        if entity.is_null() {
            return Err(ProviderError::Unusable);
        }
        serde_json::from_value(entity).map_err(|err| ProviderError::Decode(err.to_string()))
    }

    fn artist(&self) -> Option<String> {
        join_names(self.artists.iter().map(|artist| artist.name.clone()))
    }

    fn album_name(&self) -> Option<String> {
        self.album.as_ref().and_then(|album| non_empty(album.name.clone()))
    }

    fn image_url(&self) -> Option<String> {
        let own = self.cover_art.as_ref();
        let album = self.album.as_ref().and_then(|album| album.cover_art.as_ref());
        own.into_iter()
            .chain(album)
            .flat_map(|cover| cover.sources.iter())
            .find_map(|image| non_empty(image.url.clone()))
    }

    fn field(&self, field: MetadataField) -> Option<String> {
        match field {
            MetadataField::Artist => self.artist(),
            MetadataField::Album => self.album_name(),
            MetadataField::Image => self.image_url(),
        }
    }
}

impl From<QueryEntity> for PartialMetadata {
    fn from(entity: QueryEntity) -> Self {
        Self {
            artist: entity.artist(),
            album_name: entity.album_name(),
            image_url: entity.image_url(),
            name: non_empty(entity.name),
        }
    }
}

fn field_selector(field: MetadataField) -> &'static str {
    match field {
        MetadataField::Artist => "artists",
        MetadataField::Album => "album",
        MetadataField::Image => "cover",
    }
}

/// Secondary provider: structured query API addressed by subject URI
/// (`{base}/query?uri=spotify:{kind}:{id}[&fields=...]`).
#[derive(Debug, Clone)]
pub struct QueryProvider {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl QueryProvider {
    pub fn new(client: reqwest::Client, settings: &QuerySettings) -> Self {
        Self {
            client,
            base_url: settings
                .base_url
                .as_deref()
                .map(|base| base.trim_end_matches('/').to_string())
                .filter(|base| !base.is_empty()),
        }
    }

    async fn query(
        &self,
        subject: &SubjectRef,
        field: Option<MetadataField>,
    ) -> Result<QueryEntity, ProviderError> {
        let base = self
            .base_url
            .as_deref()
            .ok_or(ProviderError::NotConfigured(PROVIDER_NAME))?;
        let mut url = Url::parse(&format!("{base}/query"))
            .map_err(|err| ProviderError::InvalidUrl(err.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("uri", &subject.uri());
            if let Some(field) = field {
                pairs.append_pair("fields", field_selector(field));
            }
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(provider_transport_error)?;
        let value = read_json(response).await?;
        QueryEntity::from_value(value)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for QueryProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn lookup(&self, subject: &SubjectRef) -> Result<PartialMetadata, ProviderError> {
        Ok(self.query(subject, None).await?.into())
    }

    async fn lookup_field(
        &self,
        subject: &SubjectRef,
        field: MetadataField,
    ) -> Result<Option<String>, ProviderError> {
        Ok(self.query(subject, Some(field)).await?.field(field))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{MetadataField, QueryEntity};
    use crate::ProviderError;

    #[test]
    fn reads_wrapped_and_bare_entities() {
        let wrapped = QueryEntity::from_value(json!({"data": {"title": "Song"}})).unwrap();
        assert_eq!(wrapped.name.as_deref(), Some("Song"));

        let bare = QueryEntity::from_value(json!({"name": "Album"})).unwrap();
        assert_eq!(bare.name.as_deref(), Some("Album"));
    }

    #[test]
    fn null_data_is_unusable() {
        let err = QueryEntity::from_value(json!({"data": null})).unwrap_err();
        assert_eq!(err, ProviderError::Unusable);
    }

    #[test]
    fn image_prefers_own_cover_then_album_cover() {
        let entity = QueryEntity::from_value(json!({
            "data": {
                "name": "Song",
                "album": {"name": "Album", "coverArt": {"sources": [{"url": "http://album"}]}}
            }
        }))
        .unwrap();
        assert_eq!(entity.field(MetadataField::Image).as_deref(), Some("http://album"));
        assert_eq!(entity.field(MetadataField::Album).as_deref(), Some("Album"));
        assert_eq!(entity.field(MetadataField::Artist), None);
    }
}
