use serde::de::DeserializeOwned;
use serde::Deserialize;
use spicewatch_core::{SubjectKind, SubjectRef};
use url::Url;

use super::{join_names, non_empty, MetadataProvider, PartialMetadata};
use crate::http::{provider_transport_error, read_json};
use crate::settings::CatalogSettings;
use crate::ProviderError;

const PROVIDER_NAME: &str = "catalog";

#[derive(Debug, Deserialize)]
struct Named {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Image {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlbumRef {
    name: Option<String>,
    images: Option<Vec<Image>>,
}

#[derive(Debug, Deserialize)]
struct Track {
    name: Option<String>,
    #[serde(default)]
    artists: Vec<Named>,
    album: Option<AlbumRef>,
}

#[derive(Debug, Deserialize)]
struct Album {
    name: Option<String>,
    #[serde(default)]
    artists: Vec<Named>,
    images: Option<Vec<Image>>,
}

#[derive(Debug, Deserialize)]
struct Owner {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Playlist {
    name: Option<String>,
    owner: Option<Owner>,
    images: Option<Vec<Image>>,
}

#[derive(Debug, Deserialize)]
struct Artist {
    name: Option<String>,
    images: Option<Vec<Image>>,
}

fn first_image(images: Option<Vec<Image>>) -> Option<String> {
    images
        .unwrap_or_default()
        .into_iter()
        .find_map(|image| non_empty(image.url))
}

impl From<Track> for PartialMetadata {
    fn from(track: Track) -> Self {
        let (album_name, image_url) = match track.album {
            Some(album) => (non_empty(album.name), first_image(album.images)),
            None => (None, None),
        };
        Self {
            name: non_empty(track.name),
            artist: join_names(track.artists.into_iter().map(|artist| artist.name)),
            album_name,
            image_url,
        }
    }
}

impl From<Album> for PartialMetadata {
    fn from(album: Album) -> Self {
        let name = non_empty(album.name);
        Self {
            album_name: name.clone(),
            name,
            artist: join_names(album.artists.into_iter().map(|artist| artist.name)),
            image_url: first_image(album.images),
        }
    }
}

impl From<Playlist> for PartialMetadata {
    fn from(playlist: Playlist) -> Self {
        Self {
            name: non_empty(playlist.name),
            artist: playlist.owner.and_then(|owner| non_empty(owner.display_name)),
            album_name: None,
            image_url: first_image(playlist.images),
        }
    }
}

impl From<Artist> for PartialMetadata {
    fn from(artist: Artist) -> Self {
        let name = non_empty(artist.name);
        Self {
            artist: name.clone(),
            name,
            album_name: None,
            image_url: first_image(artist.images),
        }
    }
}

/// Primary provider: authenticated direct-by-ID lookups
/// (`{base}/{kind}s/{id}` with a bearer token).
#[derive(Debug, Clone)]
pub struct CatalogProvider {
    client: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl CatalogProvider {
    pub fn new(client: reqwest::Client, settings: &CatalogSettings) -> Self {
        Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            access_token: settings.access_token.clone().and_then(|token| non_empty(Some(token))),
        }
    }

    async fn fetch<T>(&self, token: &str, subject: &SubjectRef) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        let raw = format!("{}/{}s/{}", self.base_url, subject.kind.as_str(), subject.id);
        let url = Url::parse(&raw).map_err(|err| ProviderError::InvalidUrl(err.to_string()))?;
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(provider_transport_error)?;
        let value = read_json(response).await?;
        serde_json::from_value(value).map_err(|err| ProviderError::Decode(err.to_string()))
    }
}

#[async_trait::async_trait]
impl MetadataProvider for CatalogProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn lookup(&self, subject: &SubjectRef) -> Result<PartialMetadata, ProviderError> {
        let token = self
            .access_token
            .as_deref()
            .ok_or(ProviderError::NotConfigured(PROVIDER_NAME))?;

        let partial: PartialMetadata = match subject.kind {
            SubjectKind::Track => self.fetch::<Track>(token, subject).await?.into(),
            SubjectKind::Album => self.fetch::<Album>(token, subject).await?.into(),
            SubjectKind::Playlist => self.fetch::<Playlist>(token, subject).await?.into(),
            SubjectKind::Artist => self.fetch::<Artist>(token, subject).await?.into(),
        };
        Ok(partial)
    }
}
