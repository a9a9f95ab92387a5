//! Metadata providers. Each provider owns a typed model of its own responses
//! and adapts it to [`PartialMetadata`]; no field-name guessing leaks past the
//! provider module.
mod catalog;
mod query;

pub use catalog::CatalogProvider;
pub use query::QueryProvider;

use spicewatch_core::{MetadataEntry, SubjectKind, SubjectRef};

use crate::ProviderError;

/// A field that can be filled by a narrower follow-up lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataField {
    Artist,
    Album,
    Image,
}

impl MetadataField {
    /// Fields a complete entry of this kind is expected to carry.
    pub fn expected_for(kind: SubjectKind) -> &'static [MetadataField] {
        match kind {
            SubjectKind::Track => &[MetadataField::Artist, MetadataField::Album, MetadataField::Image],
            SubjectKind::Album => &[MetadataField::Artist, MetadataField::Image],
            SubjectKind::Playlist | SubjectKind::Artist => &[MetadataField::Image],
        }
    }
}

/// Whatever a provider managed to find. Only `name` is required for the
/// result to count as usable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartialMetadata {
    pub name: Option<String>,
    pub artist: Option<String>,
    pub album_name: Option<String>,
    pub image_url: Option<String>,
}

impl PartialMetadata {
    pub fn is_usable(&self) -> bool {
        self.name.is_some()
    }

    pub fn get(&self, field: MetadataField) -> Option<&str> {
        match field {
            MetadataField::Artist => self.artist.as_deref(),
            MetadataField::Album => self.album_name.as_deref(),
            MetadataField::Image => self.image_url.as_deref(),
        }
    }

    pub fn set(&mut self, field: MetadataField, value: String) {
        let slot = match field {
            MetadataField::Artist => &mut self.artist,
            MetadataField::Album => &mut self.album_name,
            MetadataField::Image => &mut self.image_url,
        };
        *slot = non_empty(Some(value));
    }

    pub fn missing_fields(&self, kind: SubjectKind) -> Vec<MetadataField> {
        MetadataField::expected_for(kind)
            .iter()
            .copied()
            .filter(|field| self.get(*field).is_none())
            .collect()
    }

    /// `None` unless a display name is present.
    pub fn into_entry(self, kind: SubjectKind) -> Option<MetadataEntry> {
        Some(MetadataEntry {
            display_name: self.name?,
            artist: self.artist,
            album_name: self.album_name,
            image_url: self.image_url,
            subject_type: kind,
        })
    }
}

/// One lookup strategy of the provider chain.
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &'static str;

    async fn lookup(&self, subject: &SubjectRef) -> Result<PartialMetadata, ProviderError>;

    /// Narrow query for a single field. Providers without one return `Ok(None)`.
    async fn lookup_field(
        &self,
        _subject: &SubjectRef,
        _field: MetadataField,
    ) -> Result<Option<String>, ProviderError> {
        Ok(None)
    }
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Comma-joined non-empty names, or `None` if there are none.
pub(crate) fn join_names<I>(names: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    let names: Vec<String> = names.into_iter().filter_map(non_empty).collect();
    (!names.is_empty()).then(|| names.join(", "))
}
