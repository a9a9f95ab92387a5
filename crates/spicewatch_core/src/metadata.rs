use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::SubjectKind;

/// Display metadata for one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub display_name: String,
    pub artist: Option<String>,
    pub album_name: Option<String>,
    pub image_url: Option<String>,
    pub subject_type: SubjectKind,
}

/// Where a subject is in its resolution lifecycle. Tracked separately from
/// [`MetadataEntry`]; display text never encodes state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResolutionState {
    #[default]
    Unresolved,
    Pending,
    Resolved,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotResolvable {
    #[error("subject url does not name a track, album, playlist or artist")]
    UnsupportedSubject,
    #[error("no metadata provider produced a usable result")]
    ProvidersExhausted,
    #[error("metadata resolution timed out")]
    TimedOut,
}
