use serde::{Deserialize, Serialize};
use url::Url;

/// Longest identifier shown for a subject whose metadata is unknown.
pub const MAX_IDENTIFIER_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    Track,
    Album,
    Playlist,
    Artist,
}

impl SubjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SubjectKind::Track => "track",
            SubjectKind::Album => "album",
            SubjectKind::Playlist => "playlist",
            SubjectKind::Artist => "artist",
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "track" => Some(SubjectKind::Track),
            "album" => Some(SubjectKind::Album),
            "playlist" => Some(SubjectKind::Playlist),
            "artist" => Some(SubjectKind::Artist),
            _ => None,
        }
    }
}

/// A subject's native identifier, parsed out of its URL or URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubjectRef {
    pub kind: SubjectKind,
    pub id: String,
}

impl SubjectRef {
    /// Parses `.../{track|album|playlist|artist}/{id}` URLs and
    /// `spotify:{kind}:{id}` URIs. Anything else yields `None`.
    pub fn parse(subject_url: &str) -> Option<Self> {
        let trimmed = subject_url.trim();
        if let Some(rest) = trimmed.strip_prefix("spotify:") {
            let mut parts = rest.split(':');
            let kind = SubjectKind::from_segment(parts.next()?)?;
            let id = parts.next().filter(|id| is_valid_id(id))?;
            return Some(Self {
                kind,
                id: id.to_string(),
            });
        }

        let url = Url::parse(trimmed).ok()?;
        let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
        // Localized links look like `/intl-de/track/{id}`, so scan every pair.
        segments.windows(2).find_map(|pair| {
            let kind = SubjectKind::from_segment(pair[0])?;
            is_valid_id(pair[1]).then(|| Self {
                kind,
                id: pair[1].to_string(),
            })
        })
    }

    /// `spotify:{kind}:{id}`, the form the structured query API expects.
    pub fn uri(&self) -> String {
        format!("spotify:{}:{}", self.kind.as_str(), self.id)
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Crude label from the trailing path segment of a subject URL, truncated to
/// [`MAX_IDENTIFIER_CHARS`]. Never fails; an unparsable URL is truncated as is.
pub fn fallback_label(subject_url: &str) -> String {
    let trimmed = subject_url.trim();
    let without_query = trimmed.split(['?', '#']).next().unwrap_or(trimmed);
    let segment = without_query
        .trim_end_matches('/')
        .rsplit(['/', ':'])
        .find(|segment| !segment.is_empty())
        .unwrap_or(trimmed);
    truncate_chars(segment, MAX_IDENTIFIER_CHARS)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use super::{fallback_label, SubjectKind, SubjectRef, MAX_IDENTIFIER_CHARS};

    #[test]
    fn parses_open_spotify_urls() {
        let subject =
            SubjectRef::parse("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC?si=abc")
                .unwrap();
        assert_eq!(subject.kind, SubjectKind::Track);
        assert_eq!(subject.id, "4uLU6hMCjMI75M1A2tKUQC");
        assert_eq!(subject.uri(), "spotify:track:4uLU6hMCjMI75M1A2tKUQC");
    }

    #[test]
    fn parses_localized_urls_and_uris() {
        let localized = SubjectRef::parse("https://open.spotify.com/intl-ja/album/1DFixLWuPkv3KT3TnV35m3").unwrap();
        assert_eq!(localized.kind, SubjectKind::Album);

        let uri = SubjectRef::parse("spotify:playlist:37i9dQZF1DXcBWIGoYBM5M").unwrap();
        assert_eq!(uri.kind, SubjectKind::Playlist);
        assert_eq!(uri.id, "37i9dQZF1DXcBWIGoYBM5M");
    }

    #[test]
    fn rejects_unknown_shapes() {
        assert_eq!(SubjectRef::parse("https://open.spotify.com/show/abc"), None);
        assert_eq!(SubjectRef::parse("https://open.spotify.com/track/"), None);
        assert_eq!(SubjectRef::parse("not a url"), None);
        assert_eq!(SubjectRef::parse("spotify:episode:abc"), None);
    }

    #[test]
    fn fallback_label_uses_trailing_segment() {
        assert_eq!(fallback_label("https://x/track/1"), "1");
        assert_eq!(fallback_label("https://x/album/abc/?si=1"), "abc");
        assert_eq!(fallback_label("spotify:track:xyz"), "xyz");

        let long = format!("https://x/track/{}", "a".repeat(80));
        let label = fallback_label(&long);
        assert_eq!(label.chars().count(), MAX_IDENTIFIER_CHARS);
        assert!(label.ends_with('…'));
    }
}
