use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub type JobId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Starting,
    Downloading,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    /// `true` while the download tool is still working on the job.
    pub fn is_active(self) -> bool {
        matches!(self, JobStatus::Starting | JobStatus::Downloading)
    }

    pub fn label(self) -> &'static str {
        match self {
            JobStatus::Starting => "starting",
            JobStatus::Downloading => "downloading",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        }
    }
}

/// One download job as reported by the service's `/status` endpoint.
///
/// Jobs are replaced wholesale on every poll; metadata is cached by
/// `subject_url`, never by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    #[serde(rename = "url")]
    pub subject_url: String,
    pub status: JobStatus,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub message: String,
    pub started_at: NaiveDateTime,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub total_tracks: Option<u32>,
    #[serde(default)]
    pub completed_tracks: Option<u32>,
    #[serde(default)]
    pub downloaded_files: Vec<String>,
}

impl Job {
    /// Track counter text such as `3/12`, when the service reported a total.
    pub fn track_counter(&self) -> Option<String> {
        let total = self.total_tracks.filter(|total| *total > 0)?;
        Some(format!("{}/{}", self.completed_tracks.unwrap_or(0), total))
    }
}

#[cfg(test)]
mod tests {
    use super::{Job, JobStatus};

    #[test]
    fn decodes_service_wire_format() {
        let raw = r#"{
            "id": "dl_20240101_120000_000001",
            "url": "https://open.spotify.com/album/abc",
            "status": "downloading",
            "progress": 40,
            "message": "Downloading 4/10 tracks",
            "started_at": "2024-01-01T12:00:00.123456",
            "completed_at": null,
            "error": null,
            "process": null,
            "process_running": true,
            "total_tracks": 10,
            "completed_tracks": 4
        }"#;

        let job: Job = serde_json::from_str(raw).unwrap();
        assert_eq!(job.subject_url, "https://open.spotify.com/album/abc");
        assert_eq!(job.status, JobStatus::Downloading);
        assert_eq!(job.progress, 40);
        assert_eq!(job.track_counter().as_deref(), Some("4/10"));
        assert!(job.downloaded_files.is_empty());
    }

    #[test]
    fn track_counter_hidden_without_total() {
        let raw = r#"{"id":"a","url":"u","status":"starting","started_at":"2024-01-01T12:00:00"}"#;
        let job: Job = serde_json::from_str(raw).unwrap();
        assert_eq!(job.track_counter(), None);
        assert_eq!(job.message, "");
    }
}
