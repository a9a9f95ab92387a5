use serde::{Deserialize, Serialize};

use crate::{fallback_label, Job, JobStatus, MetadataCache, MetadataEntry, PollError, ResolutionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
    Failed,
    Cancelled,
}

impl StatusFilter {
    pub fn matches(self, status: JobStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => status.is_active(),
            StatusFilter::Completed => status == JobStatus::Completed,
            StatusFilter::Failed => status == JobStatus::Failed,
            StatusFilter::Cancelled => status == JobStatus::Cancelled,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Some(StatusFilter::All),
            "active" => Some(StatusFilter::Active),
            "completed" => Some(StatusFilter::Completed),
            "failed" => Some(StatusFilter::Failed),
            "cancelled" | "canceled" => Some(StatusFilter::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JobStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub failed: usize,
    pub cancelled: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub job: Job,
    pub metadata: Option<MetadataEntry>,
    pub resolution: ResolutionState,
    /// Display name when known, otherwise the truncated subject identifier.
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Projection {
    pub visible_jobs: Vec<JobRowView>,
    pub stats: JobStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusViewModel {
    pub filter: StatusFilter,
    pub visible_jobs: Vec<JobRowView>,
    pub stats: JobStats,
    pub banner: Option<PollError>,
    pub notice: Option<String>,
    pub poll_in_flight: bool,
    pub dirty: bool,
}

/// Pairs each job passing `filter` with its cached metadata and counts every
/// job by status. Never starts a resolution.
pub fn project(jobs: &[Job], cache: &MetadataCache, filter: StatusFilter) -> Projection {
    let mut stats = JobStats {
        total: jobs.len(),
        ..JobStats::default()
    };
    for job in jobs {
        match job.status {
            JobStatus::Starting | JobStatus::Downloading => stats.active += 1,
            JobStatus::Completed => stats.completed += 1,
            JobStatus::Failed => stats.failed += 1,
            JobStatus::Cancelled => stats.cancelled += 1,
        }
    }

    let visible_jobs = jobs
        .iter()
        .filter(|job| filter.matches(job.status))
        .map(|job| {
            let (metadata, resolution) = cache.peek(&job.subject_url);
            let title = match metadata {
                Some(entry) => entry.display_name.clone(),
                None => fallback_label(&job.subject_url),
            };
            JobRowView {
                job: job.clone(),
                metadata: metadata.cloned(),
                resolution,
                title,
            }
        })
        .collect();

    Projection {
        visible_jobs,
        stats,
    }
}
