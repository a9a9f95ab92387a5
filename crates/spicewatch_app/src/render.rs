use spicewatch_core::{JobRowView, JobStats, ResolutionState, StatusFilter, StatusViewModel};

const TIME_FORMAT: &str = "%H:%M:%S";

/// Renders the view model as plain text lines for the terminal.
pub fn render(view: &StatusViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(banner) = &view.banner {
        lines.push(format!("!! {banner}"));
    }

    lines.push(format_summary(view.filter, &view.stats, view.poll_in_flight));

    if view.visible_jobs.is_empty() {
        lines.push(empty_message(view.filter, view.stats.total).to_string());
    } else {
        lines.extend(view.visible_jobs.iter().map(format_job_row));
    }

    if let Some(notice) = &view.notice {
        lines.push(format!("-- {notice}"));
    }

    lines
}

fn format_summary(filter: StatusFilter, stats: &JobStats, polling: bool) -> String {
    let summary = format!(
        "Filter: {} | Jobs: {} | Active: {} | Completed: {} | Failed: {} | Cancelled: {}",
        filter_label(filter),
        stats.total,
        stats.active,
        stats.completed,
        stats.failed,
        stats.cancelled
    );
    if polling {
        format!("{summary} | refreshing")
    } else {
        summary
    }
}

fn empty_message(filter: StatusFilter, total: usize) -> &'static str {
    match (filter, total) {
        (_, 0) => "No downloads yet.",
        (StatusFilter::All, _) => "No downloads yet.",
        _ => "No downloads match this filter.",
    }
}

fn format_job_row(row: &JobRowView) -> String {
    let job = &row.job;
    let mut text = format!(
        "[{id}] {status:<11} {progress:>3}% {title}",
        id = job.id,
        status = job.status.label(),
        progress = job.progress.min(100),
        title = row.title
    );

    if let Some(artist) = row.metadata.as_ref().and_then(|entry| entry.artist.as_deref()) {
        text.push_str(&format!(" - {artist}"));
    }
    if let Some(marker) = resolution_marker(row.resolution) {
        text.push_str(&format!(" ({marker})"));
    }
    if let Some(counter) = job.track_counter() {
        text.push_str(&format!(" [{counter} tracks]"));
    }
    text.push_str(&format!(" started {}", job.started_at.format(TIME_FORMAT)));

    match &job.error {
        Some(error) if !error.is_empty() => text.push_str(&format!(" | error: {error}")),
        _ if !job.message.is_empty() => text.push_str(&format!(" | {}", job.message)),
        _ => {}
    }
    text
}

fn resolution_marker(state: ResolutionState) -> Option<&'static str> {
    match state {
        ResolutionState::Unresolved | ResolutionState::Resolved => None,
        ResolutionState::Pending => Some("loading"),
        ResolutionState::Failed => Some("no metadata"),
    }
}

fn filter_label(filter: StatusFilter) -> &'static str {
    match filter {
        StatusFilter::All => "all",
        StatusFilter::Active => "active",
        StatusFilter::Completed => "completed",
        StatusFilter::Failed => "failed",
        StatusFilter::Cancelled => "cancelled",
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use spicewatch_core::{
        Job, JobRowView, JobStats, JobStatus, MetadataEntry, PollError, ResolutionState,
        StatusFilter, StatusViewModel, SubjectKind,
    };

    use super::render;

    fn job(id: &str, status: JobStatus) -> Job {
        Job {
            id: id.to_string(),
            subject_url: format!("https://open.spotify.com/album/{id}"),
            status,
            progress: 40,
            message: "Downloading".to_string(),
            started_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(12, 30, 5)
                .unwrap(),
            completed_at: None,
            error: None,
            total_tracks: Some(10),
            completed_tracks: Some(4),
            downloaded_files: Vec::new(),
        }
    }

    #[test]
    fn renders_resolved_row_with_artist_and_counter() {
        let view = StatusViewModel {
            visible_jobs: vec![JobRowView {
                job: job("a1", JobStatus::Downloading),
                metadata: Some(MetadataEntry {
                    display_name: "Abbey Road".to_string(),
                    artist: Some("The Beatles".to_string()),
                    album_name: None,
                    image_url: None,
                    subject_type: SubjectKind::Album,
                }),
                resolution: ResolutionState::Resolved,
                title: "Abbey Road".to_string(),
            }],
            stats: JobStats {
                total: 1,
                active: 1,
                ..JobStats::default()
            },
            ..StatusViewModel::default()
        };

        let lines = render(&view);
        assert_eq!(
            lines[0],
            "Filter: all | Jobs: 1 | Active: 1 | Completed: 0 | Failed: 0 | Cancelled: 0"
        );
        assert_eq!(
            lines[1],
            "[a1] downloading  40% Abbey Road - The Beatles [4/10 tracks] started 12:30:05 | Downloading"
        );
    }

    #[test]
    fn renders_banner_notice_and_pending_marker() {
        let mut failed = job("b2", JobStatus::Failed);
        failed.error = Some("network down".to_string());
        let view = StatusViewModel {
            filter: StatusFilter::Failed,
            visible_jobs: vec![JobRowView {
                job: failed,
                metadata: None,
                resolution: ResolutionState::Pending,
                title: "b2".to_string(),
            }],
            stats: JobStats {
                total: 3,
                failed: 1,
                ..JobStats::default()
            },
            banner: Some(PollError::ServiceUnavailable {
                message: "connection refused".to_string(),
            }),
            notice: Some("Could not cancel x: gone".to_string()),
            ..StatusViewModel::default()
        };

        let lines = render(&view);
        assert_eq!(lines[0], "!! download service unavailable: connection refused");
        assert!(lines[2].contains("b2 (loading)"));
        assert!(lines[2].ends_with("| error: network down"));
        assert_eq!(lines[3], "-- Could not cancel x: gone");
    }

    #[test]
    fn empty_filtered_view_explains_itself() {
        let view = StatusViewModel {
            filter: StatusFilter::Completed,
            stats: JobStats {
                total: 2,
                active: 2,
                ..JobStats::default()
            },
            poll_in_flight: true,
            ..StatusViewModel::default()
        };

        let lines = render(&view);
        assert!(lines[0].ends_with("| refreshing"));
        assert_eq!(lines[1], "No downloads match this filter.");
    }
}
