mod common;

use common::{entry, init_logging, job, mounted, tickets};
use spicewatch_core::{
    project, update, JobStats, JobStatus, MetadataCache, Msg, NotResolvable, ResolutionState,
    StatusFilter,
};

fn mixed_jobs() -> Vec<spicewatch_core::Job> {
    vec![
        job("a", "https://x/track/1", JobStatus::Completed),
        job("b", "https://x/track/2", JobStatus::Downloading),
        job("c", "https://x/album/3", JobStatus::Failed),
        job("d", "https://x/playlist/4", JobStatus::Starting),
        job("e", "https://x/track/5", JobStatus::Cancelled),
        job("f", "https://x/track/6", JobStatus::Downloading),
    ]
}

#[test]
fn active_filter_keeps_service_order() {
    init_logging();
    let jobs = mixed_jobs();
    let projection = project(&jobs, &MetadataCache::new(), StatusFilter::Active);

    let ids: Vec<_> = projection
        .visible_jobs
        .iter()
        .map(|row| row.job.id.as_str())
        .collect();
    assert_eq!(ids, vec!["b", "d", "f"]);
}

#[test]
fn stats_count_all_jobs_regardless_of_filter() {
    init_logging();
    let jobs = mixed_jobs();
    let projection = project(&jobs, &MetadataCache::new(), StatusFilter::Failed);

    assert_eq!(projection.visible_jobs.len(), 1);
    assert_eq!(
        projection.stats,
        JobStats {
            total: 6,
            active: 3,
            completed: 1,
            failed: 1,
            cancelled: 1,
        }
    );
}

#[test]
fn each_filter_selects_its_statuses() {
    init_logging();
    let jobs = mixed_jobs();
    let count = |filter| project(&jobs, &MetadataCache::new(), filter).visible_jobs.len();

    assert_eq!(count(StatusFilter::All), 6);
    assert_eq!(count(StatusFilter::Completed), 1);
    assert_eq!(count(StatusFilter::Cancelled), 1);
}

#[test]
fn rows_pair_jobs_with_cached_metadata() {
    init_logging();
    let jobs = vec![
        job("a", "https://x/track/1", JobStatus::Downloading),
        job("b", "https://x/track/abcdef", JobStatus::Downloading),
    ];
    let (state, effects) = update(mounted(), Msg::PollSucceeded { jobs });
    let ticket = tickets(&effects).remove(0);
    let (state, _) = update(
        state,
        Msg::MetadataResolved {
            ticket,
            outcome: Ok(entry("Song")),
        },
    );

    let view = state.view();
    assert_eq!(view.visible_jobs[0].title, "Song");
    assert_eq!(view.visible_jobs[0].resolution, ResolutionState::Resolved);
    assert_eq!(
        view.visible_jobs[0].metadata.as_ref().and_then(|m| m.artist.as_deref()),
        Some("Artist")
    );
    assert_eq!(view.visible_jobs[1].title, "abcdef");
    assert_eq!(view.visible_jobs[1].resolution, ResolutionState::Pending);
    assert!(view.visible_jobs[1].metadata.is_none());
}

#[test]
fn rendering_does_not_retry_failed_subjects() {
    init_logging();
    let jobs = vec![job("a", "https://x/track/1", JobStatus::Downloading)];
    let (state, effects) = update(mounted(), Msg::PollSucceeded { jobs });
    let ticket = tickets(&effects).remove(0);
    let (mut state, _) = update(
        state,
        Msg::MetadataResolved {
            ticket,
            outcome: Err(NotResolvable::ProvidersExhausted),
        },
    );
    assert!(state.consume_dirty());
    let before = state.clone();

    let first = state.view();
    let second = state.view();

    assert_eq!(first, second);
    assert_eq!(first.visible_jobs[0].resolution, ResolutionState::Failed);
    assert_eq!(first.visible_jobs[0].title, "1");
    assert_eq!(state.cache().pending_count(), 0);
    assert!(!state.consume_dirty());
    assert_eq!(state, before);
}

#[test]
fn filter_change_is_reflected_in_view() {
    init_logging();
    let (state, _) = update(mounted(), Msg::PollSucceeded { jobs: mixed_jobs() });
    let (mut state, _) = update(state, Msg::FilterChanged(StatusFilter::Completed));
    assert!(state.consume_dirty());

    let view = state.view();
    assert_eq!(view.filter, StatusFilter::Completed);
    assert_eq!(view.visible_jobs.len(), 1);
    assert_eq!(view.stats.total, 6);
}
