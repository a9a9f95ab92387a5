mod common;

use common::{entry, init_logging, job, mounted, tickets};
use pretty_assertions::assert_eq;
use spicewatch_core::{
    update, JobStatus, MetadataEntry, Msg, NotResolvable, ResolutionState, StatusView, SubjectKind,
};

const SUBJECT: &str = "https://x/track/1";

fn polled(state: StatusView) -> (StatusView, Vec<spicewatch_core::Effect>) {
    let (state, _) = update(state, Msg::PollTick);
    update(
        state,
        Msg::PollSucceeded {
            jobs: vec![job("a", SUBJECT, JobStatus::Downloading)],
        },
    )
}

#[test]
fn resolved_metadata_is_stored_under_subject() {
    init_logging();
    let (state, effects) = update(
        mounted(),
        Msg::PollSucceeded {
            jobs: vec![job("a", SUBJECT, JobStatus::Downloading)],
        },
    );
    let ticket = tickets(&effects).remove(0);
    let resolved = MetadataEntry {
        display_name: "Song".to_string(),
        artist: Some("Artist".to_string()),
        album_name: Some("Album".to_string()),
        image_url: Some("http://img".to_string()),
        subject_type: SubjectKind::Track,
    };

    let (mut state, effects) = update(
        state,
        Msg::MetadataResolved {
            ticket,
            outcome: Ok(resolved.clone()),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(
        state.cache().peek(SUBJECT),
        (Some(&resolved), ResolutionState::Resolved)
    );
    assert!(state.consume_dirty());
}

#[test]
fn resolved_subject_is_not_requested_again() {
    init_logging();
    let (state, effects) = polled(mounted());
    let ticket = tickets(&effects).remove(0);
    let (state, _) = update(
        state,
        Msg::MetadataResolved {
            ticket,
            outcome: Ok(entry("Song")),
        },
    );
    let before = state.cache().clone();

    let (state, effects) = polled(state);
    let (mut state, again) = polled(state);

    assert!(tickets(&effects).is_empty());
    assert!(tickets(&again).is_empty());
    assert_eq!(state.cache(), &before);
    assert!(state.request_resolution(SUBJECT).is_none());
}

#[test]
fn failed_subject_is_retried_on_next_poll() {
    init_logging();
    let (state, effects) = polled(mounted());
    let ticket = tickets(&effects).remove(0);
    let (state, _) = update(
        state,
        Msg::MetadataResolved {
            ticket,
            outcome: Err(NotResolvable::ProvidersExhausted),
        },
    );
    assert_eq!(state.cache().peek(SUBJECT), (None, ResolutionState::Failed));

    let (state, effects) = polled(state);
    assert_eq!(tickets(&effects).len(), 1);
    assert_eq!(state.cache().state(SUBJECT), ResolutionState::Pending);
}

#[test]
fn timed_out_resolution_unblocks_subject() {
    init_logging();
    let (state, effects) = polled(mounted());
    let ticket = tickets(&effects).remove(0);
    let (state, _) = update(
        state,
        Msg::MetadataResolved {
            ticket,
            outcome: Err(NotResolvable::TimedOut),
        },
    );

    let (_state, effects) = polled(state);
    assert_eq!(tickets(&effects).len(), 1);
}

#[test]
fn invalidate_allows_fresh_resolution_and_drops_stale_result() {
    init_logging();
    let (state, effects) = polled(mounted());
    let stale = tickets(&effects).remove(0);

    let (state, _) = update(
        state,
        Msg::InvalidateMetadata {
            subject_url: SUBJECT.to_string(),
        },
    );
    assert_eq!(state.cache().state(SUBJECT), ResolutionState::Unresolved);

    let (state, effects) = polled(state);
    let fresh = tickets(&effects).remove(0);

    let (state, _) = update(
        state,
        Msg::MetadataResolved {
            ticket: stale,
            outcome: Ok(entry("Stale")),
        },
    );
    assert_eq!(state.cache().state(SUBJECT), ResolutionState::Pending);

    let (state, _) = update(
        state,
        Msg::MetadataResolved {
            ticket: fresh,
            outcome: Ok(entry("Fresh")),
        },
    );
    assert_eq!(
        state.cache().peek(SUBJECT).0.map(|e| e.display_name.clone()),
        Some("Fresh".to_string())
    );
}

#[test]
fn completion_after_teardown_changes_nothing() {
    init_logging();
    let (state, effects) = polled(mounted());
    let ticket = tickets(&effects).remove(0);

    let (state, effects) = update(state, Msg::Unmounted);
    assert!(effects.is_empty());
    assert!(!state.is_active());
    assert!(state.cache().is_empty());
    assert!(state.jobs().is_empty());

    let torn_down = state.clone();
    let (state, effects) = update(
        state,
        Msg::MetadataResolved {
            ticket,
            outcome: Ok(entry("Late")),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state, torn_down);

    let (state, effects) = update(
        state,
        Msg::PollSucceeded {
            jobs: vec![job("z", SUBJECT, JobStatus::Downloading)],
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state, torn_down);

    let (state, effects) = update(state, Msg::Mounted);
    assert!(effects.is_empty());
    assert_eq!(state, torn_down);
}
