#![allow(dead_code)]

use std::sync::Once;

use chrono::{NaiveDate, NaiveDateTime};
use spicewatch_core::{
    update, Effect, Job, JobStatus, MetadataEntry, Msg, ResolutionTicket, StatusView, SubjectKind,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(spicewatch_logging::initialize_for_tests);
}

fn started_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

pub fn job(id: &str, subject_url: &str, status: JobStatus) -> Job {
    Job {
        id: id.to_string(),
        subject_url: subject_url.to_string(),
        status,
        progress: if status == JobStatus::Completed { 100 } else { 0 },
        message: String::new(),
        started_at: started_at(),
        completed_at: None,
        error: None,
        total_tracks: None,
        completed_tracks: None,
        downloaded_files: Vec::new(),
    }
}

pub fn entry(name: &str) -> MetadataEntry {
    MetadataEntry {
        display_name: name.to_string(),
        artist: Some("Artist".to_string()),
        album_name: None,
        image_url: None,
        subject_type: SubjectKind::Track,
    }
}

/// Mounted view whose first poll is still in flight.
pub fn mounted() -> StatusView {
    let (state, effects) = update(StatusView::new(), Msg::Mounted);
    assert_eq!(effects, vec![Effect::FetchStatus]);
    state
}

pub fn tickets(effects: &[Effect]) -> Vec<ResolutionTicket> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::ResolveMetadata { ticket } => Some(ticket.clone()),
            _ => None,
        })
        .collect()
}
