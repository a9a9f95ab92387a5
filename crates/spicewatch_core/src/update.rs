use crate::{Effect, Lifecycle, Msg, StatusView};

/// Pure update function: applies a message to state and returns any effects.
///
/// Once the view is torn down every message is dropped unchanged, which is what
/// keeps late async completions from touching the cache or the job list.
pub fn update(mut state: StatusView, msg: Msg) -> (StatusView, Vec<Effect>) {
    if !state.is_active() {
        if msg == Msg::Mounted && state.lifecycle() == Lifecycle::Idle {
            state.mount();
            let effects = if state.try_begin_poll() {
                vec![Effect::FetchStatus]
            } else {
                Vec::new()
            };
            return (state, effects);
        }
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::Mounted => Vec::new(),
        Msg::PollTick | Msg::RetryClicked => {
            if state.try_begin_poll() {
                vec![Effect::FetchStatus]
            } else {
                Vec::new()
            }
        }
        Msg::PollSucceeded { jobs } => {
            let subjects: Vec<String> = jobs.iter().map(|job| job.subject_url.clone()).collect();
            state.apply_poll_success(jobs);
            subjects
                .iter()
                .filter_map(|subject_url| state.request_resolution(subject_url))
                .collect()
        }
        Msg::PollFailed { error } => {
            state.apply_poll_failure(error);
            Vec::new()
        }
        Msg::MetadataResolved { ticket, outcome } => {
            if state.cache_mut().complete(&ticket, outcome) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::InvalidateMetadata { subject_url } => {
            state.cache_mut().invalidate(&subject_url);
            state.mark_dirty();
            Vec::new()
        }
        Msg::FilterChanged(filter) => {
            state.set_filter(filter);
            Vec::new()
        }
        Msg::CancelClicked { job_id } => {
            let known = state.jobs().iter().any(|job| job.id == job_id && job.status.is_active());
            if known {
                vec![Effect::CancelJob { job_id }]
            } else {
                Vec::new()
            }
        }
        Msg::CancelFinished { job_id, result } => match result {
            Ok(()) => {
                state.set_notice(None);
                if state.try_begin_poll() {
                    vec![Effect::FetchStatus]
                } else {
                    Vec::new()
                }
            }
            Err(message) => {
                state.set_notice(Some(format!("Could not cancel {job_id}: {message}")));
                Vec::new()
            }
        },
        Msg::Unmounted => {
            state.tear_down();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
