use thiserror::Error;

use crate::{Job, JobId, MetadataEntry, NotResolvable, ResolutionTicket, StatusFilter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The view was mounted; starts the first poll.
    Mounted,
    /// Poll timer fired.
    PollTick,
    /// User asked to retry after a service error.
    RetryClicked,
    /// A poll finished with the full job list.
    PollSucceeded { jobs: Vec<Job> },
    /// A poll failed before a job list was obtained.
    PollFailed { error: PollError },
    /// A metadata resolution finished (or timed out).
    MetadataResolved {
        ticket: ResolutionTicket,
        outcome: Result<MetadataEntry, NotResolvable>,
    },
    /// Forget cached metadata for a subject so the next poll resolves it again.
    InvalidateMetadata { subject_url: String },
    /// User switched the list filter.
    FilterChanged(StatusFilter),
    /// User asked to cancel a job.
    CancelClicked { job_id: JobId },
    /// The service answered a cancel request.
    CancelFinished {
        job_id: JobId,
        result: Result<(), String>,
    },
    /// The view is being torn down.
    Unmounted,
    /// Produced by an effect that was abandoned mid-flight.
    NoOp,
}

/// Poll-level failure, shown as a single banner over the whole list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error("download service unavailable: {message}")]
    ServiceUnavailable { message: String },
    #[error("failed to fetch download status: {message}")]
    StatusFetch { message: String },
}
