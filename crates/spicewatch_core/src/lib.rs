//! Spicewatch core: pure status-view state machine, metadata cache and
//! view-model projection. No IO happens here.
mod cache;
mod effect;
mod job;
mod metadata;
mod msg;
mod state;
mod subject;
mod update;
mod view_model;

pub use cache::{MetadataCache, ResolutionTicket};
pub use effect::Effect;
pub use job::{Job, JobId, JobStatus};
pub use metadata::{MetadataEntry, NotResolvable, ResolutionState};
pub use msg::{Msg, PollError};
pub use state::{Lifecycle, StatusView};
pub use subject::{fallback_label, SubjectKind, SubjectRef, MAX_IDENTIFIER_CHARS};
pub use update::update;
pub use view_model::{
    project, JobRowView, JobStats, Projection, StatusFilter, StatusViewModel,
};
