use crate::{JobId, ResolutionTicket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Health check, then fetch the full job list.
    FetchStatus,
    /// Run the provider chain for the ticket's subject.
    ResolveMetadata { ticket: ResolutionTicket },
    CancelJob { job_id: JobId },
}
