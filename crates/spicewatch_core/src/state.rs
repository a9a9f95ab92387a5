use crate::view_model::{project, StatusFilter, StatusViewModel};
use crate::{Effect, Job, MetadataCache, PollError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Created but not yet mounted.
    #[default]
    Idle,
    Active,
    /// Terminal; a remount builds a fresh view.
    TornDown,
}

/// State of one mounted status view: the last polled job list and the
/// metadata cache that outlives individual polls.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusView {
    lifecycle: Lifecycle,
    jobs: Vec<Job>,
    cache: MetadataCache,
    filter: StatusFilter,
    banner: Option<PollError>,
    notice: Option<String>,
    poll_in_flight: bool,
    dirty: bool,
}

impl StatusView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(filter: StatusFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Active
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn banner(&self) -> Option<&PollError> {
        self.banner.as_ref()
    }

    pub fn poll_in_flight(&self) -> bool {
        self.poll_in_flight
    }

    pub fn view(&self) -> StatusViewModel {
        let projection = project(&self.jobs, &self.cache, self.filter);
        StatusViewModel {
            filter: self.filter,
            visible_jobs: projection.visible_jobs,
            stats: projection.stats,
            banner: self.banner.clone(),
            notice: self.notice.clone(),
            poll_in_flight: self.poll_in_flight,
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Dedup gate entry point: starts a resolution for the subject unless it
    /// is already Resolved or Pending.
    pub fn request_resolution(&mut self, subject_url: &str) -> Option<Effect> {
        if !self.is_active() {
            return None;
        }
        let ticket = self.cache.begin(subject_url)?;
        self.dirty = true;
        Some(Effect::ResolveMetadata { ticket })
    }

    pub(crate) fn mount(&mut self) {
        self.lifecycle = Lifecycle::Active;
        self.dirty = true;
    }

    pub(crate) fn tear_down(&mut self) {
        self.lifecycle = Lifecycle::TornDown;
        self.cache.clear();
        self.jobs.clear();
        self.poll_in_flight = false;
        self.dirty = false;
    }

    /// Claims the single poll slot. `false` if a poll is already running.
    pub(crate) fn try_begin_poll(&mut self) -> bool {
        if self.poll_in_flight {
            return false;
        }
        self.poll_in_flight = true;
        self.dirty = true;
        true
    }

    pub(crate) fn apply_poll_success(&mut self, jobs: Vec<Job>) {
        self.jobs = jobs;
        self.banner = None;
        self.poll_in_flight = false;
        self.dirty = true;
    }

    pub(crate) fn apply_poll_failure(&mut self, error: PollError) {
        self.banner = Some(error);
        self.poll_in_flight = false;
        self.dirty = true;
    }

    pub(crate) fn cache_mut(&mut self) -> &mut MetadataCache {
        &mut self.cache
    }

    pub(crate) fn set_filter(&mut self, filter: StatusFilter) {
        if self.filter != filter {
            self.filter = filter;
            self.dirty = true;
        }
    }

    pub(crate) fn set_notice(&mut self, notice: Option<String>) {
        self.notice = notice;
        self.dirty = true;
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
