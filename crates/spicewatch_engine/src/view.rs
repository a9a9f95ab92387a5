use std::sync::Arc;

use spicewatch_core::{
    update, Effect, JobId, Msg, NotResolvable, PollError, StatusFilter, StatusView,
    StatusViewModel,
};
use spicewatch_logging::{watch_debug, watch_error, watch_info, watch_warn};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};

use crate::chain::MetadataResolver;
use crate::lifecycle::LifecycleGuard;
use crate::settings::ViewSettings;
use crate::status_client::StatusClient;

/// A mounted status view.
///
/// One task owns the [`StatusView`] state and applies every message in order,
/// so state changes never interleave. IO runs in spawned tasks that report
/// back through the message channel and are fenced by a [`LifecycleGuard`].
pub struct StatusViewHandle {
    msg_tx: mpsc::UnboundedSender<Msg>,
    view_rx: watch::Receiver<StatusViewModel>,
    guard: LifecycleGuard,
    task: Option<JoinHandle<()>>,
}

impl StatusViewHandle {
    /// Mounts a view and starts polling. Must be called inside a tokio runtime.
    pub fn mount(
        settings: ViewSettings,
        client: Arc<dyn StatusClient>,
        resolver: Arc<dyn MetadataResolver>,
    ) -> Self {
        let guard = LifecycleGuard::new();
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let state = StatusView::with_filter(settings.filter);
        let (view_tx, view_rx) = watch::channel(state.view());

        let runner = EffectRunner {
            client,
            resolver,
            msg_tx: msg_tx.clone(),
            guard: guard.clone(),
            resolution_timeout: settings.resolution_timeout,
        };
        watch_info!("Mounting status view (poll every {:?})", settings.poll_interval);
        let task = tokio::spawn(run_view(state, runner, msg_rx, view_tx, settings.poll_interval));

        Self {
            msg_tx,
            view_rx,
            guard,
            task: Some(task),
        }
    }

    pub fn is_active(&self) -> bool {
        self.guard.is_active()
    }

    pub fn send(&self, msg: Msg) {
        if self.guard.is_active() {
            let _ = self.msg_tx.send(msg);
        }
    }

    pub fn retry(&self) {
        self.send(Msg::RetryClicked);
    }

    pub fn set_filter(&self, filter: StatusFilter) {
        self.send(Msg::FilterChanged(filter));
    }

    pub fn cancel_job(&self, job_id: impl Into<JobId>) {
        self.send(Msg::CancelClicked {
            job_id: job_id.into(),
        });
    }

    pub fn invalidate(&self, subject_url: impl Into<String>) {
        self.send(Msg::InvalidateMetadata {
            subject_url: subject_url.into(),
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<StatusViewModel> {
        self.view_rx.clone()
    }

    pub fn snapshot(&self) -> StatusViewModel {
        self.view_rx.borrow().clone()
    }

    /// Tears the view down. The guard flips first, synchronously, so no
    /// completion can land while the loop is shutting down.
    pub async fn unmount(mut self) {
        self.guard.deactivate();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                watch_error!("Status view task ended abnormally: {}", err);
            }
        }
    }
}

impl Drop for StatusViewHandle {
    fn drop(&mut self) {
        self.guard.deactivate();
    }
}

async fn run_view(
    mut state: StatusView,
    runner: EffectRunner,
    mut msg_rx: mpsc::UnboundedReceiver<Msg>,
    view_tx: watch::Sender<StatusViewModel>,
    poll_interval: Duration,
) {
    let mut ticker = time::interval_at(Instant::now() + poll_interval, poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    state = dispatch(state, Msg::Mounted, &runner, &view_tx);
    loop {
        let msg = tokio::select! {
            biased;
            _ = runner.guard.cancelled() => break,
            Some(msg) = msg_rx.recv() => msg,
            _ = ticker.tick() => Msg::PollTick,
        };
        state = dispatch(state, msg, &runner, &view_tx);
    }

    let abandoned = state.cache().pending_count();
    let _ = update(state, Msg::Unmounted);
    watch_info!(
        "Status view unmounted; abandoned {} pending resolution(s)",
        abandoned
    );
}

fn dispatch(
    state: StatusView,
    msg: Msg,
    runner: &EffectRunner,
    view_tx: &watch::Sender<StatusViewModel>,
) -> StatusView {
    if !runner.guard.is_active() {
        watch_debug!("Dropping message after teardown: {:?}", msg);
        return state;
    }
    if msg == Msg::PollTick && state.poll_in_flight() {
        watch_debug!("Poll tick skipped: previous poll still running");
    }

    let (mut state, effects) = update(state, msg);
    if state.consume_dirty() {
        view_tx.send_replace(state.view());
    }
    for effect in effects {
        runner.spawn(effect);
    }
    state
}

struct EffectRunner {
    client: Arc<dyn StatusClient>,
    resolver: Arc<dyn MetadataResolver>,
    msg_tx: mpsc::UnboundedSender<Msg>,
    guard: LifecycleGuard,
    resolution_timeout: Duration,
}

impl EffectRunner {
    fn spawn(&self, effect: Effect) {
        let guard = self.guard.clone();
        let msg_tx = self.msg_tx.clone();
        match effect {
            Effect::FetchStatus => {
                let client = self.client.clone();
                tokio::spawn(async move {
                    let Some(msg) = guard.run(poll_once(client.as_ref(), &guard)).await else {
                        watch_debug!("Poll abandoned: view torn down");
                        return;
                    };
                    deliver(&guard, &msg_tx, msg);
                });
            }
            Effect::ResolveMetadata { ticket } => {
                let resolver = self.resolver.clone();
                let timeout = self.resolution_timeout;
                tokio::spawn(async move {
                    let subject_url = ticket.subject_url.clone();
                    let resolution = time::timeout(timeout, resolver.resolve(&subject_url));
                    let outcome = match guard.run(resolution).await {
                        None => {
                            watch_debug!("Resolution of {} abandoned: view torn down", subject_url);
                            return;
                        }
                        Some(Ok(outcome)) => outcome,
                        Some(Err(_elapsed)) => {
                            watch_warn!("Resolution of {} timed out after {:?}", subject_url, timeout);
                            Err(NotResolvable::TimedOut)
                        }
                    };
                    if let Err(reason) = &outcome {
                        watch_debug!("Metadata for {} not resolvable: {}", subject_url, reason);
                    }
                    deliver(&guard, &msg_tx, Msg::MetadataResolved { ticket, outcome });
                });
            }
            Effect::CancelJob { job_id } => {
                let client = self.client.clone();
                tokio::spawn(async move {
                    let Some(result) = guard.run(client.cancel(&job_id)).await else {
                        return;
                    };
                    let result = result.map_err(|err| {
                        watch_warn!("Cancel of {} failed: {}", job_id, err);
                        err.message
                    });
                    deliver(&guard, &msg_tx, Msg::CancelFinished { job_id, result });
                });
            }
        }
    }
}

/// Health check, then the job list. Activity is re-checked between the two.
async fn poll_once(client: &dyn StatusClient, guard: &LifecycleGuard) -> Msg {
    if let Err(err) = client.health().await {
        watch_warn!("Download service health check failed: {}", err);
        return Msg::PollFailed {
            error: PollError::ServiceUnavailable {
                message: err.to_string(),
            },
        };
    }
    if !guard.is_active() {
        return Msg::NoOp;
    }

    match client.list_jobs().await {
        Ok(jobs) => Msg::PollSucceeded { jobs },
        Err(err) => {
            watch_warn!("Fetching download status failed: {}", err);
            Msg::PollFailed {
                error: PollError::StatusFetch {
                    message: err.to_string(),
                },
            }
        }
    }
}

fn deliver(guard: &LifecycleGuard, msg_tx: &mpsc::UnboundedSender<Msg>, msg: Msg) {
    if guard.is_active() {
        let _ = msg_tx.send(msg);
    } else {
        watch_debug!("Completion dropped after teardown: {:?}", msg);
    }
}
