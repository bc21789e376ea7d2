use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::BoxFuture;
use log::{debug, info, warn};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::{AutoPrError, Result};

use super::outcome::{classify, Outcome};
use super::resolver::{resolve, StageProgress};
use super::snapshot::{JobId, StatusSnapshot};
use super::stages::StageRegistry;

/// Time between the starts of two consecutive status queries.
pub const POLL_INTERVAL: Duration = Duration::from_millis(3000);
/// Delay between detecting success and announcing that tracking is complete.
pub const SUCCESS_GRACE: Duration = Duration::from_millis(1000);

const EVENT_CAPACITY: usize = 64;

/// Anything that can report the status of a job.
pub trait StatusSource: Send + Sync + 'static {
    fn fetch_status<'a>(&'a self, job_id: &'a JobId) -> BoxFuture<'a, Result<StatusSnapshot>>;
}

/// Lifecycle of a [`StatusPoller`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Polling(JobId),
    Terminated { job_id: JobId, outcome: Outcome },
}

/// Final result of tracking one job.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub job_id: JobId,
    pub outcome: Outcome,
    /// Last snapshot received before termination, if any
    pub snapshot: Option<StatusSnapshot>,
    /// Stage states as of the last snapshot that named a pipeline stage
    pub stages: StageProgress,
}

/// Notifications pushed to every subscriber of a poller.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    /// A fresh snapshot replaced the current one
    Progress {
        snapshot: StatusSnapshot,
        stages: StageProgress,
    },
    /// Tracking is complete; no further events follow for this job
    Finished(Completion),
}

struct Slot {
    generation: u64,
    state: PollerState,
    current: Option<StatusSnapshot>,
    /// Progress from the last snapshot whose status was a registered stage
    last_stage: Option<StageProgress>,
}

/// Polls a job's status at a fixed cadence until a terminal outcome.
///
/// The poller owns the only mutable state of a tracking session: the
/// current snapshot. Observers receive immutable snapshots and the final
/// [`Completion`] through [`StatusPoller::subscribe`].
///
/// Queries never overlap: each one is awaited before the next tick, and
/// ticks missed while a slow query is in flight are skipped.
pub struct StatusPoller<S: StatusSource> {
    source: Arc<S>,
    registry: Arc<StageRegistry>,
    slot: Arc<Mutex<Slot>>,
    events: broadcast::Sender<TrackerEvent>,
    task: Option<JoinHandle<()>>,
}

impl<S: StatusSource> StatusPoller<S> {
    pub fn new(source: S, registry: StageRegistry) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            source: Arc::new(source),
            registry: Arc::new(registry),
            slot: Arc::new(Mutex::new(Slot {
                generation: 0,
                state: PollerState::Idle,
                current: None,
                last_stage: None,
            })),
            events,
            task: None,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TrackerEvent> {
        self.events.subscribe()
    }

    pub fn state(&self) -> PollerState {
        lock(&self.slot).state.clone()
    }

    /// The most recent snapshot of the job being tracked.
    pub fn current(&self) -> Option<StatusSnapshot> {
        lock(&self.slot).current.clone()
    }

    pub fn registry(&self) -> &StageRegistry {
        &self.registry
    }

    /// Starts polling `job_id`, replacing any session already running.
    ///
    /// The first query is issued immediately. Must be called within a Tokio runtime.
    pub fn start(&mut self, job_id: JobId) {
        self.stop();

        let generation = {
            let mut slot = lock(&self.slot);
            slot.generation += 1;
            slot.current = None;
            slot.last_stage = None;
            slot.state = PollerState::Polling(job_id.clone());
            slot.generation
        };

        info!("Tracking job {job_id}");

        let session = PollSession {
            source: Arc::clone(&self.source),
            registry: Arc::clone(&self.registry),
            slot: Arc::clone(&self.slot),
            events: self.events.clone(),
            job_id,
            generation,
        };
        self.task = Some(tokio::spawn(session.run()));
    }

    /// Resumes tracking from scratch, typically after a transport error.
    pub fn restart(&mut self, job_id: JobId) {
        debug!("Restarting tracking for job {job_id}");
        self.start(job_id);
    }

    /// Cancels polling. Safe to call repeatedly and after termination.
    ///
    /// Any query still in flight is dropped and its response discarded.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }

        let mut slot = lock(&self.slot);
        slot.generation += 1;
        if let PollerState::Polling(job_id) = &slot.state {
            debug!("Stopped tracking job {job_id}");
            slot.state = PollerState::Idle;
        }
    }
}

impl<S: StatusSource> Drop for StatusPoller<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One polling run for one job, identified by its generation.
struct PollSession<S: StatusSource> {
    source: Arc<S>,
    registry: Arc<StageRegistry>,
    slot: Arc<Mutex<Slot>>,
    events: broadcast::Sender<TrackerEvent>,
    job_id: JobId,
    generation: u64,
}

impl<S: StatusSource> PollSession<S> {
    async fn run(self) {
        let mut ticker = tokio::time::interval(POLL_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            debug!("Querying status of job {}", self.job_id);

            let outcome = match self.source.fetch_status(&self.job_id).await {
                Ok(snapshot) => match self.apply(snapshot) {
                    Some(outcome) => outcome,
                    None => return,
                },
                Err(AutoPrError::RateLimited(notice)) => {
                    warn!(
                        "Status query for job {} was rate limited: {}",
                        self.job_id, notice.message
                    );
                    continue;
                }
                Err(e) => {
                    warn!("Status query for job {} failed: {e}", self.job_id);
                    Outcome::TransportError(e.to_string())
                }
            };

            if !outcome.is_terminal() {
                continue;
            }

            let Some(completion) = self.terminate(outcome) else {
                return;
            };

            if completion.outcome.is_success() {
                tokio::time::sleep(SUCCESS_GRACE).await;
                if !self.is_live() {
                    return;
                }
            }

            info!(
                "Job {} finished: {}",
                completion.job_id,
                completion.outcome.label()
            );
            let _ = self.events.send(TrackerEvent::Finished(completion));
            return;
        }
    }

    fn is_live(&self) -> bool {
        lock(&self.slot).generation == self.generation
    }

    /// Makes `snapshot` current and publishes it; `None` if the session was cancelled.
    fn apply(&self, snapshot: StatusSnapshot) -> Option<Outcome> {
        let mut slot = lock(&self.slot);
        if slot.generation != self.generation {
            debug!("Discarding status of job {} after cancellation", self.job_id);
            return None;
        }

        let stages = resolve(&self.registry, &snapshot.raw_status);
        let outcome = classify(&snapshot);
        slot.current = Some(snapshot.clone());
        if stages.current().is_some() {
            slot.last_stage = Some(stages.clone());
        }
        let _ = self
            .events
            .send(TrackerEvent::Progress { snapshot, stages });

        Some(outcome)
    }

    fn terminate(&self, outcome: Outcome) -> Option<Completion> {
        let mut slot = lock(&self.slot);
        if slot.generation != self.generation {
            return None;
        }

        slot.state = PollerState::Terminated {
            job_id: self.job_id.clone(),
            outcome: outcome.clone(),
        };

        let stages = slot
            .last_stage
            .clone()
            .unwrap_or_else(|| resolve(&self.registry, ""));

        Some(Completion {
            job_id: self.job_id.clone(),
            outcome,
            snapshot: slot.current.clone(),
            stages,
        })
    }
}
