//! A tracked background job and its buffers.
//!
//! State lives in a `watch` channel so waiters are woken on every
//! transition; buffers live behind one mutex that also serializes
//! transitions, so nothing can be appended once a terminal state is
//! published.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::{Entity, JobId, JobState, ListingRequest};
use crate::error::Error;

/// What a job was submitted to do.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSpec {
    /// Verb that created the job; the registry fills in `Job<id>` when empty.
    pub name: String,
    /// Human-readable description of the request.
    pub command: String,
    /// Target, filter and limit of a listing job.
    pub parameters: Option<ListingRequest>,
}

impl JobSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            parameters: None,
        }
    }

    /// A spec for a background listing, described by its request.
    #[must_use]
    pub fn listing(request: ListingRequest) -> Self {
        Self {
            name: request.listing.as_str().to_string(),
            command: request.describe(),
            parameters: Some(request),
        }
    }
}

/// An error recorded by a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobFailure {
    pub message: String,
    /// Identifier of whatever the failing call was about.
    pub target: Option<String>,
}

impl JobFailure {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            target: None,
        }
    }

    /// Split a targeted error into its identifier and message.
    #[must_use]
    pub fn from_error(err: &Error) -> Self {
        match err {
            Error::Target { target, source } => Self {
                message: source.to_string(),
                target: Some(target.clone()),
            },
            other => Self::new(other.to_string()),
        }
    }
}

impl std::fmt::Display for JobFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.target {
            Some(target) => write!(f, "{target}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// One entry in a job's output buffer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum JobItem {
    Entity(Entity),
    /// A per-item failure that did not fail the job.
    Error(JobFailure),
}

/// Point-in-time copy of a job.
#[derive(Debug, Clone, Serialize)]
pub struct JobSnapshot {
    pub id: JobId,
    pub instance: Uuid,
    pub name: String,
    pub command: String,
    pub parameters: Option<ListingRequest>,
    pub state: JobState,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub output: Vec<JobItem>,
    pub errors: Vec<JobFailure>,
    pub has_more_data: bool,
}

/// Items appended since the previous [`Job::receive`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobDrain {
    pub output: Vec<JobItem>,
    pub errors: Vec<JobFailure>,
    /// False once the job is terminal and everything has been received.
    pub has_more_data: bool,
}

#[derive(Default)]
struct Buffers {
    output: Vec<JobItem>,
    errors: Vec<JobFailure>,
    output_read: usize,
    errors_read: usize,
    finished_at: Option<DateTime<Utc>>,
}

impl Buffers {
    fn has_unread(&self) -> bool {
        self.output_read < self.output.len() || self.errors_read < self.errors.len()
    }
}

/// A unit of background work.
pub struct Job {
    id: JobId,
    instance: Uuid,
    spec: JobSpec,
    created_at: DateTime<Utc>,
    state: watch::Sender<JobState>,
    buffers: Mutex<Buffers>,
    cancel: CancellationToken,
}

impl Job {
    #[must_use]
    pub fn new(id: JobId, spec: JobSpec) -> Self {
        let (state, _) = watch::channel(JobState::NotStarted);
        Self {
            id,
            instance: Uuid::new_v4(),
            spec,
            created_at: Utc::now(),
            state,
            buffers: Mutex::new(Buffers::default()),
            cancel: CancellationToken::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> JobId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    #[must_use]
    pub fn command(&self) -> &str {
        &self.spec.command
    }

    #[must_use]
    pub fn state(&self) -> JobState {
        *self.state.borrow()
    }

    /// Token the job body checks between units of work.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    #[must_use]
    pub fn is_stop_requested(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Move `NotStarted -> Running`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTransition`] if the job already started.
    pub fn start(&self) -> Result<(), DomainError> {
        let _buffers = self.buffers.lock();
        self.transition(JobState::Running)
    }

    /// Move `Running` to a terminal state and close the buffers.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTransition`] if the job is not running
    /// or `next` is not terminal.
    pub fn finish(&self, next: JobState) -> Result<(), DomainError> {
        let mut buffers = self.buffers.lock();
        self.transition(next)?;
        buffers.finished_at = Some(Utc::now());
        Ok(())
    }

    fn transition(&self, next: JobState) -> Result<(), DomainError> {
        let mut outcome = Ok(());
        self.state.send_if_modified(|state| match state.transition(next) {
            Ok(next) => {
                *state = next;
                true
            }
            Err(e) => {
                outcome = Err(e);
                false
            }
        });
        outcome
    }

    /// Append an entity to the output buffer.
    pub fn push(&self, entity: Entity) {
        self.append(|b| b.output.push(JobItem::Entity(entity)));
    }

    /// Append a per-item failure to the output buffer.
    pub fn push_item_error(&self, failure: JobFailure) {
        self.append(|b| b.output.push(JobItem::Error(failure)));
    }

    /// Append to the error buffer.
    pub fn record_failure(&self, failure: JobFailure) {
        self.append(|b| b.errors.push(failure));
    }

    fn append(&self, write: impl FnOnce(&mut Buffers)) {
        let mut buffers = self.buffers.lock();
        let state = self.state();
        if state.is_terminal() {
            warn!(job = %self.id, state = %state, "Dropping append to closed job");
            return;
        }
        write(&mut buffers);
    }

    /// Request a cooperative stop.
    ///
    /// Returns false, doing nothing, when the job is already terminal.
    pub fn stop(&self) -> bool {
        if self.state().is_terminal() {
            return false;
        }
        self.cancel.cancel();
        true
    }

    /// Whether a subsequent [`receive`](Self::receive) could return anything.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        let buffers = self.buffers.lock();
        buffers.has_unread() || !self.state().is_terminal()
    }

    /// Copy the current state and full buffers without consuming them.
    #[must_use]
    pub fn snapshot(&self) -> JobSnapshot {
        let buffers = self.buffers.lock();
        let state = self.state();
        JobSnapshot {
            id: self.id,
            instance: self.instance,
            name: self.spec.name.clone(),
            command: self.spec.command.clone(),
            parameters: self.spec.parameters.clone(),
            state,
            created_at: self.created_at,
            finished_at: buffers.finished_at,
            output: buffers.output.clone(),
            errors: buffers.errors.clone(),
            has_more_data: buffers.has_unread() || !state.is_terminal(),
        }
    }

    /// Return what was appended since the last call.
    ///
    /// Buffers are never truncated; a read cursor advances instead, so
    /// [`snapshot`](Self::snapshot) keeps returning everything.
    pub fn receive(&self) -> JobDrain {
        let mut buffers = self.buffers.lock();
        let output = buffers.output[buffers.output_read..].to_vec();
        let errors = buffers.errors[buffers.errors_read..].to_vec();
        buffers.output_read = buffers.output.len();
        buffers.errors_read = buffers.errors.len();
        JobDrain {
            output,
            errors,
            has_more_data: !self.state().is_terminal(),
        }
    }

    /// Watch state transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<JobState> {
        self.state.subscribe()
    }

    /// Wait until the job reaches a terminal state.
    pub async fn wait(&self) -> JobState {
        let mut rx = self.subscribe();
        loop {
            let state = *rx.borrow_and_update();
            if state.is_terminal() {
                return state;
            }
            if rx.changed().await.is_err() {
                return *rx.borrow();
            }
        }
    }
}

impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Job")
            .field("id", &self.id)
            .field("name", &self.spec.name)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
