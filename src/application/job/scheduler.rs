//! Fire-and-forget job execution.
//!
//! Every submitted job gets its own tokio task. There is no pool bound and
//! no backpressure: a burst of submissions spawns a burst of tasks.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, warn, Instrument};

use super::record::{Job, JobDrain, JobFailure, JobSnapshot, JobSpec};
use super::registry::JobRegistry;
use crate::domain::{Entity, JobId, JobState};
use crate::error::{Error, Result};

/// Handle the job body uses to publish results.
#[derive(Clone)]
pub struct JobContext {
    job: Arc<Job>,
}

impl JobContext {
    #[must_use]
    pub fn id(&self) -> JobId {
        self.job.id()
    }

    /// Append an entity to the job's output.
    pub fn emit(&self, entity: Entity) {
        self.job.push(entity);
    }

    /// Record a per-item failure in the output without failing the job.
    pub fn emit_error(&self, err: &Error) {
        self.job.push_item_error(JobFailure::from_error(err));
    }

    /// Token to check between units of work.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.job.cancel_token()
    }
}

/// Submits jobs and answers queries about them.
#[derive(Clone)]
pub struct JobScheduler {
    registry: Arc<JobRegistry>,
}

impl JobScheduler {
    #[must_use]
    pub fn new(registry: Arc<JobRegistry>) -> Self {
        Self { registry }
    }

    #[must_use]
    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    /// Register a job and spawn its body.
    ///
    /// The job is registered before the task is spawned, so it can be
    /// polled as soon as this returns. A body error or panic moves the job
    /// to `Failed` with one error recorded; the worker itself never fails.
    pub fn submit<F, Fut>(&self, spec: JobSpec, body: F) -> JobId
    where
        F: FnOnce(JobContext) -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let job = self.registry.create(spec);
        let id = job.id();
        let span = info_span!("job", id = %id, name = %job.name());
        tokio::spawn(run(job, body).instrument(span));
        id
    }

    /// Current state and full buffers of a job. Never blocks on the worker.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::NotFound`](crate::error::JobError::NotFound) for
    /// unknown ids.
    pub fn poll(&self, id: JobId) -> Result<JobSnapshot> {
        Ok(self.registry.get(id)?.snapshot())
    }

    /// Items appended since the last receive on this job.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::NotFound`](crate::error::JobError::NotFound) for
    /// unknown ids.
    pub fn receive(&self, id: JobId) -> Result<JobDrain> {
        Ok(self.registry.get(id)?.receive())
    }

    /// Block until the job is terminal, then snapshot it.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::NotFound`](crate::error::JobError::NotFound) for
    /// unknown ids.
    pub async fn wait(&self, id: JobId) -> Result<JobSnapshot> {
        let job = self.registry.get(id)?;
        job.wait().await;
        Ok(job.snapshot())
    }

    /// Request a cooperative stop. Returns the state at the time of the call.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::NotFound`](crate::error::JobError::NotFound) for
    /// unknown ids.
    pub fn stop(&self, id: JobId) -> Result<JobState> {
        let job = self.registry.get(id)?;
        if job.stop() {
            info!(job = %id, "Stop requested");
        }
        Ok(job.state())
    }

    /// Deregister a terminal job.
    ///
    /// # Errors
    ///
    /// See [`JobRegistry::remove`].
    pub fn remove(&self, id: JobId) -> Result<JobSnapshot> {
        Ok(self.registry.remove(id)?.snapshot())
    }

    /// Snapshots of every job, oldest first.
    #[must_use]
    pub fn list(&self) -> Vec<JobSnapshot> {
        self.registry.list().iter().map(|job| job.snapshot()).collect()
    }
}

async fn run<F, Fut>(job: Arc<Job>, body: F)
where
    F: FnOnce(JobContext) -> Fut + Send + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    if let Err(e) = job.start() {
        warn!(error = %e, "Job could not start");
        return;
    }
    info!(command = %job.command(), "Job started");

    let ctx = JobContext { job: job.clone() };
    let outcome = AssertUnwindSafe(async move { body(ctx).await })
        .catch_unwind()
        .await;

    let next = match outcome {
        Ok(Ok(())) if job.is_stop_requested() => JobState::Stopped,
        Ok(Ok(())) => JobState::Completed,
        Ok(Err(err)) => {
            warn!(error = %err, "Job failed");
            job.record_failure(JobFailure::from_error(&err));
            JobState::Failed
        }
        Err(panic) => {
            let message = format!("job panicked: {}", panic_message(panic.as_ref()));
            warn!(%message, "Job failed");
            job.record_failure(JobFailure::new(message));
            JobState::Failed
        }
    };

    if let Err(e) = job.finish(next) {
        warn!(error = %e, "Job could not finish");
        return;
    }
    info!(state = %next, "Job finished");
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
