//! Session-wide table of jobs by id.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::record::{Job, JobSpec};
use crate::domain::JobId;
use crate::error::{JobError, Result};

/// Jobs keyed by id, in submission order.
///
/// Ids are sequential from 1 and never reused within a registry. Jobs are
/// removed only on explicit request, and only once terminal.
pub struct JobRegistry {
    jobs: RwLock<BTreeMap<JobId, Arc<Job>>>,
    next_id: AtomicU64,
}

impl JobRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create and register a job, returning the shared handle.
    ///
    /// An empty name becomes `Job<id>`.
    pub fn create(&self, mut spec: JobSpec) -> Arc<Job> {
        let id = JobId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        if spec.name.is_empty() {
            spec.name = format!("Job{id}");
        }
        let job = Arc::new(Job::new(id, spec));
        self.jobs.write().insert(id, job.clone());
        job
    }

    /// Look up a job.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::NotFound`] for unknown ids.
    pub fn get(&self, id: JobId) -> Result<Arc<Job>> {
        self.jobs
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| JobError::NotFound(id).into())
    }

    /// All jobs, oldest first.
    #[must_use]
    pub fn list(&self) -> Vec<Arc<Job>> {
        self.jobs.read().values().cloned().collect()
    }

    /// Deregister a terminal job.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::NotFound`] for unknown ids and
    /// [`JobError::StillRunning`] for jobs that have not finished.
    pub fn remove(&self, id: JobId) -> Result<Arc<Job>> {
        let mut jobs = self.jobs.write();
        let job = jobs.get(&id).ok_or(JobError::NotFound(id))?;
        if !job.state().is_terminal() {
            return Err(JobError::StillRunning(id).into());
        }
        jobs.remove(&id).ok_or_else(|| JobError::NotFound(id).into())
    }

    /// Request a stop on every job; terminal jobs are unaffected.
    pub fn stop_all(&self) -> usize {
        self.jobs.read().values().filter(|job| job.stop()).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}
