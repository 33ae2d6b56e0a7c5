//! Background jobs.
//!
//! - [`record`]: the job itself, its state channel and buffers
//! - [`registry`]: session-wide table of jobs by id
//! - [`scheduler`]: spawns one task per job and answers polls

pub mod record;
pub mod registry;
pub mod scheduler;

pub use record::{Job, JobDrain, JobFailure, JobItem, JobSnapshot, JobSpec};
pub use registry::JobRegistry;
pub use scheduler::{JobContext, JobScheduler};
