use chrono::{DateTime, Utc};

use crate::{JobId, JobStatus, Stage};

/// Upper bound on remembered jobs; the oldest entry falls off first.
pub const MAX_JOBS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub job_id: JobId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub status: JobStatus,
    pub stage: Stage,
    pub progress: Option<f64>,
}

/// Fields a status poll may change on a stored job.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JobPatch {
    pub status: Option<JobStatus>,
    pub stage: Option<Stage>,
    pub progress: Option<f64>,
}

/// Recent-jobs list, newest first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobStore {
    jobs: Vec<Job>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert. An existing entry is merged in place and keeps its position;
    /// a new one is prepended and the list truncated to [`MAX_JOBS`].
    pub fn add_job(&mut self, job: Job) {
        if let Some(existing) = self.jobs.iter_mut().find(|j| j.job_id == job.job_id) {
            existing.title = job.title;
            existing.created_at = job.created_at;
            existing.status = job.status;
            existing.stage = job.stage;
            if job.progress.is_some() {
                existing.progress = job.progress;
            }
            return;
        }
        self.jobs.insert(0, job);
        self.jobs.truncate(MAX_JOBS);
    }

    /// Merges the provided fields; unknown ids are ignored.
    pub fn update_job(&mut self, job_id: &str, patch: JobPatch) -> bool {
        let Some(job) = self.jobs.iter_mut().find(|j| j.job_id == job_id) else {
            return false;
        };
        if let Some(status) = patch.status {
            job.status = status;
        }
        if let Some(stage) = patch.stage {
            job.stage = stage;
        }
        if let Some(progress) = patch.progress {
            job.progress = Some(progress);
        }
        true
    }

    pub fn get(&self, job_id: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.job_id == job_id)
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
