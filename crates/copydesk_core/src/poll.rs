//! Polling controller backing the result step.
//!
//! One instance exists per opened result view. It never overlaps two status
//! queries, stops the interval timer on `Done`/`Error`, and fetches the final
//! result exactly once per `Done` transition (plus any manual refreshes).

use crate::progress::{clamp_progress, display_progress};
use crate::{Effect, JobId, JobStatus, PipelineResult, Stage, StatusSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    job_id: JobId,
    /// Distinguishes this opening from earlier views of the same job, so
    /// answers to their queries never touch this one.
    generation: u64,
    snapshot: Option<StatusSnapshot>,
    last_progress: Option<f64>,
    result: Option<PipelineResult>,
    polling: bool,
    timer_armed: bool,
    status_in_flight: bool,
    loading_result: bool,
    done_handled: bool,
}

/// What a status response meant for the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StatusOutcome {
    Continue,
    Completed,
    Failed { message: Option<String> },
}

impl ResultView {
    /// Opens the view: immediate status query plus an armed interval timer.
    pub(crate) fn open(
        job_id: JobId,
        generation: u64,
        known_progress: Option<f64>,
    ) -> (Self, Vec<Effect>) {
        let view = Self {
            job_id: job_id.clone(),
            generation,
            snapshot: None,
            last_progress: known_progress.map(clamp_progress),
            result: None,
            polling: true,
            timer_armed: true,
            status_in_flight: true,
            loading_result: false,
            done_handled: false,
        };
        let effects = vec![
            Effect::FetchStatus {
                job_id: job_id.clone(),
                generation,
            },
            Effect::StartPolling { job_id },
        ];
        (view, effects)
    }

    pub(crate) fn on_tick(&mut self) -> Vec<Effect> {
        if !self.polling
            || !self.timer_armed
            || self.status_in_flight
            || self.status().is_terminal()
        {
            return Vec::new();
        }
        self.status_in_flight = true;
        vec![self.fetch_status()]
    }

    /// Applies a server snapshot. Late responses (e.g. after a pause) are
    /// applied as well; they just never re-arm the timer.
    pub(crate) fn on_status(&mut self, snapshot: StatusSnapshot) -> (StatusOutcome, Vec<Effect>) {
        self.status_in_flight = false;
        if let Some(progress) = snapshot.progress {
            self.last_progress = Some(clamp_progress(progress));
        }
        let status = snapshot.status;
        let message = snapshot.message.clone();
        self.snapshot = Some(snapshot);

        match status {
            JobStatus::Done => {
                self.polling = false;
                let mut effects = self.disarm();
                if self.done_handled {
                    return (StatusOutcome::Continue, effects);
                }
                self.done_handled = true;
                self.loading_result = true;
                effects.push(self.fetch_result());
                (StatusOutcome::Completed, effects)
            }
            JobStatus::Error => {
                self.polling = false;
                (StatusOutcome::Failed { message }, self.disarm())
            }
            JobStatus::Pending | JobStatus::Running => (StatusOutcome::Continue, Vec::new()),
        }
    }

    /// Transport or server failure; the next tick retries.
    pub(crate) fn on_status_error(&mut self) {
        self.status_in_flight = false;
    }

    pub(crate) fn toggle_polling(&mut self) -> Vec<Effect> {
        self.polling = !self.polling;
        if self.status().is_terminal() {
            return Vec::new();
        }
        if !self.polling {
            return self.disarm();
        }
        let mut effects = Vec::new();
        if !self.status_in_flight {
            self.status_in_flight = true;
            effects.push(self.fetch_status());
        }
        if !self.timer_armed {
            self.timer_armed = true;
            effects.push(Effect::StartPolling {
                job_id: self.job_id.clone(),
            });
        }
        effects
    }

    pub(crate) fn refresh_result(&mut self) -> Vec<Effect> {
        self.loading_result = true;
        vec![self.fetch_result()]
    }

    pub(crate) fn on_result(&mut self, result: Option<PipelineResult>) {
        self.loading_result = false;
        if let Some(result) = result {
            self.result = Some(result);
        }
    }

    /// Tears the view down; the timer must not outlive it.
    pub(crate) fn close(&mut self) -> Vec<Effect> {
        self.polling = false;
        self.disarm()
    }

    fn disarm(&mut self) -> Vec<Effect> {
        if !self.timer_armed {
            return Vec::new();
        }
        self.timer_armed = false;
        vec![Effect::StopPolling {
            job_id: self.job_id.clone(),
        }]
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True when a response tagged `(job_id, generation)` belongs to this view.
    pub fn answers(&self, job_id: &str, generation: u64) -> bool {
        self.job_id == job_id && self.generation == generation
    }

    fn fetch_status(&self) -> Effect {
        Effect::FetchStatus {
            job_id: self.job_id.clone(),
            generation: self.generation,
        }
    }

    fn fetch_result(&self) -> Effect {
        Effect::FetchResult {
            job_id: self.job_id.clone(),
            generation: self.generation,
        }
    }

    pub fn status(&self) -> JobStatus {
        self.snapshot
            .as_ref()
            .map(|s| s.status)
            .unwrap_or(JobStatus::Pending)
    }

    pub fn stage(&self) -> Option<Stage> {
        self.snapshot.as_ref().map(|s| s.stage)
    }

    pub fn snapshot(&self) -> Option<&StatusSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.snapshot.as_ref().and_then(|s| s.message.as_deref())
    }

    pub fn progress(&self) -> u8 {
        let reported = self.snapshot.as_ref().and_then(|s| s.progress);
        display_progress(self.status(), reported, self.last_progress)
    }

    pub fn result(&self) -> Option<&PipelineResult> {
        self.result.as_ref()
    }

    pub fn is_polling(&self) -> bool {
        self.polling
    }

    pub fn is_timer_armed(&self) -> bool {
        self.timer_armed
    }

    pub fn is_loading_result(&self) -> bool {
        self.loading_result
    }
}
