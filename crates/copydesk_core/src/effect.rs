use std::time::Duration;

use crate::{Intent, JobId, ToastId, Variant};

/// Side effects requested by [`crate::update`]; executed by the platform layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    GenerateTitles { keywords: Vec<String> },
    LoadAuthors,
    AddAuthor {
        name: String,
        description: Option<String>,
    },
    LoadVoices { author: String },
    StartPipeline(PipelineRequest),
    /// `generation` identifies the result view that asked; it comes back on
    /// [`crate::Msg::StatusReceived`].
    FetchStatus { job_id: JobId, generation: u64 },
    FetchResult { job_id: JobId, generation: u64 },
    /// Arm the interval timer that emits [`crate::Msg::PollTick`].
    StartPolling { job_id: JobId },
    /// Disarm the interval timer for this job.
    StopPolling { job_id: JobId },
    ScheduleToastDismiss { id: ToastId, after: Duration },
    CancelToastDismiss { id: ToastId },
    SaveVariant {
        job_id: JobId,
        variant: Variant,
        content: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRequest {
    pub title: String,
    pub author: String,
    pub voice: String,
    pub primary_intent: Intent,
    /// Already deduplicated and free of the primary intent.
    pub secondary_intents: Vec<Intent>,
}
