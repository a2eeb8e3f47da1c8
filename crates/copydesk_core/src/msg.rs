use chrono::{DateTime, Utc};

use crate::{
    Author, Intent, JobId, PipelineResult, Quadrant, QuadrantTitles, Route, StatusSnapshot,
    ToastId, Variant,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Move to another wizard location.
    Navigate(Route),
    /// User picked an entry from the job center.
    JobSelected { job_id: JobId },

    /// User edited the keyword box (one keyword per line).
    KeywordsChanged(String),
    GenerateTitlesClicked,
    TitlesGenerated(Result<QuadrantTitles, String>),
    /// User clicked a generated candidate; it replaces the editable title verbatim.
    TitleCandidateSelected { quadrant: Quadrant, index: usize },
    TitleEdited(String),
    TitleNextClicked,

    ReloadAuthorsClicked,
    AuthorsLoaded(Result<Vec<Author>, String>),
    AuthorSelected(String),
    VoicesLoaded {
        author: String,
        result: Result<Vec<String>, String>,
    },
    VoiceSelected(String),
    AddAuthorSubmitted {
        name: String,
        description: Option<String>,
    },
    AuthorAdded {
        name: String,
        result: Result<Vec<Author>, String>,
    },
    PrimaryIntentSelected(Intent),
    SecondaryIntentToggled(Intent),
    SubmitClicked,
    PipelineStarted {
        title: String,
        created_at: DateTime<Utc>,
        result: Result<JobId, String>,
    },
    BackToTitlesClicked,

    /// Interval timer fired for a job.
    PollTick { job_id: JobId },
    StatusReceived {
        job_id: JobId,
        generation: u64,
        result: Result<StatusSnapshot, String>,
    },
    ResultReceived {
        job_id: JobId,
        generation: u64,
        result: Result<PipelineResult, String>,
    },
    /// Pause/resume automatic polling.
    PollingToggled,
    /// Re-fetch the final result regardless of previous fetches.
    RefreshResultClicked,
    /// Go back to the structure step with this job's title.
    ReconfigureClicked,
    DownloadClicked(Variant),
    VariantSaved {
        variant: Variant,
        result: Result<String, String>,
    },

    ToastDismissed(ToastId),
    ToastExpired(ToastId),
}
