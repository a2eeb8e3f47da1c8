use crate::{Author, Intent, JobId, JobStatus, QuadrantTitles, Route, Stage, ToastId, ToastKind};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub route: Route,
    pub location: String,
    pub titles: TitleStepView,
    pub structure: StructureStepView,
    pub result: Option<ResultViewModel>,
    pub jobs: Vec<JobRowView>,
    pub toasts: Vec<ToastView>,
    pub pending_exports: usize,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TitleStepView {
    pub keywords: String,
    pub quadrants: QuadrantTitles,
    pub selected_title: String,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructureStepView {
    pub title: String,
    pub title_valid: bool,
    pub authors: Vec<Author>,
    pub voices: Vec<String>,
    pub author: Option<String>,
    pub voice: Option<String>,
    pub primary_intent: Option<Intent>,
    pub secondary_intents: Vec<Intent>,
    pub loading_authors: bool,
    pub loading_voices: bool,
    pub adding_author: bool,
    pub submitting: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultViewModel {
    pub job_id: JobId,
    pub title: String,
    pub stage: Stage,
    pub status: JobStatus,
    /// Always within 0..=100.
    pub progress: u8,
    pub message: Option<String>,
    pub polling: bool,
    pub loading_result: bool,
    /// Present only once the job is done and the result was fetched.
    pub final_a: Option<String>,
    pub final_b: Option<String>,
    pub variants: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub job_id: JobId,
    pub title: String,
    pub status: JobStatus,
    pub stage: Stage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastView {
    pub id: ToastId,
    pub kind: ToastKind,
    pub message: String,
}
