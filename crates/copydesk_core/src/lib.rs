//! Copydesk core: pure wizard state machine, client-side stores and view-model helpers.
mod effect;
mod jobs;
mod msg;
mod poll;
mod progress;
mod route;
mod state;
mod toasts;
mod types;
mod update;
mod validate;
mod view_model;

pub use effect::{Effect, PipelineRequest};
pub use jobs::{Job, JobPatch, JobStore, MAX_JOBS};
pub use msg::Msg;
pub use poll::ResultView;
pub use progress::{clamp_progress, display_progress, fallback_progress};
pub use route::Route;
pub use state::AppState;
pub use toasts::{NotificationStore, Toast, ToastKind, TOAST_AUTO_DISMISS};
pub use types::{
    Author, Intent, JobId, JobStatus, PipelineResult, Quadrant, QuadrantTitles, Stage,
    StatusSnapshot, ToastId, Variant,
};
pub use update::update;
pub use validate::{
    is_title_valid, normalize_secondary_intents, parse_keywords, sanitize_title,
    ValidationError, MAX_TITLE_LENGTH,
};
pub use view_model::{
    AppViewModel, JobRowView, ResultViewModel, StructureStepView, TitleStepView, ToastView,
};
