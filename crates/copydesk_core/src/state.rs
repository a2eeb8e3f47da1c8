use crate::poll::ResultView;
use crate::view_model::{
    AppViewModel, JobRowView, ResultViewModel, StructureStepView, TitleStepView, ToastView,
};
use crate::{
    Author, Effect, Intent, JobStore, JobStatus, NotificationStore, QuadrantTitles, Route, Stage,
    ToastKind, TOAST_AUTO_DISMISS,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct TitleStep {
    pub(crate) keywords: String,
    pub(crate) quadrants: QuadrantTitles,
    pub(crate) selected_title: String,
    pub(crate) loading: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct StructureStep {
    pub(crate) title: String,
    pub(crate) authors: Vec<Author>,
    pub(crate) voices: Vec<String>,
    pub(crate) author: Option<String>,
    pub(crate) voice: Option<String>,
    pub(crate) primary: Option<Intent>,
    pub(crate) secondary: Vec<Intent>,
    pub(crate) loading_authors: bool,
    pub(crate) loading_voices: bool,
    pub(crate) adding_author: bool,
    pub(crate) submitting: bool,
}

/// Whole-session state. The two stores are owned here and only change
/// through [`crate::update`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub(crate) route: Route,
    pub(crate) titles: TitleStep,
    pub(crate) structure: StructureStep,
    pub(crate) result: Option<ResultView>,
    /// Bumped every time a result view opens.
    pub(crate) view_generation: u64,
    pub(crate) jobs: JobStore,
    pub(crate) toasts: NotificationStore,
    pub(crate) pending_exports: usize,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn jobs(&self) -> &JobStore {
        &self.jobs
    }

    pub fn toasts(&self) -> &NotificationStore {
        &self.toasts
    }

    pub fn result_view(&self) -> Option<&ResultView> {
        self.result.as_ref()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            location: self.route.to_location(),
            route: self.route.clone(),
            titles: TitleStepView {
                keywords: self.titles.keywords.clone(),
                quadrants: self.titles.quadrants.clone(),
                selected_title: self.titles.selected_title.clone(),
                loading: self.titles.loading,
            },
            structure: StructureStepView {
                title: self.structure.title.clone(),
                title_valid: crate::is_title_valid(&self.structure.title),
                authors: self.structure.authors.clone(),
                voices: self.structure.voices.clone(),
                author: self.structure.author.clone(),
                voice: self.structure.voice.clone(),
                primary_intent: self.structure.primary,
                secondary_intents: self.structure.secondary.clone(),
                loading_authors: self.structure.loading_authors,
                loading_voices: self.structure.loading_voices,
                adding_author: self.structure.adding_author,
                submitting: self.structure.submitting,
            },
            result: self.result.as_ref().map(|view| self.result_view_model(view)),
            jobs: self
                .jobs
                .jobs()
                .iter()
                .map(|job| JobRowView {
                    job_id: job.job_id.clone(),
                    title: job.title.clone(),
                    status: job.status,
                    stage: job.stage,
                })
                .collect(),
            toasts: self
                .toasts
                .toasts()
                .iter()
                .map(|t| ToastView {
                    id: t.id,
                    kind: t.kind,
                    message: t.message.clone(),
                })
                .collect(),
            pending_exports: self.pending_exports,
            dirty: self.dirty,
        }
    }

    fn result_view_model(&self, view: &ResultView) -> ResultViewModel {
        let job = self.jobs.get(view.job_id());
        let status = view
            .snapshot()
            .map(|s| s.status)
            .or(job.map(|j| j.status))
            .unwrap_or(JobStatus::Pending);
        let stage = view
            .stage()
            .or(job.map(|j| j.stage))
            .unwrap_or(Stage::Init);
        let title = view
            .result()
            .map(|r| r.title.clone())
            .or_else(|| job.map(|j| j.title.clone()))
            .unwrap_or_default();
        let finals = match (view.result(), status) {
            (Some(result), JobStatus::Done) => {
                Some((result.final_a.clone(), result.final_b.clone()))
            }
            _ => None,
        };
        ResultViewModel {
            job_id: view.job_id().to_string(),
            title,
            stage,
            status,
            progress: view.progress(),
            message: view.message().map(ToOwned::to_owned),
            polling: view.is_polling(),
            loading_result: view.is_loading_result(),
            final_a: finals.as_ref().map(|(a, _)| a.clone()),
            final_b: finals.map(|(_, b)| b),
            variants: view.result().and_then(|r| r.variants.clone()),
        }
    }

    /// Returns whether the state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Pushes a transient toast and returns the effect that expires it.
    pub(crate) fn notify(&mut self, kind: ToastKind, message: impl Into<String>) -> Effect {
        let id = self.toasts.push(kind, message);
        self.mark_dirty();
        Effect::ScheduleToastDismiss {
            id,
            after: TOAST_AUTO_DISMISS,
        }
    }

    /// Pushes a toast that stays until the user dismisses it.
    pub(crate) fn notify_sticky(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.toasts.push_sticky(kind, message);
        self.mark_dirty();
    }
}
