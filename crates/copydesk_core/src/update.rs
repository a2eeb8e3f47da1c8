use crate::poll::{ResultView, StatusOutcome};
use crate::state::StructureStep;
use crate::{
    is_title_valid, normalize_secondary_intents, parse_keywords, sanitize_title, AppState, Effect,
    Job, JobPatch, JobStatus, Msg, PipelineRequest, Route, Stage, ToastKind, ValidationError,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Navigate(route) => navigate(&mut state, route),
        Msg::JobSelected { job_id } => navigate(&mut state, Route::result(job_id)),

        Msg::KeywordsChanged(text) => {
            state.titles.keywords = text;
            state.mark_dirty();
            Vec::new()
        }
        Msg::GenerateTitlesClicked => {
            if state.titles.loading {
                return (state, Vec::new());
            }
            let keywords = parse_keywords(&state.titles.keywords);
            if keywords.is_empty() {
                vec![state.notify(ToastKind::Info, ValidationError::EmptyKeywords.to_string())]
            } else {
                state.titles.loading = true;
                state.mark_dirty();
                vec![Effect::GenerateTitles { keywords }]
            }
        }
        Msg::TitlesGenerated(result) => {
            state.titles.loading = false;
            match result {
                Ok(quadrants) => {
                    state.titles.quadrants = quadrants;
                    vec![state.notify(ToastKind::Success, "titles generated, pick one to continue")]
                }
                Err(message) => vec![state.notify(ToastKind::Error, message)],
            }
        }
        Msg::TitleCandidateSelected { quadrant, index } => {
            if let Some(candidate) = state.titles.quadrants.get(quadrant).get(index).cloned() {
                state.titles.selected_title = candidate;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::TitleEdited(title) => {
            state.titles.selected_title = title;
            state.mark_dirty();
            Vec::new()
        }
        Msg::TitleNextClicked => {
            let clean = sanitize_title(&state.titles.selected_title);
            if is_title_valid(&clean) {
                navigate(&mut state, Route::structure(clean))
            } else {
                vec![state.notify(ToastKind::Error, ValidationError::InvalidTitle.to_string())]
            }
        }

        Msg::ReloadAuthorsClicked => load_authors(&mut state),
        Msg::AuthorsLoaded(result) => {
            state.structure.loading_authors = false;
            state.mark_dirty();
            match result {
                Ok(authors) => {
                    state.structure.authors = authors;
                    Vec::new()
                }
                Err(message) => vec![state.notify(ToastKind::Error, message)],
            }
        }
        Msg::AuthorSelected(name) => select_author(&mut state, &name),
        Msg::VoicesLoaded { author, result } => {
            if state.structure.author.as_deref() != Some(author.as_str()) {
                // Stale response for an author that is no longer selected.
                return (state, Vec::new());
            }
            state.structure.loading_voices = false;
            state.mark_dirty();
            match result {
                Ok(voices) => {
                    if state.structure.voice.is_none() {
                        state.structure.voice = voices.first().cloned();
                    }
                    state.structure.voices = voices;
                    Vec::new()
                }
                Err(message) => vec![state.notify(ToastKind::Error, message)],
            }
        }
        Msg::VoiceSelected(voice) => {
            let voice = voice.trim();
            state.structure.voice = (!voice.is_empty()).then(|| voice.to_string());
            state.mark_dirty();
            Vec::new()
        }
        Msg::AddAuthorSubmitted { name, description } => {
            let name = name.trim().to_string();
            if name.is_empty() {
                vec![state.notify(ToastKind::Info, ValidationError::EmptyAuthorName.to_string())]
            } else {
                state.structure.adding_author = true;
                state.mark_dirty();
                let description = description
                    .map(|d| d.trim().to_string())
                    .filter(|d| !d.is_empty());
                vec![Effect::AddAuthor { name, description }]
            }
        }
        Msg::AuthorAdded { name, result } => {
            state.structure.adding_author = false;
            match result {
                Ok(authors) => {
                    state.structure.authors = authors;
                    let mut effects = vec![state.notify(ToastKind::Success, "author added")];
                    effects.extend(select_author(&mut state, &name));
                    effects
                }
                Err(message) => vec![state.notify(ToastKind::Error, message)],
            }
        }
        Msg::PrimaryIntentSelected(intent) => {
            state.structure.primary = Some(intent);
            state.mark_dirty();
            Vec::new()
        }
        Msg::SecondaryIntentToggled(intent) => {
            let secondary = &mut state.structure.secondary;
            if let Some(pos) = secondary.iter().position(|i| *i == intent) {
                secondary.remove(pos);
            } else {
                secondary.push(intent);
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::SubmitClicked => submit(&mut state),
        Msg::PipelineStarted {
            title,
            created_at,
            result,
        } => {
            state.structure.submitting = false;
            match result {
                Ok(job_id) => {
                    state.jobs.add_job(Job {
                        job_id: job_id.clone(),
                        title,
                        created_at,
                        status: JobStatus::Pending,
                        stage: Stage::Init,
                        progress: Some(5.0),
                    });
                    let mut effects = vec![state.notify(ToastKind::Success, "job started")];
                    effects.extend(navigate(&mut state, Route::result(job_id)));
                    effects
                }
                Err(message) => vec![state.notify(ToastKind::Error, message)],
            }
        }
        Msg::BackToTitlesClicked => {
            let title = state.structure.title.clone();
            navigate(
                &mut state,
                Route::Titles {
                    title: (!title.is_empty()).then_some(title),
                },
            )
        }

        Msg::PollTick { job_id } => match state.result.as_mut() {
            Some(view) if view.job_id() == job_id => view.on_tick(),
            _ => Vec::new(),
        },
        Msg::StatusReceived {
            job_id,
            generation,
            result,
        } => status_received(&mut state, &job_id, generation, result),
        Msg::ResultReceived {
            job_id,
            generation,
            result,
        } => {
            let Some(view) = state
                .result
                .as_mut()
                .filter(|v| v.answers(&job_id, generation))
            else {
                return (state, Vec::new());
            };
            match result {
                Ok(result) => {
                    view.on_result(Some(result));
                    vec![state.notify(ToastKind::Success, "final copy is ready")]
                }
                Err(message) => {
                    view.on_result(None);
                    vec![state.notify(ToastKind::Error, message)]
                }
            }
        }
        Msg::PollingToggled => match state.result.as_mut() {
            Some(view) => {
                let effects = view.toggle_polling();
                state.mark_dirty();
                effects
            }
            None => Vec::new(),
        },
        Msg::RefreshResultClicked => match state.result.as_mut() {
            Some(view) => {
                let effects = view.refresh_result();
                state.mark_dirty();
                effects
            }
            None => Vec::new(),
        },
        Msg::ReconfigureClicked => reconfigure(&mut state),
        Msg::DownloadClicked(variant) => {
            let found = state
                .result
                .as_ref()
                .filter(|v| v.status() == JobStatus::Done)
                .and_then(|v| v.result())
                .map(|r| (r.job_id.clone(), r.content(variant).to_string()));
            match found {
                Some((job_id, content)) => {
                    state.pending_exports += 1;
                    state.mark_dirty();
                    vec![Effect::SaveVariant {
                        job_id,
                        variant,
                        content,
                    }]
                }
                None => vec![state.notify(ToastKind::Info, "result is not available yet")],
            }
        }
        Msg::VariantSaved { variant, result } => {
            state.pending_exports = state.pending_exports.saturating_sub(1);
            match result {
                Ok(path) => vec![state.notify(
                    ToastKind::Success,
                    format!("variant {} saved to {path}", variant.letter()),
                )],
                Err(message) => vec![state.notify(ToastKind::Error, message)],
            }
        }

        Msg::ToastDismissed(id) => {
            let sticky = state.toasts.get(id).map(|t| t.sticky);
            state.toasts.dismiss(id);
            match sticky {
                Some(false) => {
                    state.mark_dirty();
                    vec![Effect::CancelToastDismiss { id }]
                }
                Some(true) => {
                    state.mark_dirty();
                    Vec::new()
                }
                None => Vec::new(),
            }
        }
        Msg::ToastExpired(id) => {
            if state.toasts.dismiss(id) {
                state.mark_dirty();
            }
            Vec::new()
        }
    };

    (state, effects)
}

/// Switches location. Leaving (or switching) the result view always disarms
/// its timer before the new view is set up.
fn navigate(state: &mut AppState, route: Route) -> Vec<Effect> {
    let mut effects = Vec::new();
    let keep_view = match (&state.result, &route) {
        (Some(view), Route::Result { job_id }) => view.job_id() == job_id.as_str(),
        _ => false,
    };
    if !keep_view {
        if let Some(mut view) = state.result.take() {
            effects.extend(view.close());
        }
    }

    let route = match route {
        Route::Titles { title } => {
            if let Some(title) = &title {
                state.titles.selected_title = title.clone();
            }
            Route::Titles { title }
        }
        Route::Structure { title } => {
            let title = sanitize_title(&title);
            let authors = std::mem::take(&mut state.structure.authors);
            state.structure = StructureStep {
                title: title.clone(),
                authors,
                ..StructureStep::default()
            };
            if is_title_valid(&title) {
                effects.extend(load_authors(state));
            }
            Route::Structure { title }
        }
        Route::Result { job_id } => {
            if !keep_view {
                let known = state.jobs.get(&job_id).and_then(|job| job.progress);
                state.view_generation += 1;
                let (view, opened) =
                    ResultView::open(job_id.clone(), state.view_generation, known);
                state.result = Some(view);
                effects.extend(opened);
            }
            Route::Result { job_id }
        }
    };

    state.route = route;
    state.mark_dirty();
    effects
}

fn load_authors(state: &mut AppState) -> Vec<Effect> {
    if state.structure.loading_authors {
        return Vec::new();
    }
    state.structure.loading_authors = true;
    state.mark_dirty();
    vec![Effect::LoadAuthors]
}

fn select_author(state: &mut AppState, name: &str) -> Vec<Effect> {
    let name = name.trim();
    state.structure.voices.clear();
    state.structure.voice = None;
    state.mark_dirty();
    if name.is_empty() {
        state.structure.author = None;
        state.structure.loading_voices = false;
        return Vec::new();
    }
    state.structure.author = Some(name.to_string());
    state.structure.loading_voices = true;
    vec![Effect::LoadVoices {
        author: name.to_string(),
    }]
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    if state.structure.submitting {
        return Vec::new();
    }
    let step = &state.structure;
    let request = if !is_title_valid(&step.title) {
        Err(ValidationError::InvalidTitle)
    } else {
        match (&step.author, &step.voice, step.primary) {
            (None, _, _) => Err(ValidationError::MissingAuthor),
            (_, None, _) => Err(ValidationError::MissingVoice),
            (_, _, None) => Err(ValidationError::MissingPrimaryIntent),
            (Some(author), Some(voice), Some(primary)) => Ok(PipelineRequest {
                title: step.title.clone(),
                author: author.clone(),
                voice: voice.clone(),
                primary_intent: primary,
                secondary_intents: normalize_secondary_intents(primary, &step.secondary),
            }),
        }
    };

    match request {
        Ok(request) => {
            state.structure.submitting = true;
            state.mark_dirty();
            vec![Effect::StartPipeline(request)]
        }
        Err(err) => vec![state.notify(ToastKind::Info, err.to_string())],
    }
}

fn status_received(
    state: &mut AppState,
    job_id: &str,
    generation: u64,
    result: Result<crate::StatusSnapshot, String>,
) -> Vec<Effect> {
    match result {
        Ok(snapshot) => {
            // The server is authoritative even for views that were already closed.
            state.jobs.update_job(
                job_id,
                JobPatch {
                    status: Some(snapshot.status),
                    stage: Some(snapshot.stage),
                    progress: snapshot.progress.map(crate::clamp_progress),
                },
            );
            state.mark_dirty();
            let Some(view) = state
                .result
                .as_mut()
                .filter(|v| v.answers(job_id, generation))
            else {
                return Vec::new();
            };
            let (outcome, effects) = view.on_status(snapshot);
            if let StatusOutcome::Failed { message } = outcome {
                let message = message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "generation failed".to_string());
                state.notify_sticky(ToastKind::Error, message);
            }
            effects
        }
        Err(message) => match state
            .result
            .as_mut()
            .filter(|v| v.answers(job_id, generation))
        {
            Some(view) => {
                view.on_status_error();
                vec![state.notify(ToastKind::Error, message)]
            }
            None => Vec::new(),
        },
    }
}

fn reconfigure(state: &mut AppState) -> Vec<Effect> {
    let Some(view) = state.result.as_ref() else {
        return Vec::new();
    };
    let title = view
        .result()
        .map(|r| r.title.clone())
        .or_else(|| state.jobs.get(view.job_id()).map(|j| j.title.clone()))
        .unwrap_or_default();
    if title.trim().is_empty() {
        return vec![state.notify(ToastKind::Info, "missing title, cannot reconfigure")];
    }
    navigate(state, Route::structure(title))
}
