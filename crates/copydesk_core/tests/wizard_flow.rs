use chrono::Utc;
use copydesk_core::{
    update, AppState, Author, Effect, Intent, Msg, PipelineRequest, Quadrant, QuadrantTitles,
    Route, ToastKind, MAX_TITLE_LENGTH,
};
use pretty_assertions::assert_eq;

fn run(state: AppState, msgs: Vec<Msg>) -> (AppState, Vec<Effect>) {
    let mut state = state;
    let mut all = Vec::new();
    for msg in msgs {
        let (next, effects) = update(state, msg);
        state = next;
        all.extend(effects);
    }
    (state, all)
}

fn quadrants() -> QuadrantTitles {
    QuadrantTitles {
        behavior: vec!["睡前十分钟，焦虑就会少一半".to_string()],
        emotion: vec!["你不是失眠，是太累了".to_string()],
        mechanism: vec!["焦虑如何偷走你的深度睡眠".to_string()],
        philosophy: vec!["允许自己睡不着".to_string(), "夜晚属于你".to_string()],
    }
}

fn authors() -> Vec<Author> {
    vec![Author {
        name: "张三".to_string(),
        description: None,
        voices: vec!["温和".to_string(), "犀利".to_string()],
    }]
}

fn non_toast(effects: &[Effect]) -> Vec<Effect> {
    effects
        .iter()
        .filter(|e| !matches!(e, Effect::ScheduleToastDismiss { .. }))
        .cloned()
        .collect()
}

fn last_toast(state: &AppState) -> (ToastKind, String) {
    let toast = state.toasts().toasts().last().expect("toast");
    (toast.kind, toast.message.clone())
}

#[test]
fn keywords_generate_four_quadrants_and_selection_is_verbatim() {
    let (state, effects) = run(
        AppState::new(),
        vec![
            Msg::KeywordsChanged("焦虑\n睡眠\n".to_string()),
            Msg::GenerateTitlesClicked,
        ],
    );
    assert_eq!(
        effects,
        vec![Effect::GenerateTitles {
            keywords: vec!["焦虑".to_string(), "睡眠".to_string()],
        }]
    );
    assert!(state.view().titles.loading);

    let (state, _) = update(state, Msg::TitlesGenerated(Ok(quadrants())));
    let view = state.view();
    assert!(!view.titles.loading);
    for quadrant in Quadrant::ALL {
        assert!(!view.titles.quadrants.get(quadrant).is_empty());
    }

    let (state, _) = update(
        state,
        Msg::TitleCandidateSelected {
            quadrant: Quadrant::Philosophy,
            index: 1,
        },
    );
    assert_eq!(state.view().titles.selected_title, "夜晚属于你");

    // Out-of-range selection leaves the title alone.
    let (state, _) = update(
        state,
        Msg::TitleCandidateSelected {
            quadrant: Quadrant::Emotion,
            index: 9,
        },
    );
    assert_eq!(state.view().titles.selected_title, "夜晚属于你");
}

#[test]
fn empty_keywords_are_blocked_locally() {
    let (state, effects) = run(
        AppState::new(),
        vec![
            Msg::KeywordsChanged("  \n\n".to_string()),
            Msg::GenerateTitlesClicked,
        ],
    );
    assert!(non_toast(&effects).is_empty());
    assert_eq!(last_toast(&state).0, ToastKind::Info);
}

#[test]
fn title_generation_failure_surfaces_message() {
    let (state, _) = run(
        AppState::new(),
        vec![
            Msg::KeywordsChanged("焦虑".to_string()),
            Msg::GenerateTitlesClicked,
            Msg::TitlesGenerated(Err("network error, please check your connection".to_string())),
        ],
    );
    assert!(!state.view().titles.loading);
    assert_eq!(
        last_toast(&state),
        (
            ToastKind::Error,
            "network error, please check your connection".to_string()
        )
    );
}

#[test]
fn next_sanitizes_title_and_moves_to_structure() {
    let (state, effects) = run(
        AppState::new(),
        vec![
            Msg::TitleEdited("  焦虑   与睡眠 ".to_string()),
            Msg::TitleNextClicked,
        ],
    );
    assert_eq!(state.route(), &Route::structure("焦虑 与睡眠"));
    assert_eq!(state.view().location, Route::structure("焦虑 与睡眠").to_location());
    assert_eq!(effects, vec![Effect::LoadAuthors]);
}

#[test]
fn oversized_or_blank_title_is_blocked() {
    let long = "x".repeat(MAX_TITLE_LENGTH + 1);
    for title in [long, "   ".to_string()] {
        let (state, effects) = run(
            AppState::new(),
            vec![Msg::TitleEdited(title), Msg::TitleNextClicked],
        );
        assert_eq!(state.route(), &Route::home());
        assert!(non_toast(&effects).is_empty());
        assert_eq!(last_toast(&state).0, ToastKind::Error);
    }

    let exact = "y".repeat(MAX_TITLE_LENGTH);
    let (state, _) = run(
        AppState::new(),
        vec![Msg::TitleEdited(exact.clone()), Msg::TitleNextClicked],
    );
    assert_eq!(state.route(), &Route::structure(exact));
}

#[test]
fn structure_with_invalid_title_does_not_load_authors() {
    let (state, effects) = update(AppState::new(), Msg::Navigate(Route::structure("   ")));
    assert!(effects.is_empty());
    assert!(!state.view().structure.title_valid);
}

#[test]
fn selecting_author_loads_voices_and_preselects_first() {
    let (state, _) = run(
        AppState::new(),
        vec![
            Msg::Navigate(Route::structure("焦虑与睡眠")),
            Msg::AuthorsLoaded(Ok(authors())),
        ],
    );
    let (state, effects) = update(state, Msg::AuthorSelected("张三".to_string()));
    assert_eq!(
        effects,
        vec![Effect::LoadVoices {
            author: "张三".to_string()
        }]
    );

    let (state, _) = update(
        state,
        Msg::VoicesLoaded {
            author: "张三".to_string(),
            result: Ok(vec!["温和".to_string(), "犀利".to_string()]),
        },
    );
    let view = state.view().structure;
    assert_eq!(view.voice.as_deref(), Some("温和"));
    assert_eq!(view.voices.len(), 2);
    assert!(!view.loading_voices);
}

#[test]
fn stale_voice_responses_are_ignored() {
    let (state, _) = run(
        AppState::new(),
        vec![
            Msg::Navigate(Route::structure("焦虑与睡眠")),
            Msg::AuthorSelected("张三".to_string()),
            Msg::AuthorSelected("李四".to_string()),
            Msg::VoicesLoaded {
                author: "张三".to_string(),
                result: Ok(vec!["温和".to_string()]),
            },
        ],
    );
    let view = state.view().structure;
    assert_eq!(view.author.as_deref(), Some("李四"));
    assert!(view.voices.is_empty());
    assert!(view.loading_voices);
}

#[test]
fn explicit_voice_survives_voice_load() {
    let (state, _) = run(
        AppState::new(),
        vec![
            Msg::Navigate(Route::structure("焦虑与睡眠")),
            Msg::AuthorSelected("张三".to_string()),
            Msg::VoiceSelected("犀利".to_string()),
            Msg::VoicesLoaded {
                author: "张三".to_string(),
                result: Ok(vec!["温和".to_string(), "犀利".to_string()]),
            },
        ],
    );
    assert_eq!(state.view().structure.voice.as_deref(), Some("犀利"));
}

#[test]
fn adding_author_reloads_list_and_selects_it() {
    let (state, effects) = run(
        AppState::new(),
        vec![
            Msg::Navigate(Route::structure("焦虑与睡眠")),
            Msg::AddAuthorSubmitted {
                name: " 王五 ".to_string(),
                description: Some("  ".to_string()),
            },
        ],
    );
    assert_eq!(
        effects,
        vec![
            Effect::LoadAuthors,
            Effect::AddAuthor {
                name: "王五".to_string(),
                description: None,
            },
        ]
    );

    let mut list = authors();
    list.push(Author {
        name: "王五".to_string(),
        description: None,
        voices: Vec::new(),
    });
    let (state, effects) = update(
        state,
        Msg::AuthorAdded {
            name: "王五".to_string(),
            result: Ok(list),
        },
    );
    assert_eq!(
        non_toast(&effects),
        vec![Effect::LoadVoices {
            author: "王五".to_string()
        }]
    );
    let view = state.view().structure;
    assert_eq!(view.authors.len(), 2);
    assert_eq!(view.author.as_deref(), Some("王五"));
    assert!(!view.adding_author);
}

#[test]
fn blank_author_name_is_rejected() {
    let (state, effects) = update(
        AppState::new(),
        Msg::AddAuthorSubmitted {
            name: "   ".to_string(),
            description: None,
        },
    );
    assert!(non_toast(&effects).is_empty());
    assert_eq!(last_toast(&state).0, ToastKind::Info);
}

#[test]
fn submit_requires_author_voice_and_intent() {
    let (state, _) = update(AppState::new(), Msg::Navigate(Route::structure("焦虑与睡眠")));

    let (state, effects) = update(state, Msg::SubmitClicked);
    assert!(non_toast(&effects).is_empty());
    assert_eq!(last_toast(&state).1, "select an author");

    let (state, _) = update(state, Msg::AuthorSelected("张三".to_string()));
    let (state, effects) = update(state, Msg::SubmitClicked);
    assert!(non_toast(&effects).is_empty());
    assert_eq!(last_toast(&state).1, "select a voice");

    let (state, _) = update(state, Msg::VoiceSelected("温和".to_string()));
    let (state, effects) = update(state, Msg::SubmitClicked);
    assert!(non_toast(&effects).is_empty());
    assert_eq!(last_toast(&state).1, "select a primary intent");
    assert!(!state.view().structure.submitting);
}

#[test]
fn submit_sends_normalized_request_and_opens_result() {
    let (state, effects) = run(
        AppState::new(),
        vec![
            Msg::Navigate(Route::structure("焦虑与睡眠")),
            Msg::AuthorSelected("张三".to_string()),
            Msg::VoiceSelected("温和".to_string()),
            Msg::PrimaryIntentSelected(Intent::Howto),
            Msg::SecondaryIntentToggled(Intent::Howto),
            Msg::SecondaryIntentToggled(Intent::Decision),
            Msg::SecondaryIntentToggled(Intent::Mechanism),
            Msg::SecondaryIntentToggled(Intent::Mechanism),
            Msg::SubmitClicked,
        ],
    );
    let start = effects
        .iter()
        .find_map(|e| match e {
            Effect::StartPipeline(request) => Some(request.clone()),
            _ => None,
        })
        .expect("start effect");
    assert_eq!(
        start,
        PipelineRequest {
            title: "焦虑与睡眠".to_string(),
            author: "张三".to_string(),
            voice: "温和".to_string(),
            primary_intent: Intent::Howto,
            secondary_intents: vec![Intent::Decision],
        }
    );
    assert!(state.view().structure.submitting);

    // A second click while submitting is ignored.
    let (state, effects) = update(state, Msg::SubmitClicked);
    assert!(effects.is_empty());

    let (state, effects) = update(
        state,
        Msg::PipelineStarted {
            title: "焦虑与睡眠".to_string(),
            created_at: Utc::now(),
            result: Ok("job-7".to_string()),
        },
    );
    assert_eq!(state.route(), &Route::result("job-7"));
    assert_eq!(
        non_toast(&effects),
        vec![
            Effect::FetchStatus {
                job_id: "job-7".to_string(),
                generation: 1,
            },
            Effect::StartPolling {
                job_id: "job-7".to_string()
            },
        ]
    );
    let view = state.view();
    assert_eq!(view.jobs.len(), 1);
    assert_eq!(view.jobs[0].title, "焦虑与睡眠");
    assert_eq!(view.result.unwrap().progress, 5);
}

#[test]
fn failed_start_keeps_user_on_structure() {
    let (state, _) = run(
        AppState::new(),
        vec![
            Msg::Navigate(Route::structure("焦虑与睡眠")),
            Msg::PipelineStarted {
                title: "焦虑与睡眠".to_string(),
                created_at: Utc::now(),
                result: Err("the server returned an error".to_string()),
            },
        ],
    );
    assert_eq!(state.route(), &Route::structure("焦虑与睡眠"));
    assert!(state.jobs().is_empty());
    assert_eq!(last_toast(&state).0, ToastKind::Error);
}

#[test]
fn back_to_titles_keeps_title() {
    let (state, _) = run(
        AppState::new(),
        vec![
            Msg::Navigate(Route::structure("焦虑与睡眠")),
            Msg::BackToTitlesClicked,
        ],
    );
    assert_eq!(
        state.route(),
        &Route::Titles {
            title: Some("焦虑与睡眠".to_string())
        }
    );
    assert_eq!(state.view().titles.selected_title, "焦虑与睡眠");
}
