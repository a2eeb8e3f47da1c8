use std::sync::{mpsc, Arc, Mutex};

use chrono::Utc;
use copydesk_core::{
    Author, Effect, JobStatus, Msg, PipelineResult, QuadrantTitles, Stage, StatusSnapshot,
    Variant,
};
use copydesk_engine::{
    AddAuthorRequest, ApiError, AuthorDto, EngineCommand, EngineEvent, EngineHandle,
    EngineSettings, EventSink, PipelineStage, PipelineStartRequest, PipelineState,
    PipelineStatusResponse, TitlesRequest,
};
use copydesk_logging::{desk_debug, desk_warn};

/// Executes core effects on the engine and feeds engine events back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: EngineSettings, msg_tx: mpsc::Sender<Msg>) -> Result<Self, ApiError> {
        let sink = Arc::new(MsgSink::new(msg_tx));
        let engine = EngineHandle::new(settings, sink)?;
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            desk_debug!("effect {:?}", effect);
            self.engine.submit(to_command(effect));
        }
    }

    pub fn shutdown(self) {
        self.engine.shutdown();
    }
}

fn to_command(effect: Effect) -> EngineCommand {
    match effect {
        Effect::GenerateTitles { keywords } => {
            EngineCommand::GenerateTitles(TitlesRequest { keywords })
        }
        Effect::LoadAuthors => EngineCommand::ListAuthors,
        Effect::AddAuthor { name, description } => EngineCommand::AddAuthor(AddAuthorRequest {
            name,
            description,
            voices: None,
        }),
        Effect::LoadVoices { author } => EngineCommand::ListVoices { author },
        Effect::StartPipeline(request) => EngineCommand::StartPipeline(PipelineStartRequest {
            title: request.title,
            author: request.author,
            voice: request.voice,
            primary_intent: request.primary_intent.key().to_string(),
            secondary_intents: request
                .secondary_intents
                .iter()
                .map(|intent| intent.key().to_string())
                .collect(),
        }),
        Effect::FetchStatus { job_id, generation } => {
            EngineCommand::FetchStatus { job_id, generation }
        }
        Effect::FetchResult { job_id, generation } => {
            EngineCommand::FetchResult { job_id, generation }
        }
        Effect::StartPolling { job_id } => EngineCommand::StartPolling { job_id },
        Effect::StopPolling { job_id } => EngineCommand::StopPolling { job_id },
        Effect::ScheduleToastDismiss { id, after } => EngineCommand::ScheduleDismiss {
            toast_id: id,
            after,
        },
        Effect::CancelToastDismiss { id } => EngineCommand::CancelDismiss { toast_id: id },
        Effect::SaveVariant {
            job_id,
            variant,
            content,
        } => EngineCommand::ExportVariant {
            job_id,
            variant: variant.letter().to_string(),
            content,
        },
    }
}

/// Forwards engine events into the front-end message queue.
struct MsgSink {
    tx: Mutex<mpsc::Sender<Msg>>,
}

impl MsgSink {
    fn new(tx: mpsc::Sender<Msg>) -> Self {
        Self { tx: Mutex::new(tx) }
    }
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let msg = to_msg(event);
        let Ok(tx) = self.tx.lock() else {
            return;
        };
        if tx.send(msg).is_err() {
            desk_debug!("front-end gone; engine event dropped");
        }
    }
}

fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::TitlesGenerated(result) => Msg::TitlesGenerated(
            result
                .map(|response| {
                    let q = response.quadrants;
                    QuadrantTitles {
                        behavior: q.behavior,
                        emotion: q.emotion,
                        mechanism: q.mechanism,
                        philosophy: q.philosophy,
                    }
                })
                .map_err(|err| user_message("generate titles", err)),
        ),
        EngineEvent::AuthorsLoaded(result) => Msg::AuthorsLoaded(
            result
                .map(|response| map_authors(response.authors))
                .map_err(|err| user_message("list authors", err)),
        ),
        EngineEvent::AuthorAdded { name, result } => Msg::AuthorAdded {
            name,
            result: result
                .map(|response| map_authors(response.authors))
                .map_err(|err| user_message("add author", err)),
        },
        EngineEvent::VoicesLoaded { author, result } => Msg::VoicesLoaded {
            author,
            result: result
                .map(|response| response.voices)
                .map_err(|err| user_message("list voices", err)),
        },
        EngineEvent::PipelineStarted { title, result } => Msg::PipelineStarted {
            title,
            created_at: Utc::now(),
            result: result
                .map(|response| response.job_id)
                .map_err(|err| user_message("start pipeline", err)),
        },
        EngineEvent::StatusFetched {
            job_id,
            generation,
            result,
        } => Msg::StatusReceived {
            job_id,
            generation,
            result: result
                .map(map_status)
                .map_err(|err| user_message("pipeline status", err)),
        },
        EngineEvent::ResultFetched {
            job_id,
            generation,
            result,
        } => Msg::ResultReceived {
            job_id,
            generation,
            result: result
                .map(|response| PipelineResult {
                    job_id: response.job_id,
                    title: response.title,
                    final_a: response.final_a,
                    final_b: response.final_b,
                    variants: response.variants,
                })
                .map_err(|err| user_message("pipeline result", err)),
        },
        EngineEvent::PollDue { job_id } => Msg::PollTick { job_id },
        EngineEvent::DismissDue { toast_id } => Msg::ToastExpired(toast_id),
        EngineEvent::VariantExported {
            job_id,
            variant,
            result,
        } => {
            if let Err(err) = &result {
                desk_warn!("export of job {} variant {} failed: {}", job_id, variant, err);
            }
            Msg::VariantSaved {
                variant: map_variant(&variant),
                result: result.map(|path| path.display().to_string()),
            }
        }
    }
}

fn user_message(operation: &str, err: ApiError) -> String {
    desk_warn!("{} failed: {}", operation, err);
    err.user_message()
}

fn map_authors(authors: Vec<AuthorDto>) -> Vec<Author> {
    authors
        .into_iter()
        .map(|dto| Author {
            name: dto.name,
            description: dto.description,
            voices: dto.voices,
        })
        .collect()
}

fn map_status(response: PipelineStatusResponse) -> StatusSnapshot {
    StatusSnapshot {
        job_id: response.job_id,
        stage: map_stage(response.stage),
        status: map_state(response.status),
        progress: response.progress,
        message: response.message,
    }
}

fn map_stage(stage: PipelineStage) -> Stage {
    match stage {
        PipelineStage::Init => Stage::Init,
        PipelineStage::P1 => Stage::P1,
        PipelineStage::P2 => Stage::P2,
        PipelineStage::P3 => Stage::P3,
        PipelineStage::P4 => Stage::P4,
        PipelineStage::Done => Stage::Done,
        PipelineStage::Error => Stage::Error,
    }
}

fn map_state(state: PipelineState) -> JobStatus {
    match state {
        PipelineState::Pending => JobStatus::Pending,
        PipelineState::Running => JobStatus::Running,
        PipelineState::Done => JobStatus::Done,
        PipelineState::Error => JobStatus::Error,
    }
}

fn map_variant(letter: &str) -> Variant {
    if letter.eq_ignore_ascii_case("b") {
        Variant::B
    } else {
        Variant::A
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copydesk_core::{Intent, PipelineRequest};
    use copydesk_engine::{PipelineStartResponse, TIMEOUT_MESSAGE};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn start_request_uses_intent_keys() {
        let command = to_command(Effect::StartPipeline(PipelineRequest {
            title: "焦虑与睡眠".to_string(),
            author: "张三".to_string(),
            voice: "温和".to_string(),
            primary_intent: Intent::Howto,
            secondary_intents: vec![Intent::Decision, Intent::Mechanism],
        }));

        assert_eq!(
            command,
            EngineCommand::StartPipeline(PipelineStartRequest {
                title: "焦虑与睡眠".to_string(),
                author: "张三".to_string(),
                voice: "温和".to_string(),
                primary_intent: "howto".to_string(),
                secondary_intents: vec!["decision".to_string(), "mechanism".to_string()],
            })
        );
    }

    #[test]
    fn timer_effects_map_onto_engine_timers() {
        assert_eq!(
            to_command(Effect::ScheduleToastDismiss {
                id: 3,
                after: Duration::from_millis(4200)
            }),
            EngineCommand::ScheduleDismiss {
                toast_id: 3,
                after: Duration::from_millis(4200)
            }
        );
        assert_eq!(
            to_command(Effect::StopPolling {
                job_id: "job-1".to_string()
            }),
            EngineCommand::StopPolling {
                job_id: "job-1".to_string()
            }
        );
        assert_eq!(
            to_command(Effect::SaveVariant {
                job_id: "job-1".to_string(),
                variant: Variant::B,
                content: "b".to_string(),
            }),
            EngineCommand::ExportVariant {
                job_id: "job-1".to_string(),
                variant: "B".to_string(),
                content: "b".to_string(),
            }
        );
    }

    #[test]
    fn status_events_become_snapshots() {
        let msg = to_msg(EngineEvent::StatusFetched {
            job_id: "job-1".to_string(),
            generation: 2,
            result: Ok(PipelineStatusResponse {
                job_id: "job-1".to_string(),
                stage: PipelineStage::P4,
                status: PipelineState::Running,
                progress: Some(80.0),
                message: None,
            }),
        });

        assert_eq!(
            msg,
            Msg::StatusReceived {
                job_id: "job-1".to_string(),
                generation: 2,
                result: Ok(StatusSnapshot {
                    job_id: "job-1".to_string(),
                    stage: Stage::P4,
                    status: JobStatus::Running,
                    progress: Some(80.0),
                    message: None,
                }),
            }
        );
    }

    #[test]
    fn errors_cross_as_user_messages() {
        let msg = to_msg(EngineEvent::PipelineStarted {
            title: "t".to_string(),
            result: Err(ApiError::Timeout("deadline".to_string())),
        });
        match msg {
            Msg::PipelineStarted { title, result, .. } => {
                assert_eq!(title, "t");
                assert_eq!(result, Err(TIMEOUT_MESSAGE.to_string()));
            }
            other => panic!("unexpected msg {other:?}"),
        }

        let msg = to_msg(EngineEvent::PipelineStarted {
            title: "t".to_string(),
            result: Ok(PipelineStartResponse {
                job_id: "job-7".to_string(),
            }),
        });
        assert!(matches!(msg, Msg::PipelineStarted { result: Ok(id), .. } if id == "job-7"));
    }

    #[test]
    fn engine_timers_become_ticks_and_expiries() {
        assert_eq!(
            to_msg(EngineEvent::PollDue {
                job_id: "job-1".to_string()
            }),
            Msg::PollTick {
                job_id: "job-1".to_string()
            }
        );
        assert_eq!(to_msg(EngineEvent::DismissDue { toast_id: 9 }), Msg::ToastExpired(9));
    }

    #[test]
    fn exported_paths_are_reported_by_variant() {
        let msg = to_msg(EngineEvent::VariantExported {
            job_id: "job-1".to_string(),
            variant: "B".to_string(),
            result: Ok(PathBuf::from("output/job-1_final_B.md")),
        });
        assert_eq!(
            msg,
            Msg::VariantSaved {
                variant: Variant::B,
                result: Ok(PathBuf::from("output/job-1_final_B.md").display().to_string()),
            }
        );
    }
}
