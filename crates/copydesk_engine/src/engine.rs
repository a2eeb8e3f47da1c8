use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use copydesk_logging::{desk_debug, desk_error, desk_info, desk_warn};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use crate::export::export_variant;
use crate::{
    AddAuthorRequest, ApiError, ApiSettings, AuthorsResponse, PipelineApi,
    PipelineResultResponse, PipelineStartRequest, PipelineStartResponse, PipelineStatusResponse,
    ReqwestApi, ScopedTimers, TitlesRequest, TitlesResponse, VoicesResponse,
};

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub api: ApiSettings,
    pub poll_interval: Duration,
    pub export_dir: PathBuf,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            poll_interval: Duration::from_millis(1200),
            export_dir: PathBuf::from("output"),
        }
    }
}

/// Work the engine performs on behalf of the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    GenerateTitles(TitlesRequest),
    ListAuthors,
    AddAuthor(AddAuthorRequest),
    ListVoices { author: String },
    StartPipeline(PipelineStartRequest),
    /// `generation` is opaque to the engine and echoed on the matching event.
    FetchStatus { job_id: String, generation: u64 },
    FetchResult { job_id: String, generation: u64 },
    /// Emit [`EngineEvent::PollDue`] for `job_id` every poll interval until stopped.
    StartPolling { job_id: String },
    StopPolling { job_id: String },
    /// Emit [`EngineEvent::DismissDue`] once `after` has elapsed unless cancelled.
    ScheduleDismiss { toast_id: u64, after: Duration },
    CancelDismiss { toast_id: u64 },
    ExportVariant {
        job_id: String,
        variant: String,
        content: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    TitlesGenerated(Result<TitlesResponse, ApiError>),
    AuthorsLoaded(Result<AuthorsResponse, ApiError>),
    AuthorAdded {
        name: String,
        result: Result<AuthorsResponse, ApiError>,
    },
    VoicesLoaded {
        author: String,
        result: Result<VoicesResponse, ApiError>,
    },
    PipelineStarted {
        title: String,
        result: Result<PipelineStartResponse, ApiError>,
    },
    StatusFetched {
        job_id: String,
        generation: u64,
        result: Result<PipelineStatusResponse, ApiError>,
    },
    ResultFetched {
        job_id: String,
        generation: u64,
        result: Result<PipelineResultResponse, ApiError>,
    },
    PollDue { job_id: String },
    DismissDue { toast_id: u64 },
    VariantExported {
        job_id: String,
        variant: String,
        result: Result<PathBuf, String>,
    },
}

/// Receiver of engine events; called from the engine thread.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Owns the engine thread. All I/O and timers run as tasks on one
/// current-thread tokio runtime; dropping the handle stops it and cancels
/// every armed timer.
pub struct EngineHandle {
    cmd_tx: Option<mpsc::UnboundedSender<EngineCommand>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    /// Starts an engine talking to the real service over HTTP.
    pub fn new(settings: EngineSettings, sink: Arc<dyn EventSink>) -> Result<Self, ApiError> {
        let api = ReqwestApi::new(settings.api.clone())?;
        Ok(Self::with_api(settings, Arc::new(api), sink))
    }

    pub fn with_api(
        settings: EngineSettings,
        api: Arc<dyn PipelineApi>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let worker = thread::Builder::new()
            .name("copydesk-engine".to_string())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(err) => {
                        desk_error!("failed to start engine runtime: {}", err);
                        return;
                    }
                };
                runtime.block_on(run(settings, api, sink, cmd_rx));
                desk_debug!("engine loop finished");
            });

        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(err) => {
                desk_error!("failed to spawn engine thread: {}", err);
                None
            }
        };

        Self {
            cmd_tx: Some(cmd_tx),
            worker,
        }
    }

    pub fn submit(&self, command: EngineCommand) {
        let Some(tx) = self.cmd_tx.as_ref() else {
            return;
        };
        if tx.send(command).is_err() {
            desk_warn!("engine is not running; command dropped");
        }
    }

    /// Stops the engine and waits for its thread to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.cmd_tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                desk_error!("engine thread panicked");
            }
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run(
    settings: EngineSettings,
    api: Arc<dyn PipelineApi>,
    sink: Arc<dyn EventSink>,
    mut cmd_rx: mpsc::UnboundedReceiver<EngineCommand>,
) {
    let mut poll_timers: ScopedTimers<String> = ScopedTimers::new();
    let mut toast_timers: ScopedTimers<u64> = ScopedTimers::new();
    desk_info!(
        "engine started (poll interval {:?}, export dir {:?})",
        settings.poll_interval,
        settings.export_dir
    );

    while let Some(command) = cmd_rx.recv().await {
        match command {
            EngineCommand::StartPolling { job_id } => {
                desk_debug!("arming poll timer for job {}", job_id);
                let sink = sink.clone();
                let interval = settings.poll_interval;
                let key = job_id.clone();
                poll_timers.arm(key, move |token| async move {
                    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
                    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    loop {
                        tokio::select! {
                            _ = token.cancelled() => break,
                            _ = ticker.tick() => sink.emit(EngineEvent::PollDue {
                                job_id: job_id.clone(),
                            }),
                        }
                    }
                });
            }
            EngineCommand::StopPolling { job_id } => {
                if poll_timers.disarm(&job_id) {
                    desk_debug!("disarmed poll timer for job {}", job_id);
                }
            }
            EngineCommand::ScheduleDismiss { toast_id, after } => {
                let sink = sink.clone();
                toast_timers.arm(toast_id, move |token| async move {
                    tokio::select! {
                        _ = token.cancelled() => {}
                        _ = tokio::time::sleep(after) => {
                            sink.emit(EngineEvent::DismissDue { toast_id })
                        }
                    }
                });
            }
            EngineCommand::CancelDismiss { toast_id } => {
                toast_timers.disarm(&toast_id);
            }
            EngineCommand::ExportVariant {
                job_id,
                variant,
                content,
            } => {
                let sink = sink.clone();
                let dir = settings.export_dir.clone();
                tokio::spawn(async move {
                    let outcome = {
                        let (job_id, variant) = (job_id.clone(), variant.clone());
                        tokio::task::spawn_blocking(move || {
                            export_variant(&dir, &job_id, &variant, &content)
                        })
                        .await
                    };
                    let result = match outcome {
                        Ok(Ok(path)) => Ok(path),
                        Ok(Err(err)) => Err(err.to_string()),
                        Err(err) => Err(format!("export task failed: {err}")),
                    };
                    sink.emit(EngineEvent::VariantExported {
                        job_id,
                        variant,
                        result,
                    });
                });
            }
            request => {
                let api = api.clone();
                let sink = sink.clone();
                tokio::spawn(async move {
                    if let Some(event) = perform(api.as_ref(), request).await {
                        sink.emit(event);
                    }
                });
            }
        }
    }

    // Channel closed: dropping the registries cancels every timer.
    poll_timers.clear();
    toast_timers.clear();
}

async fn perform(api: &dyn PipelineApi, request: EngineCommand) -> Option<EngineEvent> {
    let event = match request {
        EngineCommand::GenerateTitles(request) => {
            EngineEvent::TitlesGenerated(api.generate_titles(&request).await)
        }
        EngineCommand::ListAuthors => EngineEvent::AuthorsLoaded(api.list_authors().await),
        EngineCommand::AddAuthor(request) => {
            let result = api.add_author(&request).await;
            EngineEvent::AuthorAdded {
                name: request.name,
                result,
            }
        }
        EngineCommand::ListVoices { author } => {
            let result = api.list_voices(&author).await;
            EngineEvent::VoicesLoaded { author, result }
        }
        EngineCommand::StartPipeline(request) => {
            let result = api.start_pipeline(&request).await;
            if let Ok(started) = &result {
                desk_info!("pipeline job {} started for {:?}", started.job_id, request.title);
            }
            EngineEvent::PipelineStarted {
                title: request.title,
                result,
            }
        }
        EngineCommand::FetchStatus { job_id, generation } => {
            let result = api.pipeline_status(&job_id).await;
            EngineEvent::StatusFetched {
                job_id,
                generation,
                result,
            }
        }
        EngineCommand::FetchResult { job_id, generation } => {
            let result = api.pipeline_result(&job_id).await;
            EngineEvent::ResultFetched {
                job_id,
                generation,
                result,
            }
        }
        EngineCommand::StartPolling { .. }
        | EngineCommand::StopPolling { .. }
        | EngineCommand::ScheduleDismiss { .. }
        | EngineCommand::CancelDismiss { .. }
        | EngineCommand::ExportVariant { .. } => return None,
    };
    Some(event)
}
