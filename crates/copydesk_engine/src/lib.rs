//! Copydesk engine: pipeline service client, timers and effect execution.
mod api;
mod engine;
mod error;
mod export;
mod filename;
mod persist;
mod timers;
mod wire;

pub use api::{ApiSettings, PipelineApi, ReqwestApi};
pub use engine::{EngineCommand, EngineEvent, EngineHandle, EngineSettings, EventSink};
pub use error::{ApiError, GENERIC_SERVER_MESSAGE, NETWORK_MESSAGE, TIMEOUT_MESSAGE};
pub use export::export_variant;
pub use filename::variant_filename;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use timers::ScopedTimers;
pub use wire::{
    AddAuthorRequest, AuthorDto, AuthorsResponse, PipelineResultResponse, PipelineStage,
    PipelineStartRequest, PipelineStartResponse, PipelineState, PipelineStatusResponse,
    Quadrants, TitlesRequest, TitlesResponse, VoicesResponse,
};
