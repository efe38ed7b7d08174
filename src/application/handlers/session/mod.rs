//! Session command handlers.

mod conduct_turn;
mod export_transcript;
mod session_handle;
mod start_session;

pub use conduct_turn::{
    ConductTurnCommand, ConductTurnError, ConductTurnHandler, ConductTurnResult,
};
pub use export_transcript::{ExportTranscriptHandler, ExportTranscriptResult};
pub use session_handle::SessionHandle;
pub use start_session::{StartSessionCommand, StartSessionHandler, StartSessionResult};
