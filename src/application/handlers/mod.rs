//! Command handlers.

pub mod session;

pub use session::{
    ConductTurnCommand, ConductTurnError, ConductTurnHandler, ConductTurnResult,
    ExportTranscriptHandler, ExportTranscriptResult, SessionHandle, StartSessionCommand,
    StartSessionHandler, StartSessionResult,
};
