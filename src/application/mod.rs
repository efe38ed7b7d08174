//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Handlers own no session state; each turn is driven through an explicit
//! [`SessionHandle`].

pub mod handlers;

pub use handlers::{
    ConductTurnCommand, ConductTurnError, ConductTurnHandler, ConductTurnResult,
    ExportTranscriptHandler, ExportTranscriptResult, SessionHandle, StartSessionCommand,
    StartSessionHandler, StartSessionResult,
};
