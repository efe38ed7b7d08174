//! Session domain module.
//!
//! A session binds one patient profile to its anxiety state and dialogue
//! ledger for the lifetime of an interview. Sessions are independent of each
//! other; the only shared piece is the read-only lexicon inside the engine.

mod aggregate;
mod engine;
mod errors;

pub use aggregate::{
    PatientSession, PreparedTurn, PresentationSignal, ResponseLengthWarning, TurnOutcome,
};
pub use engine::DynamicsEngine;
pub use errors::SessionError;
