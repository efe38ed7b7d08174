//! Dialogue module - turn history, prompt rendering and response parsing.

mod ledger;
mod prompt;
mod response;
mod symptoms;
mod turn;

#[cfg(test)]
pub(crate) use turn::fixtures;

pub use ledger::DialogueLedger;
pub use prompt::{PromptComposer, DEFAULT_HISTORY_WINDOW};
pub use response::PatientResponse;
pub use symptoms::{SymptomCues, SymptomMention};
pub use turn::DialogueTurn;
