//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `patient` - Immutable case configuration
//! - `lexicon` - Keyword lists and the lexical signal analyzer
//! - `anxiety` - Anxiety state, levels and delta fusion
//! - `dialogue` - Turn ledger, prompt composition and reply parsing
//! - `session` - The patient session aggregate tying the above together

pub mod anxiety;
pub mod dialogue;
pub mod foundation;
pub mod lexicon;
pub mod patient;
pub mod session;
