//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types
//! that form the vocabulary of the virtual patient domain.

mod anxiety_score;
mod errors;
mod ids;
mod timestamp;

pub use anxiety_score::AnxietyScore;
pub use errors::{ConfigurationError, DomainError, ErrorCode, ValidationError};
pub use ids::{CaseId, SessionId};
pub use timestamp::Timestamp;
