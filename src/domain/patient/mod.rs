//! Patient module - immutable case configuration.

mod profile;

#[cfg(test)]
pub(crate) use profile::fixtures;
pub use profile::{
    CaseDocument, PatientProfile, Personality, PersonalityParams, ResponseLengthBounds,
};
