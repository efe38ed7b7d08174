//! Anxiety module - per-session state, categorical levels and delta fusion.

mod fusion;
mod level;
mod state;

pub use fusion::{
    attenuation_factor, blend, decay_term, FusionBreakdown, FusionInputs, FusionPolicy,
    FusionStage, DEFAULT_DELTA_CAP,
};
pub use level::AnxietyLevel;
pub use state::{AnxietyState, AnxietyTransition};
