//! Lexicon module - keyword lists and the pure lexical signal analyzer.

mod analyzer;
#[allow(clippy::module_inception)]
mod lexicon;

pub use analyzer::{analyze, AnalysisResult, KeywordSignalAnalyzer, LEXICAL_DELTA_BOUND};
pub use lexicon::{KeywordLexicon, LexiconDocument};
