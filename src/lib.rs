//! Virtual Patient - Anxiety dynamics for medical-interview training
//!
//! This crate evolves a simulated patient's anxiety turn by turn, fusing the
//! dialogue service's proposed change with a lexical reading of the
//! interviewer's words, and renders the state back into the next prompt.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
