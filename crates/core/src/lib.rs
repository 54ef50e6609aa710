//! # Pitstop Core
//!
//! Domain types and pure scheduling logic for the Pitstop workshop booking
//! service. This crate has no I/O: the db and api crates feed it data and
//! act on its decisions.

pub mod errors;
pub mod models;
pub mod schedule;
pub mod serde_fmt;
