//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - source observations and their gap-filled form (`RawObservation`, `FilledSeries`)
//! - the value trajectory (`ValuePoint`)
//! - validated user input (`CalculatorInput`) and the form sanitizers feeding it

pub mod input;
pub mod types;

pub use input::*;
pub use types::*;
