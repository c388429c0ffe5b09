//! `inflatio` library crate.
//!
//! The binary (`inflatio`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes or touching the network
//! - the CLI and the TUI share one calculation pipeline

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod tui;
