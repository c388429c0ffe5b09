//! Input/output helpers.
//!
//! - per-year CSV exports (`export`)
//! - result JSON read/write (`result`)

pub mod export;
pub mod result;

pub use export::*;
pub use result::*;
