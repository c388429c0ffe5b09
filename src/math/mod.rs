//! Numeric core: gap filling and value trajectories.

pub mod gaps;
pub mod trajectory;

pub use gaps::fill_gaps;
pub use trajectory::{build_trajectory, deflate_forward};
