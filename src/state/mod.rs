//! State module for tracking collection progress
//!
//! # Components
//!
//! - `CategoryPhase`: Tracks one category through metadata resolution and paging
//! - `RunState`: Records, failed categories and outcomes accumulated by a run

mod category_phase;
mod run_state;

// Re-export main types
pub use category_phase::CategoryPhase;
pub use run_state::{advance, OutcomeCounts, RunState};
