//! Developer tooling: session inspector, minimap, frame timing.
//!
//! # Invariants
//! - Tools only read session state; they never mutate it.

mod frame_timer;
mod inspector;

pub use frame_timer::{FrameSample, FrameStats, FrameTimer};
pub use inspector::{SessionInspector, SessionSummary};
