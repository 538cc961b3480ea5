//! Pausable countdown timer.
//!
//! * [`TimerEngine`]: operations (`start`, `tick`, `toggle`,
//!   `update_remaining_time`, `cancel`) and the tick source.
//! * [`TimerState`] / [`TimerPhase`]: the state they mutate.
//! * [`format_display`]: `M:SS` formatting shared with the view.

pub mod engine;
pub mod state;

pub use engine::{TickReceiver, TimerEngine};
pub use state::{format_display, total_seconds, TimerPhase, TimerState};
