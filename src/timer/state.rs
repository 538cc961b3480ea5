//! Timer state machine data and display formatting.
//!
//! ```text
//! Idle ──start──▶ Running ──toggle──▶ Paused
//!                 │    ▲               │
//!                 │    └────toggle─────┘
//!                 └──remaining hits 0──▶ Expired ──start──▶ Running
//! ```

/// Upper bound for both the minutes and the seconds field.
pub const MAX_FIELD: i64 = 60;

/// Phase of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerPhase {
    /// No countdown has been started yet.
    #[default]
    Idle,
    /// Ticks decrement the remaining time.
    Running,
    /// Remaining time is frozen; ticks are ignored.
    Paused,
    /// The countdown reached zero.
    Expired,
}

impl TimerPhase {
    /// Whether `toggle` has any effect in this phase.
    pub fn is_toggleable(&self) -> bool {
        matches!(self, TimerPhase::Running | TimerPhase::Paused)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimerPhase::Idle => "Idle",
            TimerPhase::Running => "Running",
            TimerPhase::Paused => "Paused",
            TimerPhase::Expired => "Expired",
        }
    }
}

/// Per-session countdown state, owned by the timer engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerState {
    pub phase: TimerPhase,
    pub remaining_seconds: u32,
    /// Bumped on every start and on teardown.  A tick carrying any other
    /// value belongs to a superseded tick source.
    pub generation: u64,
}

impl TimerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current remaining time formatted for the view.
    pub fn display(&self) -> String {
        format_display(self.remaining_seconds)
    }
}

/// `M:SS`: whole minutes unpadded, seconds zero-padded to two digits.
///
/// ```
/// use code_timer::timer::format_display;
///
/// assert_eq!(format_display(65), "1:05");
/// assert_eq!(format_display(0), "0:00");
/// assert_eq!(format_display(3660), "61:00");
/// ```
pub fn format_display(remaining_seconds: u32) -> String {
    format!("{}:{:02}", remaining_seconds / 60, remaining_seconds % 60)
}

/// Clamp raw `minutes`/`seconds` fields to `[0, 60]` each and return the
/// total in seconds.
pub fn total_seconds(minutes: i64, seconds: i64) -> u32 {
    let minutes = minutes.clamp(0, MAX_FIELD);
    let seconds = seconds.clamp(0, MAX_FIELD);
    // Both factors are bounded, so this fits comfortably in u32.
    (minutes * 60 + seconds) as u32
}
